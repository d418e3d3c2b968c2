//! Document markup rendering.
//!
//! Each template is a markdown body with `{{field}}` placeholders followed by
//! the signature blocks it requires. Rendering is a pure function from a
//! [`Document`] to a printable HTML page, which is what the PDF endpoint
//! consumes.

use pulldown_cmark::{Parser, html};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::ClientError;
use crate::model::{Document, SignerRole};

pub struct DocumentTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub signers: &'static [SignerRole],
}

const ALL_SIGNERS: &[SignerRole] = &SignerRole::ALL;

const BUILT_IN: &[DocumentTemplate] = &[
    DocumentTemplate {
        id: "intake-summary",
        title: "Intake Summary",
        body: "# Intake Summary\n\n\
**Client:** {{clientName}}  \n\
**Case number:** {{caseNumber}}  \n\
**Date of birth:** {{dateOfBirth}}  \n\
**Referral source:** {{referralSource}}\n\n\
## Presenting concerns\n\n{{presentingConcerns}}\n",
        signers: &[SignerRole::Caseworker, SignerRole::Supervisor],
    },
    DocumentTemplate {
        id: "placement-agreement",
        title: "Placement Agreement",
        body: "# Placement Agreement\n\n\
This agreement places **{{clientName}}** (case {{caseNumber}}) with \
{{caregiverName}} at {{placementAddress}}, effective {{placementDate}}.\n\n\
The caregiver agrees to provide daily care, supervision and transportation, \
and to notify the agency within 24 hours of any incident.\n",
        signers: ALL_SIGNERS,
    },
    DocumentTemplate {
        id: "medical-consent",
        title: "Consent for Medical Treatment",
        body: "# Consent for Medical Treatment\n\n\
I authorize routine and emergency medical care for **{{clientName}}** \
(date of birth {{dateOfBirth}}), to be provided by {{physician}}.\n\n\
Known allergies: {{allergies}}\n",
        signers: &[SignerRole::Parent, SignerRole::Caseworker, SignerRole::Agency],
    },
    DocumentTemplate {
        id: "release-of-information",
        title: "Authorization to Release Information",
        body: "# Authorization to Release Information\n\n\
I authorize the agency to release records concerning **{{clientName}}** \
to {{recipient}} for the purpose of {{purpose}}. This authorization expires \
on {{expirationDate}}.\n",
        signers: &[SignerRole::Child, SignerRole::Parent, SignerRole::Caseworker],
    },
    DocumentTemplate {
        id: "client-rights",
        title: "Client Rights Acknowledgement",
        body: "# Client Rights Acknowledgement\n\n\
**{{clientName}}** has been informed of the following rights:\n\n\
- to be treated with dignity and respect\n\
- to privacy and confidentiality of records\n\
- to contact their caseworker and legal representative\n\
- to file a grievance without retaliation\n",
        signers: &[SignerRole::Child, SignerRole::Parent, SignerRole::Caseworker],
    },
    DocumentTemplate {
        id: "discharge-summary",
        title: "Discharge Summary",
        body: "# Discharge Summary\n\n\
**Client:** {{clientName}}  \n\
**Discharge date:** {{dischargeDate}}  \n\
**Discharged to:** {{dischargedTo}}\n\n\
## Summary of services\n\n{{servicesSummary}}\n",
        signers: &[SignerRole::Caseworker, SignerRole::Supervisor, SignerRole::Agency],
    },
];

const PAGE_STYLE: &str = "body{font-family:Arial,sans-serif;font-size:12pt;margin:24mm 18mm;color:#111}\
h1{font-size:18pt;border-bottom:1px solid #444;padding-bottom:4pt}\
.signatures{margin-top:28pt;display:flex;flex-wrap:wrap;gap:18pt}\
.signature{width:45%}\
.signature img{height:60px}\
.signature .line{border-top:1px solid #111;margin-top:4pt;padding-top:2pt;font-size:10pt}\
.signature .blank{height:60px}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("valid placeholder regex"))
}

fn value_token(index: usize) -> String {
    format!("casedocsvalue{index}x")
}

/// Escapes `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Text form of a field value as it should appear on paper.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(field_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[derive(Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<&'static str, &'static DocumentTemplate>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::built_in()
    }
}

impl TemplateRegistry {
    pub fn built_in() -> Self {
        Self {
            templates: BUILT_IN.iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn get(&self, template_id: &str) -> Option<&'static DocumentTemplate> {
        self.templates.get(template_id.trim()).copied()
    }

    pub fn templates(&self) -> impl Iterator<Item = &'static DocumentTemplate> + '_ {
        self.templates.values().copied()
    }

    /// Renders a document into a standalone HTML page.
    ///
    /// Unknown template ids fail with [`ClientError::Render`] rather than
    /// producing an empty page.
    pub fn render(&self, document: &Document) -> Result<String, ClientError> {
        let template = self.get(&document.template_id).ok_or_else(|| {
            ClientError::Render(format!(
                "no renderer for template '{}' ({})",
                document.template_id, document.title
            ))
        })?;
        Ok(render_document_to_markup(template, document))
    }
}

pub fn render_document_to_markup(template: &DocumentTemplate, document: &Document) -> String {
    // Values go in after the markdown pass so `*`, `_` or `[x](y)` typed into a
    // field stay literal text.
    let mut values = Vec::new();
    let filled = placeholder_regex().replace_all(template.body, |caps: &Captures| {
        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let text = match key {
            "title" => document.title.clone(),
            "clientName" => document
                .fields
                .get(key)
                .map(field_text)
                .or_else(|| document.created_for.clone())
                .unwrap_or_default(),
            _ => document.fields.get(key).map(field_text).unwrap_or_default(),
        };
        if text.is_empty() {
            "\\_\\_\\_\\_\\_\\_\\_\\_".to_string()
        } else {
            values.push(escape_html(&text));
            value_token(values.len() - 1)
        }
    });

    let mut body = String::new();
    html::push_html(&mut body, Parser::new(&filled));
    for (index, value) in values.iter().enumerate() {
        body = body.replace(&value_token(index), value);
    }

    let mut page = String::with_capacity(body.len() + 1024);
    page.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
    page.push_str(&escape_html(&document.title));
    page.push_str("</title><style>");
    page.push_str(PAGE_STYLE);
    page.push_str("</style></head><body>");
    page.push_str(&body);
    page.push_str(&signature_blocks(template, document));
    page.push_str("</body></html>");
    page
}

fn signature_blocks(template: &DocumentTemplate, document: &Document) -> String {
    if template.signers.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"signatures\">");
    for role in template.signers {
        out.push_str("<div class=\"signature\">");
        match document.signatures.get(*role) {
            Some(entry) => out.push_str(&format!(
                "<img src=\"{}\" alt=\"{} signature\">",
                escape_html(&entry.image),
                role.default_label()
            )),
            None => out.push_str("<div class=\"blank\"></div>"),
        }
        out.push_str(&format!(
            "<div class=\"line\">{}</div></div>",
            role.default_label()
        ));
    }
    out.push_str("</div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentCategory, SignatureEntry, SignatureSet};

    fn document(template_id: &str) -> Document {
        let mut signatures = SignatureSet::new();
        signatures.insert(
            SignerRole::Parent,
            SignatureEntry::new("data:image/png;base64,QUJD"),
        );
        Document {
            id: "d1".to_string(),
            title: "Consent for Medical Treatment".to_string(),
            category: DocumentCategory::Medical,
            additional_categories: vec![],
            template_id: template_id.to_string(),
            fields: [
                ("physician".to_string(), Value::from("Dr. <Hale>")),
                ("allergies".to_string(), Value::from(vec!["peanuts", "latex"])),
            ]
            .into_iter()
            .collect(),
            intake_form: Some("f1".to_string()),
            is_standalone: false,
            created_for: Some("Jordan Reyes".to_string()),
            created_by: None,
            created_at: None,
            updated_at: None,
            signatures,
            standalone_signatures: vec![],
        }
    }

    #[test]
    fn fields_are_substituted_and_escaped() {
        let html = TemplateRegistry::built_in()
            .render(&document("medical-consent"))
            .unwrap();
        assert!(html.contains("Jordan Reyes"));
        assert!(html.contains("Dr. &lt;Hale&gt;"));
        assert!(!html.contains("<Hale>"));
        assert!(html.contains("peanuts, latex"));
        assert!(html.contains("<h1>Consent for Medical Treatment</h1>"));
    }

    #[test]
    fn markdown_in_field_values_stays_literal() {
        let mut doc = document("medical-consent");
        doc.fields
            .insert("clientName".to_string(), Value::from("Ana_Maria *Lopez*"));
        doc.fields.insert(
            "physician".to_string(),
            Value::from("[Dr. Hale](https://evil.example)"),
        );
        let html = TemplateRegistry::built_in().render(&doc).unwrap();
        assert!(html.contains("Ana_Maria *Lopez*"));
        assert!(html.contains("[Dr. Hale](https://evil.example)"));
        assert!(!html.contains("<em>Lopez</em>"));
        assert!(!html.contains("href=\"https://evil.example\""));
        assert!(!html.contains("casedocsvalue"));
    }

    #[test]
    fn signature_blocks_follow_template_signers() {
        let html = TemplateRegistry::built_in()
            .render(&document("medical-consent"))
            .unwrap();
        assert!(html.contains("src=\"data:image/png;base64,QUJD\""));
        assert_eq!(html.matches("class=\"blank\"").count(), 2);
        assert!(html.contains("Agency Representative"));
    }

    #[test]
    fn missing_renderer_is_a_render_error() {
        let err = TemplateRegistry::built_in()
            .render(&document("foster-license-renewal"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Render(_)));
    }
}
