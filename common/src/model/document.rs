use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::creator::CreatorRef;
use crate::model::signature::SignatureSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentCategory {
    Admission,
    Placement,
    Medical,
    Legal,
    Discharge,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::Admission,
        DocumentCategory::Placement,
        DocumentCategory::Medical,
        DocumentCategory::Legal,
        DocumentCategory::Discharge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentCategory::Admission => "Admission",
            DocumentCategory::Placement => "Placement",
            DocumentCategory::Medical => "Medical",
            DocumentCategory::Legal => "Legal",
            DocumentCategory::Discharge => "Discharge",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        DocumentCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The category selector on the documents screen: either one category or the
/// synthetic "All Documents" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryView {
    #[default]
    All,
    Category(DocumentCategory),
}

impl CategoryView {
    pub const ALL_LABEL: &'static str = "All Documents";

    pub fn label(&self) -> &'static str {
        match self {
            CategoryView::All => Self::ALL_LABEL,
            CategoryView::Category(category) => category.as_str(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        DocumentCategory::from_label(label)
            .map(CategoryView::Category)
            .unwrap_or(CategoryView::All)
    }

    /// Every selectable view, "All Documents" first.
    pub fn options() -> Vec<CategoryView> {
        std::iter::once(CategoryView::All)
            .chain(DocumentCategory::ALL.into_iter().map(CategoryView::Category))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub category: DocumentCategory,
    #[serde(default)]
    pub additional_categories: Vec<DocumentCategory>,
    pub template_id: String,
    /// Template-specific field values keyed by placeholder name.
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub intake_form: Option<String>,
    #[serde(default)]
    pub is_standalone: bool,
    /// Name of the client the document was prepared for.
    #[serde(default)]
    pub created_for: Option<String>,
    #[serde(default)]
    pub created_by: Option<CreatorRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signatures: SignatureSet,
    #[serde(default)]
    pub standalone_signatures: Vec<StandaloneSignature>,
}

impl Document {
    pub fn in_view(&self, view: &CategoryView) -> bool {
        match view {
            CategoryView::All => true,
            CategoryView::Category(category) => {
                self.category == *category || self.additional_categories.contains(category)
            }
        }
    }
}

/// A titled signature captured outside the five-slot flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneSignature {
    pub id: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        serde_json::from_str(
            r#"{
                "_id": "d1",
                "title": "Consent for Medical Treatment",
                "category": "Medical",
                "additionalCategories": ["Placement"],
                "templateId": "medical-consent",
                "fields": { "physician": "Dr. Hale" },
                "intakeForm": null,
                "isStandalone": true,
                "createdBy": "u1"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn nullable_intake_reference_and_defaults() {
        let doc = sample();
        assert!(doc.intake_form.is_none());
        assert!(doc.signatures.is_empty());
        assert_eq!(doc.created_by.unwrap().id, "u1");
    }

    #[test]
    fn additional_categories_widen_view_membership() {
        let doc = sample();
        assert!(doc.in_view(&CategoryView::All));
        assert!(doc.in_view(&CategoryView::Category(DocumentCategory::Medical)));
        assert!(doc.in_view(&CategoryView::Category(DocumentCategory::Placement)));
        assert!(!doc.in_view(&CategoryView::Category(DocumentCategory::Legal)));
    }

    #[test]
    fn unknown_view_label_means_all_documents() {
        assert_eq!(CategoryView::from_label("All Documents"), CategoryView::All);
        assert_eq!(
            CategoryView::from_label("legal"),
            CategoryView::Category(DocumentCategory::Legal)
        );
    }
}
