//! Every REST endpoint the client talks to, in one table.
//!
//! Paths are relative to the versioned prefix; [`Endpoint::url`] joins them
//! with the configured base URL.

use std::fmt;

use crate::model::SignerRole;

/// Versioned prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// Served by the host next to the bundle, outside the API prefix.
pub const APP_CONFIG_PATH: &str = "/app-config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Absolute URL for this endpoint. An empty base means same origin.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}{}", base_url.trim_end_matches('/'), API_PREFIX, self.path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Path segments come from ids the backend handed out; strip anything that
/// would change the path structure.
fn segment(id: &str) -> String {
    id.trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '?' | '#' | '%'))
        .collect()
}

// Authentication and user administration

pub fn login() -> Endpoint {
    Endpoint::new(Method::Post, "/auth/login")
}

pub fn me() -> Endpoint {
    Endpoint::new(Method::Get, "/auth/me")
}

pub fn list_users() -> Endpoint {
    Endpoint::new(Method::Get, "/auth/users")
}

pub fn register_user() -> Endpoint {
    Endpoint::new(Method::Post, "/auth/register")
}

pub fn delete_user(id: &str) -> Endpoint {
    Endpoint::new(Method::Delete, format!("/auth/users/{}", segment(id)))
}

// Intake forms

pub fn list_intake_forms() -> Endpoint {
    Endpoint::new(Method::Get, "/intake-forms")
}

pub fn get_intake_form(id: &str) -> Endpoint {
    Endpoint::new(Method::Get, format!("/intake-forms/{}", segment(id)))
}

pub fn create_intake_form() -> Endpoint {
    Endpoint::new(Method::Post, "/intake-forms")
}

pub fn update_intake_form(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/intake-forms/{}", segment(id)))
}

pub fn delete_intake_form(id: &str) -> Endpoint {
    Endpoint::new(Method::Delete, format!("/intake-forms/{}", segment(id)))
}

pub fn intake_form_signature(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/intake-forms/{}/signature", segment(id)))
}

pub fn intake_form_status(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/intake-forms/{}/status", segment(id)))
}

pub fn intake_form_archive(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/intake-forms/{}/archive", segment(id)))
}

pub fn intake_form_permanent_delete(id: &str) -> Endpoint {
    Endpoint::new(Method::Delete, format!("/intake-forms/{}/permanent", segment(id)))
}

pub fn intake_forms_bulk_delete() -> Endpoint {
    Endpoint::new(Method::Post, "/intake-forms/bulk-delete")
}

// Documents

pub fn generate_documents(intake_form_id: &str) -> Endpoint {
    Endpoint::new(
        Method::Post,
        format!("/documents/generate/{}", segment(intake_form_id)),
    )
}

pub fn documents_for_intake(intake_form_id: &str) -> Endpoint {
    Endpoint::new(
        Method::Get,
        format!("/documents/intake/{}", segment(intake_form_id)),
    )
}

pub fn get_document(id: &str) -> Endpoint {
    Endpoint::new(Method::Get, format!("/documents/{}", segment(id)))
}

pub fn update_document(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/documents/{}", segment(id)))
}

pub fn document_signature(id: &str) -> Endpoint {
    Endpoint::new(Method::Put, format!("/documents/{}/signature", segment(id)))
}

pub fn delete_document_signature(id: &str, role: SignerRole) -> Endpoint {
    Endpoint::new(
        Method::Delete,
        format!("/documents/{}/signature/{}", segment(id), role.as_str()),
    )
}

pub fn create_standalone_document() -> Endpoint {
    Endpoint::new(Method::Post, "/documents/standalone")
}

pub fn list_standalone_documents() -> Endpoint {
    Endpoint::new(Method::Get, "/documents/standalone")
}

pub fn standalone_signatures(id: &str) -> Endpoint {
    Endpoint::new(
        Method::Post,
        format!("/documents/{}/standalone-signatures", segment(id)),
    )
}

pub fn document_permanent_delete(id: &str) -> Endpoint {
    Endpoint::new(Method::Delete, format!("/documents/{}/permanent", segment(id)))
}

pub fn documents_bulk_delete() -> Endpoint {
    Endpoint::new(Method::Post, "/documents/bulk-delete")
}

// PDF rendering

pub fn generate_pdf() -> Endpoint {
    Endpoint::new(Method::Post, "/pdf/generate")
}

pub fn generate_multiple_pdf() -> Endpoint {
    Endpoint::new(Method::Post, "/pdf/generate-multiple")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_prefix_and_path() {
        assert_eq!(
            get_intake_form("abc").url("https://cases.example.org/"),
            "https://cases.example.org/api/v1/intake-forms/abc"
        );
        assert_eq!(me().url(""), "/api/v1/auth/me");
    }

    #[test]
    fn signature_removal_path_uses_role_key() {
        let endpoint = delete_document_signature("d9", SignerRole::Agency);
        assert_eq!(endpoint.method, Method::Delete);
        assert_eq!(endpoint.path, "/documents/d9/signature/agency");
    }

    #[test]
    fn ids_cannot_escape_their_segment() {
        assert_eq!(get_document("../users?x=1").path, "/documents/..usersx=1");
    }
}
