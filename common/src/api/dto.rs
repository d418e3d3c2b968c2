//! Request and response bodies exchanged with the REST API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{
    DocumentCategory, FormStatus, Placement, SignerRole, StandaloneSignature, User, UserRole,
};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

/// Body of `POST /intake-forms` and `PUT /intake-forms/{id}`. Extra intake
/// questions travel next to the two required fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeFormDraft {
    pub client_name: String,
    pub case_number: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: FormStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveUpdate {
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Body of `PUT /intake-forms/{id}/signature` and `PUT /documents/{id}/signature`.
///
/// A `None` signature clears the slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureUpdate {
    pub signature_type: SignerRole,
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Placement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandaloneSignaturesRequest {
    pub signatures: Vec<StandaloneSignature>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStandaloneDocument {
    pub title: String,
    pub category: DocumentCategory,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_for: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentFieldsUpdate {
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfRequest {
    pub html: String,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfMultipleRequest {
    pub documents: Vec<PdfRequest>,
    pub filename: String,
}

/// A list response, either a bare array or wrapped as `{ "data": [..] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "items", alias = "results")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { data: items } => items,
        }
    }
}

impl Listing<serde_json::Value> {
    /// Decodes each row on its own. Rows that do not fit `T` are logged and
    /// dropped so one bad record does not hide the rest of the list.
    pub fn decode_items<T: DeserializeOwned>(self) -> Vec<T> {
        self.into_vec()
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(err) => {
                    log::warn!("skipping list row {}: {}", index, err);
                    None
                }
            })
            .collect()
    }
}

/// Generic `{ "message": ".." }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Runtime settings the host serves at [`crate::api::routes::APP_CONFIG_PATH`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// REST API base URL. Empty means same origin.
    #[serde(default)]
    pub api_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_update_uses_backend_field_names() {
        let body = SignatureUpdate {
            signature_type: SignerRole::Parent,
            signature: Some("data:image/png;base64,AA".to_string()),
            position: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["signatureType"], "parent");
        assert_eq!(json["signature"], "data:image/png;base64,AA");
        assert!(json.get("position").is_none());
    }

    #[test]
    fn listings_accept_bare_and_wrapped_arrays() {
        let bare: Listing<u32> = serde_json::from_str("[1, 2]").unwrap();
        let wrapped: Listing<u32> = serde_json::from_str(r#"{"data": [3]}"#).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        assert_eq!(wrapped.into_vec(), vec![3]);
    }

    #[test]
    fn one_bad_row_does_not_drop_the_list() {
        let listing: Listing<serde_json::Value> = serde_json::from_str(
            r#"{"data": [
                {"id": "d1", "title": "Court Report", "category": "Court", "templateId": "court-report"},
                {"id": "d2", "title": "Consent", "category": "Medical", "templateId": "medical-consent"}
            ]}"#,
        )
        .unwrap();
        let documents: Vec<crate::model::Document> = listing.decode_items();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "d2");
    }

    #[test]
    fn intake_draft_flattens_details() {
        let mut draft = IntakeFormDraft {
            client_name: "Jordan Reyes".to_string(),
            case_number: "CASE-2024-001".to_string(),
            ..IntakeFormDraft::default()
        };
        draft
            .details
            .insert("referralSource".to_string(), serde_json::json!("School"));
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["clientName"], "Jordan Reyes");
        assert_eq!(json["referralSource"], "School");
    }

    #[test]
    fn clearing_a_slot_sends_null() {
        let body = SignatureUpdate {
            signature_type: SignerRole::Child,
            signature: None,
            position: None,
        };
        assert!(serde_json::to_value(&body).unwrap()["signature"].is_null());
    }
}
