use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::creator::CreatorRef;
use crate::model::signature::{SignatureSet, SignerRole, lenient_role_map};

/// Workflow status of an intake form. Labels the backend sends that are not
/// one of the four known ones are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormStatus {
    #[default]
    Pending,
    InProgress,
    NeedsReview,
    Completed,
    Other(String),
}

impl FormStatus {
    pub const KNOWN: [FormStatus; 4] = [
        FormStatus::Pending,
        FormStatus::InProgress,
        FormStatus::NeedsReview,
        FormStatus::Completed,
    ];

    pub fn label(&self) -> &str {
        match self {
            FormStatus::Pending => "Pending",
            FormStatus::InProgress => "In Progress",
            FormStatus::NeedsReview => "Needs Review",
            FormStatus::Completed => "Completed",
            FormStatus::Other(label) => label,
        }
    }
}

impl From<String> for FormStatus {
    fn from(label: String) -> Self {
        match label.trim() {
            "Pending" => FormStatus::Pending,
            "In Progress" => FormStatus::InProgress,
            "Needs Review" => FormStatus::NeedsReview,
            "Completed" => FormStatus::Completed,
            _ => FormStatus::Other(label),
        }
    }
}

impl From<FormStatus> for String {
    fn from(status: FormStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub client_name: String,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub status: FormStatus,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<CreatorRef>,
    #[serde(default)]
    pub signatures: SignatureSet,
    #[serde(default, deserialize_with = "lenient_role_map")]
    pub signature_labels: BTreeMap<SignerRole, String>,
    /// Remaining intake answers; opaque to the client.
    #[serde(default, flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl IntakeForm {
    /// Label shown for a signature slot, honouring per-form overrides.
    pub fn signature_label(&self, role: SignerRole) -> &str {
        self.signature_labels
            .get(&role)
            .map(String::as_str)
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(role.default_label())
    }
}
