//! Signer roles and the canonical signature container.
//!
//! The backend has stored signatures in two shapes over time: a bare data URL
//! per role, or an object carrying the image plus a placement. Both are folded
//! into [`SignatureSet`] when a payload is deserialized, so nothing past the
//! API boundary has to care which shape arrived.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the five fixed signature slots, declared in visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerRole {
    #[serde(alias = "youth")]
    Child,
    #[serde(alias = "guardian", alias = "parentGuardian")]
    Parent,
    Caseworker,
    Supervisor,
    #[serde(alias = "agencyRep", alias = "agencyRepresentative")]
    Agency,
}

impl SignerRole {
    pub const ALL: [SignerRole; 5] = [
        SignerRole::Child,
        SignerRole::Parent,
        SignerRole::Caseworker,
        SignerRole::Supervisor,
        SignerRole::Agency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignerRole::Child => "child",
            SignerRole::Parent => "parent",
            SignerRole::Caseworker => "caseworker",
            SignerRole::Supervisor => "supervisor",
            SignerRole::Agency => "agency",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            SignerRole::Child => "Child/Youth",
            SignerRole::Parent => "Parent/Guardian",
            SignerRole::Caseworker => "Caseworker",
            SignerRole::Supervisor => "Supervisor",
            SignerRole::Agency => "Agency Representative",
        }
    }

    /// Parses a wire key, accepting the same aliases as deserialization.
    pub fn from_key(key: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(key.trim().to_string())).ok()
    }
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a signature image sits on a rendered document page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureEntry {
    /// `data:image/png;base64,...` payload.
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Placement>,
}

impl SignatureEntry {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            position: None,
        }
    }
}

/// Signatures keyed by role, always iterated in slot order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SignatureSet(BTreeMap<SignerRole, SignatureEntry>);

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: SignerRole) -> Option<&SignatureEntry> {
        self.0.get(&role)
    }

    pub fn contains(&self, role: SignerRole) -> bool {
        self.0.contains_key(&role)
    }

    pub fn insert(&mut self, role: SignerRole, entry: SignatureEntry) -> Option<SignatureEntry> {
        self.0.insert(role, entry)
    }

    pub fn remove(&mut self, role: SignerRole) -> Option<SignatureEntry> {
        self.0.remove(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignerRole, &SignatureEntry)> {
        self.0.iter().map(|(role, entry)| (*role, entry))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Roles without a signature, in slot order.
    pub fn missing(&self) -> Vec<SignerRole> {
        SignerRole::ALL
            .into_iter()
            .filter(|role| !self.contains(*role))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSignature {
    DataUrl(String),
    Object {
        #[serde(alias = "data", alias = "signature", alias = "imageData")]
        image: Option<String>,
        #[serde(default)]
        position: Option<Placement>,
    },
}

impl<'de> Deserialize<'de> for SignatureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<SignerRole, Option<RawSignature>> = lenient_role_map(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|(role, value)| {
                let (image, position) = match value? {
                    RawSignature::DataUrl(image) => (image, None),
                    RawSignature::Object { image, position } => (image?, position),
                };
                if image.trim().is_empty() {
                    return None;
                }
                Some((role, SignatureEntry { image, position }))
            })
            .collect();
        Ok(SignatureSet(entries))
    }
}

/// Deserializes a JSON object keyed by role names, dropping keys that are not
/// one of the five known roles.
pub fn lenient_role_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<SignerRole, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw: Option<BTreeMap<String, V>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match SignerRole::from_key(&key) {
            Some(role) => Some((role, value)),
            None => {
                log::warn!("dropping signature entry with unknown role key '{}'", key);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_wire_shapes_normalize_to_one_container() {
        let json = r#"{
            "child": "data:image/png;base64,AAAA",
            "supervisor": { "image": "data:image/png;base64,BBBB", "position": { "x": 10, "y": 20 } },
            "caseworker": null,
            "witness": "data:image/png;base64,CCCC"
        }"#;
        let set: SignatureSet = serde_json::from_str(json).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(SignerRole::Child).unwrap().image, "data:image/png;base64,AAAA");
        let supervisor = set.get(SignerRole::Supervisor).unwrap();
        assert_eq!(supervisor.position.unwrap().y, 20.0);
        assert!(!set.contains(SignerRole::Caseworker));
    }

    #[test]
    fn iteration_follows_slot_order() {
        let mut set = SignatureSet::new();
        set.insert(SignerRole::Agency, SignatureEntry::new("a"));
        set.insert(SignerRole::Child, SignatureEntry::new("c"));
        set.insert(SignerRole::Supervisor, SignatureEntry::new("s"));

        let roles: Vec<_> = set.iter().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![SignerRole::Child, SignerRole::Supervisor, SignerRole::Agency]
        );
        assert_eq!(set.missing(), vec![SignerRole::Parent, SignerRole::Caseworker]);
    }

    #[test]
    fn role_aliases_are_accepted() {
        assert_eq!(SignerRole::from_key("guardian"), Some(SignerRole::Parent));
        assert_eq!(SignerRole::from_key("agencyRep"), Some(SignerRole::Agency));
        assert_eq!(SignerRole::from_key("notary"), None);
    }
}
