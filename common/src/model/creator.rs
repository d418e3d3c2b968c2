use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Reference to the user that created a record.
///
/// The API returns either the bare user id or the populated user object,
/// depending on the endpoint. Both collapse into this struct.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CreatorRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreatorRef {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Identifier used for ownership comparisons.
    pub fn normalized_id(&self) -> &str {
        self.id.trim()
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCreator {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl<'de> Deserialize<'de> for CreatorRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawCreator::deserialize(deserializer)? {
            RawCreator::Id(id) => CreatorRef::from_id(id),
            RawCreator::Populated { id, username, name } => CreatorRef { id, username, name },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_string_and_populated_object_compare_equal_by_id() {
        let bare: CreatorRef = serde_json::from_str(r#""64ac01""#).unwrap();
        let populated: CreatorRef =
            serde_json::from_str(r#"{"_id":"64ac01","username":"mlopez","name":"Maria Lopez"}"#)
                .unwrap();

        assert_eq!(bare.normalized_id(), populated.normalized_id());
        assert_eq!(populated.display_name(), "Maria Lopez");
        assert_eq!(bare.display_name(), "64ac01");
    }
}
