use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username of the built-in account that can never be deleted.
pub const PROTECTED_USERNAME: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Counsellor,
    Hr,
    Caseworker,
    Socialworker,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Counsellor,
        UserRole::Hr,
        UserRole::Caseworker,
        UserRole::Socialworker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Counsellor => "counsellor",
            UserRole::Hr => "hr",
            UserRole::Caseworker => "caseworker",
            UserRole::Socialworker => "socialworker",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Counsellor => "Counsellor",
            UserRole::Hr => "HR",
            UserRole::Caseworker => "Caseworker",
            UserRole::Socialworker => "Social Worker",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        UserRole::ALL.into_iter().find(|role| role.as_str() == key)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_protected(&self) -> bool {
        self.username.trim().eq_ignore_ascii_case(PROTECTED_USERNAME)
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}
