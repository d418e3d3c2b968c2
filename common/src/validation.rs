//! Checks performed before a request is issued.

use crate::api::dto::{IntakeFormDraft, RegisterRequest};
use crate::error::ClientError;
use crate::model::{User, UserRole};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Values of the "add user" form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registration {
    pub username: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<UserRole>,
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), ClientError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password != confirmation {
        return Err(ClientError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

impl Registration {
    /// Validates the form and returns the request body to send.
    pub fn validate(&self) -> Result<RegisterRequest, ClientError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ClientError::Validation("Username is required.".to_string()));
        }
        if username.contains(char::is_whitespace) {
            return Err(ClientError::Validation(
                "Username cannot contain spaces.".to_string(),
            ));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Full name is required.".to_string()));
        }
        validate_password(&self.password, &self.confirm_password)?;
        let role = self
            .role
            .ok_or_else(|| ClientError::Validation("Please choose a role.".to_string()))?;

        Ok(RegisterRequest {
            username: username.to_string(),
            name: name.to_string(),
            password: self.password.clone(),
            role,
        })
    }
}

/// Returns a trimmed copy of the draft once the two required fields are present.
pub fn validate_intake_draft(
    draft: &IntakeFormDraft,
) -> Result<IntakeFormDraft, ClientError> {
    let client_name = draft.client_name.trim();
    if client_name.is_empty() {
        return Err(ClientError::Validation("Client name is required.".to_string()));
    }
    let case_number = draft.case_number.trim();
    if case_number.is_empty() {
        return Err(ClientError::Validation("Case number is required.".to_string()));
    }
    Ok(IntakeFormDraft {
        client_name: client_name.to_string(),
        case_number: case_number.to_string(),
        details: draft.details.clone(),
    })
}

/// Guards the delete-user action. The built-in `admin` account can never be
/// removed, whoever asks, and nobody can delete themselves.
pub fn ensure_user_deletable(target: &User, acting: &User) -> Result<(), ClientError> {
    if target.is_protected() {
        return Err(ClientError::Validation(
            "The admin account cannot be deleted.".to_string(),
        ));
    }
    if target.id == acting.id {
        return Err(ClientError::Validation(
            "You cannot delete your own account.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            username: "jdoe".to_string(),
            name: "Jane Doe".to_string(),
            password: "s3cret!".to_string(),
            confirm_password: "s3cret!".to_string(),
            role: Some(UserRole::Caseworker),
        }
    }

    #[test]
    fn valid_registration_builds_request() {
        let request = registration().validate().unwrap();
        assert_eq!(request.username, "jdoe");
        assert_eq!(request.role, UserRole::Caseworker);
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = registration();
        form.password = "abc".to_string();
        form.confirm_password = "abc".to_string();
        assert!(form.validate().unwrap_err().is_validation());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut form = registration();
        form.confirm_password = "different".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            ClientError::Validation("Passwords do not match.".to_string())
        );
    }

    #[test]
    fn intake_draft_requires_name_and_case_number() {
        let mut draft = IntakeFormDraft {
            client_name: "  Jordan Reyes ".to_string(),
            case_number: String::new(),
            ..Default::default()
        };
        assert!(validate_intake_draft(&draft).unwrap_err().is_validation());

        draft.case_number = "CASE-2024-001".to_string();
        assert_eq!(validate_intake_draft(&draft).unwrap().client_name, "Jordan Reyes");
    }

    #[test]
    fn missing_role_is_rejected() {
        let mut form = registration();
        form.role = None;
        assert!(form.validate().is_err());
    }
}
