//! Contact record and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, REQUIRED, TOO_LONG};

/// Longest accepted contact name, in characters
pub const MAX_NAME_LEN: usize = 128;

/// A persisted contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// TypeID assigned at creation, never changes
    pub id: String,
    /// Display name
    pub name: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /contacts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Body of `PUT /contacts/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl CreateContactRequest {
    /// Check the payload against the contact rules
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name(&self.name)
    }
}

impl UpdateContactRequest {
    /// Check the payload against the contact rules
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name(&self.name)
    }
}

/// Name must be non-empty and at most [`MAX_NAME_LEN`] characters.
///
/// No trimming: `" "` is a valid name.
fn validate_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new("Validation failed");

    if name.is_empty() {
        errors.add_field_error("name", REQUIRED, "name is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add_field_error(
            "name",
            TOO_LONG,
            format!("name must be at most {MAX_NAME_LEN} characters"),
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_is_required() {
        let err = CreateContactRequest::default().validate().unwrap_err();
        assert_eq!(err.field("name")[0].code, REQUIRED);

        let err = UpdateContactRequest::default().validate().unwrap_err();
        assert_eq!(err.field("name")[0].code, REQUIRED);
    }

    #[test]
    fn test_name_length_boundary() {
        let ok = CreateContactRequest {
            name: "a".repeat(MAX_NAME_LEN),
        };
        assert!(ok.validate().is_ok());

        let too_long = UpdateContactRequest {
            name: "a".repeat(MAX_NAME_LEN + 1),
        };
        let err = too_long.validate().unwrap_err();
        assert_eq!(err.field("name")[0].code, TOO_LONG);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 128 two-byte characters
        let name = "é".repeat(MAX_NAME_LEN);
        assert_eq!(name.len(), MAX_NAME_LEN * 2);
        assert!(CreateContactRequest { name }.validate().is_ok());
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        assert!(CreateContactRequest { name: " ".into() }.validate().is_ok());
    }

    #[test]
    fn test_contact_json_shape() {
        let now = Utc::now();
        let contact = Contact {
            id: "contact_01h455vb4pex5vsknk084sn02q".into(),
            name: "test".into(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], "contact_01h455vb4pex5vsknk084sn02q");
        assert_eq!(json["name"], "test");
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_string());
    }

    #[test]
    fn test_missing_name_deserializes_empty() {
        let req: CreateContactRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_empty());
        assert!(req.validate().is_err());
    }
}
