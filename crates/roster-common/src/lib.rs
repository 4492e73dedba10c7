// Wire types shared by the roster API and its clients.
//
// Both sides speak the same JSON shapes and run the same normalization
// function on user-supplied fields, so a record looks identical whether it
// was coerced by the client form or by the store.
use serde::{Deserialize, Serialize};

/// Collection path for person records, relative to the API base URL.
pub const PEOPLE_PATH: &str = "/api/people";

/// Maximum number of records returned by a list call.
pub const LIST_LIMIT: usize = 1000;

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("name is required")]
    NameRequired,
    #[error("age must be a whole number, got {0:?}")]
    AgeNotInteger(String),
}

/// Canonical person record as returned by the API.
///
/// The creation timestamp is store-internal and never part of this shape.
///
/// ```
/// use roster_common::Person;
///
/// let json = r#"{"id":1,"name":"Ana","email":null,"age":null,"notes":null}"#;
/// let person: Person = serde_json::from_str(json).unwrap();
/// assert_eq!(person.name, "Ana");
/// assert_eq!(serde_json::to_string(&person).unwrap(), json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub notes: Option<String>,
}

/// Raw create/update body as received on the wire.
///
/// Every field may be missing; [`PersonInput::normalize`] decides what is
/// acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct PersonInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub notes: Option<String>,
}

/// Normalized, validated field set for a create or a full-replace update.
///
/// Optional fields serialize as explicit `null` so an update always
/// overwrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub notes: Option<String>,
}

impl PersonInput {
    /// Apply the field rules once, at the boundary.
    ///
    /// - `name`: trimmed, must be non-empty.
    /// - `email`, `notes`: trimmed, empty becomes `None`.
    /// - `age`: kept as given, `0` included.
    pub fn normalize(self) -> Result<PersonFields> {
        let name = self
            .name
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(FieldError::NameRequired)?;
        Ok(PersonFields {
            name,
            email: non_blank(self.email),
            age: self.age,
            notes: non_blank(self.notes),
        })
    }
}

/// Body returned by a delete call. `deleted` is 0 when the id was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteResponse {
    pub ok: bool,
    pub deleted: u64,
}

impl DeleteResponse {
    pub fn deleted(count: u64) -> Self {
        Self {
            ok: true,
            deleted: count,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: Option<&str>) -> PersonInput {
        PersonInput {
            name: name.map(str::to_string),
            ..PersonInput::default()
        }
    }

    #[test]
    fn normalize_rejects_missing_or_blank_name() {
        assert_eq!(input(None).normalize(), Err(FieldError::NameRequired));
        assert_eq!(input(Some("")).normalize(), Err(FieldError::NameRequired));
        assert_eq!(input(Some("   ")).normalize(), Err(FieldError::NameRequired));
    }

    #[test]
    fn normalize_trims_and_nulls_blank_optionals() {
        let fields = PersonInput {
            name: Some("  Ana ".to_string()),
            email: Some("  ".to_string()),
            age: Some(0),
            notes: Some(" likes tea ".to_string()),
        }
        .normalize()
        .expect("valid");
        assert_eq!(fields.name, "Ana");
        assert_eq!(fields.email, None);
        assert_eq!(fields.age, Some(0));
        assert_eq!(fields.notes.as_deref(), Some("likes tea"));
    }

    #[test]
    fn input_accepts_missing_fields() {
        let parsed: PersonInput = serde_json::from_str(r#"{"name":"Ana"}"#).expect("json");
        assert_eq!(parsed, input(Some("Ana")));
        let empty: PersonInput = serde_json::from_str("{}").expect("json");
        assert_eq!(empty, PersonInput::default());
    }

    #[test]
    fn fields_serialize_explicit_nulls() {
        let fields = input(Some("Ana")).normalize().expect("valid");
        let value = serde_json::to_value(&fields).expect("json");
        assert_eq!(
            value,
            serde_json::json!({"name": "Ana", "email": null, "age": null, "notes": null})
        );
    }

    #[test]
    fn delete_response_shape() {
        let value = serde_json::to_value(DeleteResponse::deleted(0)).expect("json");
        assert_eq!(value, serde_json::json!({"ok": true, "deleted": 0}));
    }
}
