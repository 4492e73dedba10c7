//! Person records as held by the store.
//!
//! # Purpose
//! Carries the store-owned `created_at` timestamp alongside the wire fields.
//! Handlers convert to [`Person`] before responding so the timestamp never
//! leaves the service.
use chrono::{DateTime, Utc};
use roster_common::{Person, PersonFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PersonRecord {
    pub fn new(id: i64, fields: PersonFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            age: fields.age,
            notes: fields.notes,
            created_at,
        }
    }

    /// Full replace of the mutable fields. `id` and `created_at` are kept.
    pub fn replace_fields(&mut self, fields: PersonFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.age = fields.age;
        self.notes = fields.notes;
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Person {
            id: record.id,
            name: record.name,
            email: record.email,
            age: record.age,
            notes: record.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_fields_keeps_identity() {
        let created_at = Utc::now();
        let mut record = PersonRecord::new(
            7,
            PersonFields {
                name: "Ana".to_string(),
                email: Some("ana@example.com".to_string()),
                age: Some(30),
                notes: Some("first".to_string()),
            },
            created_at,
        );
        record.replace_fields(PersonFields {
            name: "Ana B".to_string(),
            email: None,
            age: Some(31),
            notes: None,
        });
        assert_eq!(record.id, 7);
        assert_eq!(record.created_at, created_at);
        assert_eq!(
            Person::from(record),
            Person {
                id: 7,
                name: "Ana B".to_string(),
                email: None,
                age: Some(31),
                notes: None,
            }
        );
    }
}
