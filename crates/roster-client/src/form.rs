use roster_common::{FieldError, Person, PersonFields, PersonInput};

/// Raw text as typed by the user. Nothing here is validated until
/// [`PersonForm::to_fields`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub email: String,
    pub age: String,
    pub notes: String,
}

impl PersonForm {
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.age.is_empty() && self.notes.is_empty()
    }

    /// Coerce the text fields into a wire body. Blank age means no age; any
    /// other age text must be a whole number.
    pub fn to_input(&self) -> Result<PersonInput, FieldError> {
        let age = match self.age.trim() {
            "" => None,
            text => Some(
                text.parse::<i64>()
                    .map_err(|_| FieldError::AgeNotInteger(text.to_string()))?,
            ),
        };
        Ok(PersonInput {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            age,
            notes: Some(self.notes.clone()),
        })
    }

    pub fn to_fields(&self) -> Result<PersonFields, FieldError> {
        self.to_input()?.normalize()
    }
}

impl From<&Person> for PersonForm {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            email: person.email.clone().unwrap_or_default(),
            age: person.age.map(|age| age.to_string()).unwrap_or_default(),
            notes: person.notes.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, age: &str, notes: &str) -> PersonForm {
        PersonForm {
            name: name.into(),
            email: email.into(),
            age: age.into(),
            notes: notes.into(),
        }
    }

    #[test]
    fn blank_optionals_become_none() {
        let fields = form("  Ana ", " ", "", "\t").to_fields().expect("fields");
        assert_eq!(
            fields,
            PersonFields {
                name: "Ana".into(),
                email: None,
                age: None,
                notes: None,
            }
        );
    }

    #[test]
    fn age_is_parsed_and_zero_kept() {
        assert_eq!(form("Ana", "", " 31 ", "").to_fields().unwrap().age, Some(31));
        assert_eq!(form("Ana", "", "0", "").to_fields().unwrap().age, Some(0));
    }

    #[test]
    fn bad_age_fails_before_name_check() {
        assert_eq!(
            form("", "", "thirty", "").to_fields(),
            Err(FieldError::AgeNotInteger("thirty".into()))
        );
        assert_eq!(
            form("Ana", "", "3.5", "").to_fields(),
            Err(FieldError::AgeNotInteger("3.5".into()))
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            form("   ", "a@example.com", "", "").to_fields(),
            Err(FieldError::NameRequired)
        );
    }

    #[test]
    fn fills_from_record() {
        let person = Person {
            id: 4,
            name: "Bob".into(),
            email: None,
            age: Some(40),
            notes: Some("hi".into()),
        };
        assert_eq!(PersonForm::from(&person), form("Bob", "", "40", "hi"));
        assert!(PersonForm::default().is_blank());
    }
}
