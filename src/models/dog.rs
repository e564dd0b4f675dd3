//! The dog record kind.

use serde::{Deserialize, Serialize};

use super::record::{trimmed, FieldErrors, FieldSpec, FormValues, InputKind, RecordKind};

/// Kind marker for dogs.
#[derive(Debug)]
pub struct Dog;

/// Field set for a dog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogFields {
    pub name: String,
    pub breed: String,
    pub age: u32,
}

impl RecordKind for Dog {
    type Fields = DogFields;

    const KIND: &'static str = "dog";
    const PLURAL: &'static str = "dogs";
    const LABEL: &'static str = "dog";

    fn schema() -> &'static [FieldSpec] {
        &[
            FieldSpec { name: "name", label: "Name", input: InputKind::Text },
            FieldSpec { name: "breed", label: "Breed", input: InputKind::Text },
            FieldSpec { name: "age", label: "Age", input: InputKind::Number },
        ]
    }

    fn parse_form(form: &FormValues) -> Result<Self::Fields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = trimmed(form, "name");
        if name.is_empty() {
            errors.push("name", "Name is required");
        }

        let breed = trimmed(form, "breed");
        if breed.is_empty() {
            errors.push("breed", "Breed is required");
        }

        let age_raw = trimmed(form, "age");
        let age = if age_raw.is_empty() {
            errors.push("age", "Age is required");
            0
        } else {
            match age_raw.parse::<u32>() {
                Ok(age) => age,
                Err(_) => {
                    errors.push("age", "Age must be a whole number");
                    0
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(DogFields {
            name: name.to_string(),
            breed: breed.to_string(),
            age,
        })
    }

    fn form_values(fields: &Self::Fields) -> FormValues {
        let mut values = FormValues::new();
        values.insert("name".to_string(), fields.name.clone());
        values.insert("breed".to_string(), fields.breed.clone());
        values.insert("age".to_string(), fields.age.to_string());
        values
    }

    fn title(fields: &Self::Fields) -> String {
        fields.name.clone()
    }
}
