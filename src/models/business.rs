//! The business record kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{trimmed, FieldErrors, FieldSpec, FormValues, InputKind, RecordKind};

/// Kind marker for businesses.
#[derive(Debug)]
pub struct Business;

/// Field set for a business listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessFields {
    pub name: String,
    pub product: String,
    /// Founding or listing date, as entered.
    pub date: Option<NaiveDate>,
    pub location: String,
    pub favorite: bool,
}

impl RecordKind for Business {
    type Fields = BusinessFields;

    const KIND: &'static str = "business";
    const PLURAL: &'static str = "businesses";
    const LABEL: &'static str = "business";
    const HAS_FAVORITES: bool = true;

    fn schema() -> &'static [FieldSpec] {
        &[
            FieldSpec { name: "name", label: "Name", input: InputKind::Text },
            FieldSpec { name: "product", label: "Product", input: InputKind::Text },
            FieldSpec { name: "date", label: "Date", input: InputKind::Date },
            FieldSpec { name: "location", label: "Location", input: InputKind::Text },
            FieldSpec { name: "favorite", label: "Favorite", input: InputKind::Checkbox },
        ]
    }

    fn parse_form(form: &FormValues) -> Result<Self::Fields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = trimmed(form, "name");
        if name.is_empty() {
            errors.push("name", "Name is required");
        }

        let product = trimmed(form, "product");
        if product.is_empty() {
            errors.push("product", "Product is required");
        }

        let location = trimmed(form, "location");
        if location.is_empty() {
            errors.push("location", "Location is required");
        }

        let date_raw = trimmed(form, "date");
        let date = if date_raw.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(date_raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("date", "Enter the date as YYYY-MM-DD");
                    None
                }
            }
        };

        // Unchecked checkboxes are simply absent from the payload.
        let favorite = !trimmed(form, "favorite").is_empty();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BusinessFields {
            name: name.to_string(),
            product: product.to_string(),
            date,
            location: location.to_string(),
            favorite,
        })
    }

    fn form_values(fields: &Self::Fields) -> FormValues {
        let mut values = FormValues::new();
        values.insert("name".to_string(), fields.name.clone());
        values.insert("product".to_string(), fields.product.clone());
        values.insert(
            "date".to_string(),
            fields
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        );
        values.insert("location".to_string(), fields.location.clone());
        values.insert(
            "favorite".to_string(),
            if fields.favorite { "on".to_string() } else { String::new() },
        );
        values
    }

    fn title(fields: &Self::Fields) -> String {
        fields.name.clone()
    }

    fn is_favorite(fields: &Self::Fields) -> bool {
        fields.favorite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(entries: &[(&str, &str)]) -> FormValues {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_valid_form() {
        let fields = Business::parse_form(&form(&[
            ("name", "Acme"),
            ("product", "Widgets"),
            ("date", "2023-06-01"),
            ("location", "Springfield"),
            ("favorite", "on"),
        ]))
        .unwrap();

        assert_eq!(fields.name, "Acme");
        assert_eq!(fields.product, "Widgets");
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert!(fields.favorite);
    }

    #[test]
    fn test_missing_required_fields_collect_errors() {
        let errors = Business::parse_form(&form(&[("date", "2023-06-01")])).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("product").is_some());
        assert!(errors.get("location").is_some());
        assert!(errors.get("date").is_none());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let errors = Business::parse_form(&form(&[
            ("name", "Acme"),
            ("product", "Widgets"),
            ("date", "June 1st"),
            ("location", "Springfield"),
        ]))
        .unwrap_err();
        assert!(errors.get("date").is_some());
    }

    #[test]
    fn test_absent_checkbox_means_not_favorite() {
        let fields = Business::parse_form(&form(&[
            ("name", "Acme"),
            ("product", "Widgets"),
            ("location", "Springfield"),
        ]))
        .unwrap();
        assert!(!fields.favorite);
        assert_eq!(fields.date, None);
    }

    #[test]
    fn test_form_values_roundtrip() {
        let fields = BusinessFields {
            name: "Acme".to_string(),
            product: "Widgets".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 6, 1),
            location: "Springfield".to_string(),
            favorite: true,
        };

        let values = Business::form_values(&fields);
        let reparsed = Business::parse_form(&values).unwrap();
        assert_eq!(reparsed, fields);
    }
}
