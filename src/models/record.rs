//! The record-kind abstraction.
//!
//! Every record kind on the board shares one CRUD workflow; what varies
//! is the field set, its form schema, and a little page copy. A kind
//! describes that variance through [`RecordKind`] and the controller in
//! `web::records` is written once against it.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::RecordRow;
use crate::{Error, Result};

/// How a form field renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Date,
    Checkbox,
}

/// Schema entry for one kind-specific form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
}

/// Submitted or pre-populated form values, keyed by field name.
pub type FormValues = HashMap<String, String>;

/// Field-level validation errors keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Descriptor for one record kind: field set, form schema and page copy.
pub trait RecordKind: Send + Sync + 'static {
    /// The kind-specific field set, stored as a JSON document.
    type Fields: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static;

    /// Kind discriminator and route prefix ("business", "dog").
    const KIND: &'static str;
    /// Plural route alias segment ("businesses", "dogs").
    const PLURAL: &'static str;
    /// Human label used in page copy and notices.
    const LABEL: &'static str;
    /// Whether the kind carries a favorite flag (enables the favorites view).
    const HAS_FAVORITES: bool = false;

    /// Form schema, in display order.
    fn schema() -> &'static [FieldSpec];

    /// Validate a submitted payload into the typed field set.
    fn parse_form(form: &FormValues) -> std::result::Result<Self::Fields, FieldErrors>;

    /// Pre-populate form values from stored fields, for the edit form.
    fn form_values(fields: &Self::Fields) -> FormValues;

    /// Short display line for list views.
    fn title(fields: &Self::Fields) -> String;

    /// Favorite predicate; only meaningful when `HAS_FAVORITES` is set.
    fn is_favorite(_fields: &Self::Fields) -> bool {
        false
    }
}

/// A typed record of kind `K`.
#[derive(Debug, Clone)]
pub struct Record<K: RecordKind> {
    pub id: String,
    pub author_id: String,
    pub modify_date: DateTime<Utc>,
    pub fields: K::Fields,
}

impl<K: RecordKind> Record<K> {
    /// Decode a stored row into the typed field set.
    pub fn from_row(row: RecordRow) -> Result<Self> {
        let fields = serde_json::from_str(&row.fields).map_err(|e| {
            Error::Internal(format!("corrupt {} document {}: {}", K::KIND, row.id, e))
        })?;
        Ok(Self {
            id: row.id,
            author_id: row.author_id,
            modify_date: row.modify_date,
            fields,
        })
    }

    /// Encode the typed field set back into its stored form.
    pub fn encode_fields(fields: &K::Fields) -> Result<String> {
        Ok(serde_json::to_string(fields)?)
    }
}

/// Fetch a form value, trimmed; absent fields collapse to empty.
pub(crate) fn trimmed<'a>(form: &'a FormValues, name: &str) -> &'a str {
    form.get(name).map(String::as_str).unwrap_or("").trim()
}
