//! Data models for Corkboard.
//!
//! Defines the record-kind abstraction and the concrete kinds
//! (businesses and dogs) the board serves.

mod business;
mod dog;
mod record;

pub use business::{Business, BusinessFields};
pub use dog::{Dog, DogFields};
pub use record::{FieldErrors, FieldSpec, FormValues, InputKind, Record, RecordKind};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
