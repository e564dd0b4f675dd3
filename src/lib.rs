//! Corkboard - a community board for local businesses and dogs.
//!
//! Session-authenticated CRUD pages for two record kinds plus the
//! comments attached to them. Mutations are gated on record ownership:
//! only the author of a record may edit or delete it.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use error::{Error, Result};
pub use state::AppState;
