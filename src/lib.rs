//! Athena Gradebook - client-side grading engine for the Athena school
//! platform.
//!
//! Drives the grade table of the staff dashboard: classifies term weeks
//! into assessment kinds, caches grade snapshots locally, runs the cell
//! edit state machine and reconciles optimistic edits with the grading
//! server.
//!
//! # Architecture
//! - `api`: grading server client (ureq)
//! - `cache`: object cache layer (Moka)
//! - `config`: configuration management
//! - `errors`: unified error handling
//! - `grading`: classifier, grade store, cell editor, coordinator
//! - `models`: data model definitions
//! - `notifications`: in-app toast bus
//! - `runtime`: startup wiring
//! - `session`: persisted session context
//! - `utils`: helper functions

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod grading;
pub mod models;
pub mod notifications;
pub mod runtime;
pub mod session;
pub mod utils;
