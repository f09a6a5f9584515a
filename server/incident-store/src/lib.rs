//! Disaster Incident Store — durable, file-backed record store.
//!
//! Holds citizen-submitted incident reports in one JSON document, replaced
//! atomically on every mutation. Provides create/update/delete plus
//! read-side filtering, newest-first sorting and monthly category counts.
//!
//! No HTTP, no DB, no network; plain file I/O behind a write lock.

pub mod analytics;
pub mod config;
pub mod date;
pub mod error;
pub mod normalize;
pub mod query;
pub mod store;
pub mod types;

pub use config::StoreConfig;
pub use error::StoreError;
pub use normalize::{normalize, RawSubmission};
pub use store::{new_id, IncidentStore};
pub use types::{
  Collection, Incident, IncidentFilter, IncidentPatch, Location, MonthlyCounts, NewIncident,
};
