//! Data ingestion and tabular storage
//!
//! Stats API client, the serde schema of its payloads, and dataset
//! assembly with CSV export.

pub mod dataset;
pub mod schema;
pub mod statsapi;

pub use dataset::{Dataset, DatasetBuilder};
pub use statsapi::{ScheduledGame, SeasonDates, StatsApi};
