//! Bug data access.
//!
//! This module defines the repository contract the UI talks to, the data
//! types it exchanges, and the in-memory implementation used by default.

pub mod error;
mod memory;
mod repository;
pub mod types;

pub use error::ApiError;
pub use memory::{seed_bugs, seed_options, InMemoryRepository, Latency};
pub use repository::{fetch_reference_options, BugRepository};
pub use types::{Bug, NewBug, NotFixReason, OptionKind, ReferenceOption, ReferenceOptions};
