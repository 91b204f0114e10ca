//! # rsources
//!
//! Run-time status tracking for data-pipeline job runs.
//!
//! A job run fans out into tasks, each task reads one or more sources, and
//! each source forwards events to one or more destinations. Pipeline
//! workers accumulate `in`/`out`/`failed` counters per (task, source,
//! destination); this crate turns those counters into a filterable status
//! tree, lists individually failed records, and retires run state.
//!
//! - **Status model**: [`status::JobStatus`] and the [`status::StatusAggregator`]
//! - **Filtering**: [`filter::JobFilter`], a pure projection over the tree
//! - **Store contract**: the [`service::JobService`] trait and [`errors::JobServiceError`]
//! - **HTTP façade**: [`http::router`], the only place errors become status codes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rsources::prelude::*;
//!
//! let store = Arc::new(MemoryJobService::new());
//! store.increment_stats("run-1", JobTargetKey::new("t1", "s1", "d1"), Stats::new(1, 1, 0));
//!
//! let app = router(AppState::new(store));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cleanup;
pub mod config;
pub mod errors;
pub mod filter;
pub mod http;
pub mod memory;
pub mod observability;
pub mod records;
pub mod service;
pub mod status;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, Settings};
    pub use crate::errors::{ErrorKind, JobServiceError};
    pub use crate::filter::JobFilter;
    pub use crate::http::{router, AppState};
    pub use crate::memory::MemoryJobService;
    pub use crate::records::{FailedRecord, FailedRecords};
    pub use crate::service::JobService;
    pub use crate::status::{
        DestinationStatus, JobStatus, JobTargetKey, SourceStatus, Stats, StatusAggregator,
        TaskStatus,
    };
}
