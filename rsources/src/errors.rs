//! Error types for job-run status queries.
//!
//! Every failure a [`JobService`](crate::service::JobService) can report is a
//! variant of [`JobServiceError`]. Callers branch on [`ErrorKind`] rather than
//! on individual variants, so new internal failure shapes never change how a
//! response is classified.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Message surfaced when a job run has no tracked state.
pub const STATUS_NOT_FOUND: &str = "Status not found";

/// Coarse classification of a [`JobServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The job run does not exist in the store.
    NotFound,
    /// Any other store failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// The error type returned by job-run status stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobServiceError {
    /// No state is tracked for the requested job run.
    #[error("Status not found")]
    StatusNotFound,

    /// The store call did not finish within the allotted time.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A store-level failure. The message is surfaced verbatim.
    #[error("{0}")]
    Internal(String),
}

impl JobServiceError {
    /// Creates an internal error from any displayable value.
    #[must_use]
    pub fn internal(message: impl fmt::Display) -> Self {
        Self::Internal(message.to_string())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StatusNotFound => ErrorKind::NotFound,
            Self::Timeout(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if the job run was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}

impl From<anyhow::Error> for JobServiceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}
