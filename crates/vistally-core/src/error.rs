//! Shared error type across vistally crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, VistallyError>;

/// Unified error type used by core and the widget runtime.
#[derive(Debug, Error)]
pub enum VistallyError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("store rejected request: {0}")]
    Store(String),
    #[error("contended update: {0}")]
    Contention(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl VistallyError {
    /// Whether a later identical attempt could plausibly succeed.
    ///
    /// Drives logging verbosity only: the widget never retries above the
    /// store layer, every failure degrades to "this counter does not
    /// visibly update on this page load".
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VistallyError::Unreachable(_) | VistallyError::Contention(_)
        )
    }
}
