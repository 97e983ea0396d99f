#![forbid(unsafe_code)]

//! Bind-time errors.
//!
//! Every error is produced synchronously by [`Aggregator::bind`] before the
//! store listener is registered. Nothing is retried or logged; the caller
//! fixes its input and binds again.
//!
//! [`Aggregator::bind`]: crate::Aggregator::bind

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("no subscribers provided")]
    NoSubscribers,

    #[error("store not supplied")]
    MissingStore,

    #[error("store does not implement expected interface")]
    InvalidStore,

    #[error("subscriber at index {index} does not provide a selector function")]
    MissingSelector { index: usize },

    #[error("subscriber at index {index} does not provide an onChange function")]
    MissingOnChange { index: usize },
}

impl BindError {
    /// Position of the offending descriptor, for per-descriptor errors.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::MissingSelector { index } | Self::MissingOnChange { index } => Some(*index),
            _ => None,
        }
    }

    /// Name of the capability a descriptor failed to provide.
    #[must_use]
    pub const fn missing_capability(&self) -> Option<&'static str> {
        match self {
            Self::MissingSelector { .. } => Some("selector"),
            Self::MissingOnChange { .. } => Some("onChange"),
            _ => None,
        }
    }
}
