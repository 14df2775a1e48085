#![forbid(unsafe_code)]

//! Errors raised while resolving sheet geometry.
//!
//! Every variant is either a fatal precondition violation (the host could not
//! supply a container height) or a configuration error (the detent set cannot
//! be turned into a layout). Nothing here is recoverable by the core; callers
//! surface the error to whoever owns the configuration.

use std::fmt;

/// Failure while building or resolving a sheet layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    /// No positive container height could be determined.
    ContainerHeightUnavailable,
    /// The detent set cannot produce a valid layout.
    InvalidDetentConfiguration {
        /// Human-readable description of the offending values.
        reason: String,
    },
    /// A detent index is outside of the configured detent set.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of detents available.
        count: usize,
    },
}

impl SheetError {
    /// Build an [`SheetError::InvalidDetentConfiguration`] from any message.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDetentConfiguration {
            reason: reason.into(),
        }
    }

    /// Whether this error is a fatal environment precondition rather than a
    /// configuration mistake.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::ContainerHeightUnavailable)
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerHeightUnavailable => {
                write!(f, "failed to find container height for sheet configuration")
            }
            Self::InvalidDetentConfiguration { reason } => {
                write!(f, "invalid detent configuration: {reason}")
            }
            Self::OutOfRange { index, count } => {
                write!(f, "detent index {index} out of range for {count} detent(s)")
            }
        }
    }
}

impl std::error::Error for SheetError {}
