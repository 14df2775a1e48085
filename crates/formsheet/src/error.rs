#![forbid(unsafe_code)]

//! Unified error model.
//!
//! Each layer keeps its own typed error; [`Error`] wraps them so host glue
//! can propagate anything with `?` and decide what to do via
//! [`Error::class`]. Benign repeats (a second dismiss, a second transition
//! end) are never errors; they surface as outcome values and log lines.

use std::fmt;

use formsheet_core::SheetError;
use formsheet_runtime::{NavigationError, SheetConfigError};

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for form sheet screens.
#[derive(Debug)]
pub enum Error {
    /// Layout resolution failure.
    Sheet(SheetError),
    /// Screen container failure.
    Navigation(NavigationError),
    /// Configuration loading or validation failure.
    Config(SheetConfigError),
}

/// Standard result type for formsheet APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Failure classes ─────────────────────────────────────────────────────

/// How the host should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A broken precondition of the environment or the screen hierarchy.
    /// The screen cannot continue.
    Fatal,
    /// Bad configuration. The previous layout stays in effect; the host
    /// should report the value and may retry with a corrected one.
    Configuration,
}

impl Error {
    /// Classify this error.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Sheet(SheetError::ContainerHeightUnavailable) => FailureClass::Fatal,
            Self::Sheet(SheetError::InvalidDetentConfiguration { .. }) => {
                FailureClass::Configuration
            }
            Self::Sheet(SheetError::OutOfRange { .. }) => FailureClass::Configuration,

            Self::Navigation(_) => FailureClass::Fatal,

            Self::Config(_) => FailureClass::Configuration,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Sheet(_) => "sheet",
            Self::Navigation(_) => "navigation",
            Self::Config(_) => "config",
        }
    }

    /// Whether the screen can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        self.class() != FailureClass::Fatal
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sheet(err) => write!(f, "{err}"),
            Self::Navigation(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "configuration: {err}"),
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal => write!(f, "fatal"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sheet(err) => Some(err),
            Self::Navigation(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<SheetError> for Error {
    fn from(err: SheetError) -> Self {
        Self::Sheet(err)
    }
}

impl From<NavigationError> for Error {
    fn from(err: NavigationError) -> Self {
        Self::Navigation(err)
    }
}

impl From<SheetConfigError> for Error {
    fn from(err: SheetConfigError) -> Self {
        Self::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use formsheet_core::{Detents, KeyboardState, StackPresentation, resolve};
    use formsheet_runtime::{ContainerKind, ScreenTree};

    use super::*;

    #[test]
    fn missing_height_is_fatal() {
        let err = Error::from(SheetError::ContainerHeightUnavailable);
        assert_eq!(err.class(), FailureClass::Fatal);
        assert!(!err.is_recoverable());
        assert_eq!(err.error_type(), "sheet");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn bad_detents_are_configuration() {
        let err: Error = resolve(&Detents::new(vec![0.5, 0.0], 0), KeyboardState::NotVisible, 800)
            .unwrap_err()
            .into();
        assert_eq!(err.class(), FailureClass::Configuration);
        assert!(err.is_recoverable());

        let err: Error = Detents::single(0.5).at(3).unwrap_err().into();
        assert_eq!(err.class(), FailureClass::Configuration);
    }

    #[test]
    fn non_stack_container_is_fatal() {
        let mut tree = ScreenTree::new();
        let plain = tree.add_container(ContainerKind::Plain);
        let screen = tree.push_screen(plain, StackPresentation::Push).unwrap();
        let err: Error = tree.can_navigate_back(screen).unwrap_err().into();
        assert_eq!(err.class(), FailureClass::Fatal);
        assert_eq!(err.error_type(), "navigation");
        assert!(format!("{err}").contains("non-stack"));
    }

    #[test]
    fn config_validation_is_configuration() {
        let err = Error::from(SheetConfigError::Validation(vec!["bad".into()]));
        assert_eq!(err.class(), FailureClass::Configuration);
        assert_eq!(format!("{err}"), "configuration: validation errors: bad");
        assert_eq!(format!("{}", err.class()), "configuration");
    }
}
