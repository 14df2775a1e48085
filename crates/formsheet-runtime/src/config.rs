#![forbid(unsafe_code)]

//! Sheet configuration as data.
//!
//! A [`SheetConfig`] carries everything the host sets on a sheet screen:
//! detent fractions, the initial detent, and the presentation style. With
//! the `sheet-config` feature it can be loaded from TOML or JSON.
//!
//! ```toml
//! presentation = "form-sheet"
//! detents = [0.3, 0.6, 0.9]
//! initial_detent_index = 1
//! ```
//!
//! ```rust,ignore
//! let config = SheetConfig::from_toml_file("sheet.toml")?;
//! let detents = config.detents();
//! ```
//!
//! Values are not checked on load; detents are validated when the layout is
//! resolved. [`SheetConfig::validate`] is available for eager checks.

#[cfg(feature = "sheet-config")]
use std::path::Path;

#[cfg(feature = "sheet-config")]
use serde::{Deserialize, Serialize};

use formsheet_core::{Detents, StackPresentation};

/// Host-provided configuration of a sheet screen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct SheetConfig {
    /// How the screen is presented.
    pub presentation: StackPresentation,
    /// Detent fractions in `(0, 1]`, increasing.
    pub detents: Vec<f64>,
    /// Index of the detent the sheet starts at.
    pub initial_detent_index: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            presentation: StackPresentation::FormSheet,
            detents: vec![1.0],
            initial_detent_index: 0,
        }
    }
}

impl SheetConfig {
    /// Load from a TOML string.
    #[cfg(feature = "sheet-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SheetConfigError> {
        toml::from_str(s).map_err(SheetConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "sheet-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "sheet-config")]
    pub fn from_json_str(s: &str) -> Result<Self, SheetConfigError> {
        serde_json::from_str(s).map_err(SheetConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "sheet-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Detent set described by this configuration.
    pub fn detents(&self) -> Detents {
        Detents::new(self.detents.clone(), self.initial_detent_index)
    }

    /// Validate all values.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.detents().validate()
    }

    /// Like [`validate`](Self::validate), but as a `Result`.
    pub fn validated(self) -> Result<Self, SheetConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SheetConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`SheetConfig`].
#[derive(Debug)]
pub enum SheetConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "sheet-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "sheet-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SheetConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "sheet-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "sheet-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SheetConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "sheet-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "sheet-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
