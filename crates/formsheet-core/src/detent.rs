#![forbid(unsafe_code)]

//! Detent model: the fractional heights a sheet may rest at.
//!
//! A detent is a fraction of the container height in `(0.0, 1.0]`. The set is
//! ordered and expected to be strictly increasing, but that is only checked
//! when the layout resolver needs it (or when [`Detents::validate`] is called
//! by the configuration layer).
//!
//! # Invariants
//!
//! - The value is immutable. A configuration change replaces the whole set.
//! - Only the first three detents carry distinct geometry.

use crate::error::SheetError;
use crate::layout::SheetState;

/// Number of detents that carry distinct geometry.
pub const MAX_MEANINGFUL_DETENTS: usize = 3;

/// Shape of a detent set, derived from its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetentClass {
    /// One detent: the sheet only rests fully expanded.
    Single,
    /// Two detents: collapsed (peek) and expanded.
    Double,
    /// Three or more detents: collapsed, half-expanded, expanded.
    Triple,
}

impl DetentClass {
    /// Number of detents this class uses for geometry.
    pub const fn meaningful_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => MAX_MEANINGFUL_DETENTS,
        }
    }
}

/// Ordered detent heights plus the initially selected index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detents {
    values: Vec<f64>,
    initial_index: usize,
}

impl Default for Detents {
    /// A single, fully expanded detent.
    fn default() -> Self {
        Self::single(1.0)
    }
}

impl Detents {
    /// Create a detent set. Values are stored as given.
    pub fn new(values: Vec<f64>, initial_index: usize) -> Self {
        Self {
            values,
            initial_index,
        }
    }

    /// A set with one detent.
    pub fn single(fraction: f64) -> Self {
        Self::new(vec![fraction], 0)
    }

    /// Number of configured detents.
    #[inline]
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Detent at `index`.
    pub fn at(&self, index: usize) -> Result<f64, SheetError> {
        self.values
            .get(index)
            .copied()
            .ok_or(SheetError::OutOfRange {
                index,
                count: self.count(),
            })
    }

    /// All configured values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Initially selected detent index.
    #[inline]
    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    /// Classify the set by length. An empty set is a configuration error.
    pub fn class(&self) -> Result<DetentClass, SheetError> {
        match self.count() {
            0 => Err(SheetError::invalid("at least one detent is required")),
            1 => Ok(DetentClass::Single),
            2 => Ok(DetentClass::Double),
            _ => Ok(DetentClass::Triple),
        }
    }

    /// Rest state the sheet starts in, derived from the initial index.
    ///
    /// For a single detent the sheet always starts expanded.
    pub fn initial_rest_state(&self) -> Result<SheetState, SheetError> {
        let class = self.class()?;
        let index = self.initial_index;
        let count = class.meaningful_count();
        if index >= count {
            return Err(SheetError::OutOfRange { index, count });
        }
        Ok(match (class, index) {
            (DetentClass::Single, _) => SheetState::Expanded,
            (DetentClass::Double, 0) => SheetState::Collapsed,
            (DetentClass::Double, _) => SheetState::Expanded,
            (DetentClass::Triple, 0) => SheetState::Collapsed,
            (DetentClass::Triple, 1) => SheetState::HalfExpanded,
            (DetentClass::Triple, _) => SheetState::Expanded,
        })
    }

    /// Detent at `index` checked to be a usable fraction in `(0, 1]`.
    pub(crate) fn fraction(&self, index: usize) -> Result<f64, SheetError> {
        let value = self.at(index)?;
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(value)
        } else {
            Err(SheetError::invalid(format!(
                "detent {index} is {value}, expected a fraction in (0, 1]"
            )))
        }
    }

    /// Eagerly check the whole set.
    ///
    /// Returns every problem found. An empty list means the set resolves.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.values.is_empty() {
            errors.push("at least one detent is required".to_string());
            return errors;
        }
        for (i, value) in self.values.iter().enumerate() {
            if !(value.is_finite() && *value > 0.0 && *value <= 1.0) {
                errors.push(format!("detent {i} is {value}, expected a fraction in (0, 1]"));
            }
        }
        for (i, pair) in self.values.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                errors.push(format!(
                    "detents must increase: detent {} ({}) >= detent {} ({})",
                    i,
                    pair[0],
                    i + 1,
                    pair[1]
                ));
            }
        }
        let count = self.values.len().min(MAX_MEANINGFUL_DETENTS);
        if self.initial_index >= count {
            errors.push(format!(
                "initial detent index {} out of range for {} detent(s)",
                self.initial_index, count
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_reports_out_of_range() {
        let detents = Detents::new(vec![0.4, 0.8], 0);
        assert_eq!(detents.count(), 2);
        assert_eq!(detents.at(1), Ok(0.8));
        assert_eq!(
            detents.at(2),
            Err(SheetError::OutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn class_by_count() {
        assert!(Detents::new(vec![], 0).class().is_err());
        assert_eq!(Detents::single(0.5).class(), Ok(DetentClass::Single));
        assert_eq!(
            Detents::new(vec![0.2, 0.9], 0).class(),
            Ok(DetentClass::Double)
        );
        assert_eq!(
            Detents::new(vec![0.2, 0.5, 0.7, 0.9], 0).class(),
            Ok(DetentClass::Triple)
        );
    }

    #[test]
    fn initial_state_two_detents() {
        let collapsed = Detents::new(vec![0.3, 0.7], 0);
        let expanded = Detents::new(vec![0.3, 0.7], 1);
        assert_eq!(collapsed.initial_rest_state(), Ok(SheetState::Collapsed));
        assert_eq!(expanded.initial_rest_state(), Ok(SheetState::Expanded));
    }

    #[test]
    fn initial_state_three_detents() {
        let states: Vec<_> = (0..3)
            .map(|i| Detents::new(vec![0.3, 0.6, 0.9], i).initial_rest_state())
            .collect();
        assert_eq!(
            states,
            vec![
                Ok(SheetState::Collapsed),
                Ok(SheetState::HalfExpanded),
                Ok(SheetState::Expanded)
            ]
        );
    }

    #[test]
    fn initial_index_beyond_meaningful_detents() {
        let detents = Detents::new(vec![0.2, 0.4, 0.6, 0.8], 3);
        assert_eq!(
            detents.initial_rest_state(),
            Err(SheetError::OutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn validate_collects_every_problem() {
        let detents = Detents::new(vec![0.5, 0.0, 1.2], 5);
        let errors = detents.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(Detents::new(vec![0.25, 0.5, 1.0], 2).validate().is_empty());
    }
}
