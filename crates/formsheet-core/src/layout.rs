#![forbid(unsafe_code)]

//! Sheet layout resolution.
//!
//! [`resolve`] turns a detent set, the keyboard condition, and the container
//! height into the concrete parameters a platform sheet needs. It is a pure
//! function: the same inputs always produce the same [`LayoutParams`].
//!
//! # Geometry
//!
//! | detents | rest state | fit to contents | populated |
//! |---------|------------|-----------------|-----------|
//! | 1 | Expanded | yes | `max_height` |
//! | 2 | from index | yes | `peek_height`, `max_height` |
//! | 3+ | from index | no | `peek_height`, `expanded_offset`, `half_expanded_ratio` |
//!
//! A visible keyboard forces the sheet expanded and shrinks the max height by
//! the keyboard height, never below one pixel.
//!
//! # Failure Modes
//!
//! - Zero container height: [`SheetError::ContainerHeightUnavailable`].
//! - Detent outside `(0, 1]`, empty set, or a half-expanded ratio outside
//!   `(0, 1)`: [`SheetError::InvalidDetentConfiguration`].
//! - Initial index outside the meaningful detents: [`SheetError::OutOfRange`].

use crate::detent::{DetentClass, Detents};
use crate::error::SheetError;
use crate::keyboard::KeyboardState;

// ============================================================================
// Sheet State
// ============================================================================

/// Physical state of a platform sheet.
///
/// Rest states: Expanded ⇄ HalfExpanded ⇄ Collapsed ⇄ Hidden. `Dragging` and
/// `Settling` are transient and only reported by the platform while the user
/// moves the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetState {
    /// Fully expanded.
    Expanded,
    /// Resting at the intermediate detent.
    HalfExpanded,
    /// Resting at the peek height.
    Collapsed,
    /// Off screen; the owning screen should be dismissed.
    Hidden,
    /// Following the user's finger.
    Dragging,
    /// Animating towards a rest state after a drag.
    Settling,
}

impl SheetState {
    /// Whether the sheet is at rest.
    #[inline]
    pub fn is_resting(self) -> bool {
        !matches!(self, Self::Dragging | Self::Settling)
    }
}

// ============================================================================
// Layout Parameters
// ============================================================================

/// Concrete parameters for a platform sheet.
///
/// All heights are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// State the sheet should rest in.
    pub rest_state: SheetState,
    /// Whether dragging below the lowest detent hides the sheet.
    pub is_hideable: bool,
    /// Whether the user may drag the sheet.
    pub is_draggable: bool,
    /// Whether the collapsed state is skipped when hiding.
    pub skip_collapsed: bool,
    /// Whether the expanded height derives from content and detents rather
    /// than filling the container.
    pub is_fit_to_contents: bool,
    /// Height of the collapsed sheet.
    pub peek_height: Option<u32>,
    /// Maximum sheet height.
    pub max_height: Option<u32>,
    /// Distance from the container top to the expanded sheet's top edge.
    pub expanded_offset: Option<u32>,
    /// Half-expanded height as a fraction of the expanded height.
    pub half_expanded_ratio: Option<f32>,
}

impl LayoutParams {
    fn base(rest_state: SheetState) -> Self {
        Self {
            rest_state,
            is_hideable: true,
            is_draggable: true,
            skip_collapsed: false,
            is_fit_to_contents: true,
            peek_height: None,
            max_height: None,
            expanded_offset: None,
            half_expanded_ratio: None,
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

#[inline]
fn scale(fraction: f64, container_height: u32) -> u32 {
    (fraction * f64::from(container_height)).round() as u32
}

/// Keyboard-free geometry for a detent set.
fn resolve_geometry(detents: &Detents, container_height: u32) -> Result<LayoutParams, SheetError> {
    let class = detents.class()?;
    let rest_state = detents.initial_rest_state()?;
    let mut params = LayoutParams::base(rest_state);

    match class {
        DetentClass::Single => {
            let top = detents.fraction(0)?;
            params.skip_collapsed = true;
            params.max_height = Some(scale(top, container_height));
        }
        DetentClass::Double => {
            let low = detents.fraction(0)?;
            let high = detents.fraction(1)?;
            params.peek_height = Some(scale(low, container_height));
            params.max_height = Some(scale(high, container_height));
        }
        DetentClass::Triple => {
            let low = detents.fraction(0)?;
            let mid = detents.fraction(1)?;
            let high = detents.fraction(2)?;
            let ratio = mid / high;
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(SheetError::invalid(format!(
                    "half-expanded ratio {mid} / {high} = {ratio} is not in (0, 1)"
                )));
            }
            params.is_fit_to_contents = false;
            params.peek_height = Some(scale(low, container_height));
            params.expanded_offset = Some(scale(1.0 - high, container_height));
            params.half_expanded_ratio = Some(ratio as f32);
        }
    }

    Ok(params)
}

/// Resolve the layout for a detent set under the given keyboard condition.
///
/// `NotVisible` and `DidHide` produce identical parameters; the difference
/// between them only matters to whoever applies the result.
pub fn resolve(
    detents: &Detents,
    keyboard: KeyboardState,
    container_height: u32,
) -> Result<LayoutParams, SheetError> {
    if container_height == 0 {
        return Err(SheetError::ContainerHeightUnavailable);
    }

    let mut params = resolve_geometry(detents, container_height)?;

    match keyboard {
        KeyboardState::NotVisible | KeyboardState::DidHide => {}
        KeyboardState::Visible(keyboard_height) => {
            // Three detents leave max height unset; the container bounds it.
            let base_max = params.max_height.unwrap_or(container_height);
            params.rest_state = SheetState::Expanded;
            params.skip_collapsed = false;
            params.is_fit_to_contents = true;
            params.max_height = Some(base_max.saturating_sub(keyboard_height).max(1));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "formsheet.sheet",
        detents = detents.count(),
        container_height,
        keyboard = ?keyboard,
        rest_state = ?params.rest_state,
        "resolved sheet layout"
    );

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detents(values: &[f64], index: usize) -> Detents {
        Detents::new(values.to_vec(), index)
    }

    #[test]
    fn single_detent_is_fit_to_contents() {
        let params = resolve(&detents(&[0.7], 0), KeyboardState::NotVisible, 1000).unwrap();
        assert_eq!(params.rest_state, SheetState::Expanded);
        assert!(params.skip_collapsed);
        assert!(params.is_fit_to_contents);
        assert_eq!(params.max_height, Some(700));
        assert_eq!(params.peek_height, None);
        assert_eq!(params.expanded_offset, None);
        assert_eq!(params.half_expanded_ratio, None);
    }

    #[test]
    fn two_detents_populate_peek_and_max() {
        let params = resolve(&detents(&[0.25, 0.75], 0), KeyboardState::NotVisible, 800).unwrap();
        assert_eq!(params.rest_state, SheetState::Collapsed);
        assert!(!params.skip_collapsed);
        assert!(params.is_fit_to_contents);
        assert_eq!(params.peek_height, Some(200));
        assert_eq!(params.max_height, Some(600));
        assert_eq!(params.expanded_offset, None);
    }

    #[test]
    fn three_detents_scenario() {
        let params =
            resolve(&detents(&[0.3, 0.6, 0.9], 1), KeyboardState::NotVisible, 1000).unwrap();
        assert_eq!(params.rest_state, SheetState::HalfExpanded);
        assert!(!params.is_fit_to_contents);
        assert_eq!(params.peek_height, Some(300));
        assert_eq!(params.expanded_offset, Some(100));
        assert_eq!(params.max_height, None);
        let ratio = params.half_expanded_ratio.unwrap();
        assert!((ratio - 0.6 / 0.9).abs() < 1e-6, "ratio = {ratio}");
    }

    #[test]
    fn zero_top_detent_is_invalid() {
        let err = resolve(&detents(&[0.3, 0.6, 0.0], 0), KeyboardState::NotVisible, 1000)
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidDetentConfiguration { .. }));
    }

    #[test]
    fn non_increasing_triple_is_invalid() {
        let err = resolve(&detents(&[0.3, 0.9, 0.6], 0), KeyboardState::NotVisible, 1000)
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidDetentConfiguration { .. }));
    }

    #[test]
    fn zero_container_height_fails() {
        assert_eq!(
            resolve(&detents(&[0.5], 0), KeyboardState::NotVisible, 0),
            Err(SheetError::ContainerHeightUnavailable)
        );
    }

    #[test]
    fn keyboard_shrinks_max_height() {
        let params = resolve(&detents(&[0.5], 0), KeyboardState::Visible(300), 800).unwrap();
        assert_eq!(params.rest_state, SheetState::Expanded);
        assert!(params.is_fit_to_contents);
        assert!(!params.skip_collapsed);
        assert_eq!(params.max_height, Some(100));
    }

    #[test]
    fn keyboard_taller_than_sheet_floors_at_one() {
        let params = resolve(&detents(&[0.2, 0.4], 0), KeyboardState::Visible(5000), 1000).unwrap();
        assert_eq!(params.max_height, Some(1));
        assert_eq!(params.rest_state, SheetState::Expanded);
    }

    #[test]
    fn keyboard_with_three_detents_uses_container_height() {
        let params =
            resolve(&detents(&[0.3, 0.6, 0.9], 0), KeyboardState::Visible(400), 1000).unwrap();
        assert_eq!(params.max_height, Some(600));
        assert!(params.is_fit_to_contents);
        assert_eq!(params.peek_height, Some(300));
    }

    #[test]
    fn did_hide_matches_not_visible() {
        let set = detents(&[0.3, 0.6, 0.9], 2);
        assert_eq!(
            resolve(&set, KeyboardState::DidHide, 1234),
            resolve(&set, KeyboardState::NotVisible, 1234)
        );
    }

    #[test]
    fn extra_detents_use_first_three() {
        let four = resolve(&detents(&[0.3, 0.6, 0.9, 1.0], 0), KeyboardState::NotVisible, 1000);
        let three = resolve(&detents(&[0.3, 0.6, 0.9], 0), KeyboardState::NotVisible, 1000);
        assert_eq!(four, three);
    }

    #[test]
    fn resting_states() {
        assert!(SheetState::Collapsed.is_resting());
        assert!(SheetState::Hidden.is_resting());
        assert!(!SheetState::Dragging.is_resting());
        assert!(!SheetState::Settling.is_resting());
    }
}
