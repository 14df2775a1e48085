#![forbid(unsafe_code)]

//! Container height probing.
//!
//! Hosts can report the height a sheet is laid out against from several
//! places that differ slightly (the owning stack, the display metrics, the
//! window bounds). Sources are tried in order and the first positive height
//! wins.

use crate::error::SheetError;

/// A place the container height can be read from.
pub trait ContainerHeightSource {
    /// Current height in pixels, or `None` if this source cannot tell.
    fn container_height(&self) -> Option<u32>;
}

impl<F> ContainerHeightSource for F
where
    F: Fn() -> Option<u32>,
{
    fn container_height(&self) -> Option<u32> {
        self()
    }
}

/// A height known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeight(pub u32);

impl ContainerHeightSource for FixedHeight {
    fn container_height(&self) -> Option<u32> {
        (self.0 > 0).then_some(self.0)
    }
}

/// Return the first positive height reported by `sources`.
///
/// All sources coming back empty is a fatal precondition violation: there is
/// no safe default for a sheet's size.
pub fn resolve_container_height(
    sources: &[&dyn ContainerHeightSource],
) -> Result<u32, SheetError> {
    sources
        .iter()
        .filter_map(|source| source.container_height())
        .find(|height| *height > 0)
        .ok_or(SheetError::ContainerHeightUnavailable)
}
