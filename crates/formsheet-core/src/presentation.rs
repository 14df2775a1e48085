#![forbid(unsafe_code)]

//! How a screen is presented inside its stack.

/// Presentation style of a stack screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StackPresentation {
    /// Regular push onto the stack.
    #[default]
    Push,
    /// Full-screen modal.
    Modal,
    /// Modal that keeps the screen below visible.
    TransparentModal,
    /// Bottom sheet resting at configured detents.
    FormSheet,
}

impl StackPresentation {
    /// Whether this presentation is driven by a sheet.
    #[inline]
    pub fn is_sheet(self) -> bool {
        matches!(self, Self::FormSheet)
    }

    /// Whether a header bar is laid out above the content.
    #[inline]
    pub fn has_header_bar(self) -> bool {
        !matches!(self, Self::Modal | Self::FormSheet)
    }
}

/// Transition a sheet screen runs when entering or leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTransition {
    /// Slide up from the bottom edge.
    SlideInFromBottom,
    /// Slide down past the bottom edge.
    SlideOutToBottom,
}

/// Pick the transition for a screen. `None` means the host default.
pub fn transition_for(presentation: StackPresentation, enter: bool) -> Option<SheetTransition> {
    if !presentation.is_sheet() {
        return None;
    }
    Some(if enter {
        SheetTransition::SlideInFromBottom
    } else {
        SheetTransition::SlideOutToBottom
    })
}

/// Header settings relevant to content layout.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderConfig {
    /// Header is not shown.
    pub hidden: bool,
    /// Title font size.
    pub title_font_size: u32,
    /// Title text.
    pub title: String,
}

/// Measures a header before the host has laid it out.
pub trait HeaderMeasure {
    /// Header height for the given font size, or `None` if it cannot be measured.
    fn header_height(&self, title_font_size: u32, title_is_empty: bool) -> Option<f32>;
}

/// Top inset for screen content during the first layouts.
///
/// Until the host reports a frame (width or height still zero) the content is
/// pushed below the header so it does not jump once the real frame arrives.
/// Returns `None` once a frame is known or when there is no header.
pub fn header_content_inset(
    frame_width: f32,
    frame_height: f32,
    header: Option<&HeaderConfig>,
    measure: &dyn HeaderMeasure,
) -> Option<f32> {
    if frame_width != 0.0 && frame_height != 0.0 {
        return None;
    }
    let header = header?;
    if header.hidden {
        return Some(0.0);
    }
    let height = measure
        .header_height(header.title_font_size, header.title.is_empty())
        .unwrap_or(0.0);
    Some(height)
}
