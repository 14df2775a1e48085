#![forbid(unsafe_code)]

//! On-screen keyboard condition as last reported by the host.

/// Last known keyboard condition.
///
/// Only the latest value matters; states are not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardState {
    /// No keyboard on screen.
    #[default]
    NotVisible,
    /// The keyboard just hid. Clears keyboard-only behavior without forcing
    /// the sheet into a rest state.
    DidHide,
    /// The keyboard occupies this many pixels at the bottom of the window.
    Visible(u32),
}

impl KeyboardState {
    /// Derive the next state from an inset-change notification.
    ///
    /// A visible keyboard with zero height is treated as hidden.
    pub fn from_inset_change(previous: Self, visible: bool, height: u32) -> Self {
        match (visible && height > 0, previous) {
            (true, _) => Self::Visible(height),
            (false, Self::Visible(_)) => Self::DidHide,
            (false, Self::NotVisible | Self::DidHide) => Self::NotVisible,
        }
    }

    /// Keyboard height, if visible.
    #[inline]
    pub fn height(self) -> Option<u32> {
        match self {
            Self::Visible(height) => Some(height),
            Self::NotVisible | Self::DidHide => None,
        }
    }

    /// Whether the keyboard currently covers part of the window.
    #[inline]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible(_))
    }
}
