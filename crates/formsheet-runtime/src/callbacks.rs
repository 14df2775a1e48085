#![forbid(unsafe_code)]

//! Sheet state callbacks owned by a behavior controller.
//!
//! The platform sheet reports physical state changes; the controller routes
//! each change through whatever callbacks are currently registered here.
//!
//! # How it works
//!
//! 1. `configure` re-registers [`SheetCallback::DismissOnHidden`] by removing
//!    and re-adding it, so repeated configuration never stacks duplicates
//! 2. [`SheetCallback::KeyboardDismissOnCollapse`] is registered only while the
//!    keyboard is visible and removed before any keyboard-free geometry is
//!    applied
//! 3. Removing a callback that is not registered is a no-op

/// Callbacks a controller can register against its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetCallback {
    /// Dismiss the owning screen once the sheet reaches `Hidden`.
    DismissOnHidden,
    /// Hide the on-screen keyboard once the sheet reaches `Collapsed`.
    KeyboardDismissOnCollapse,
}

impl SheetCallback {
    /// Stable label for logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::DismissOnHidden => "dismiss_on_hidden",
            Self::KeyboardDismissOnCollapse => "keyboard_dismiss_on_collapse",
        }
    }
}

/// Ordered list of registered callbacks.
///
/// Mirrors how platform sheets keep callbacks: adding twice registers twice,
/// removing drops one registration.
#[derive(Debug, Clone, Default)]
pub struct SheetCallbacks {
    registered: Vec<SheetCallback>,
}

impl SheetCallbacks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback.
    pub fn add(&mut self, callback: SheetCallback) {
        tracing::debug!(
            target: "formsheet.sheet",
            callback = callback.label(),
            "registering sheet callback"
        );
        self.registered.push(callback);
    }

    /// Drop one registration of `callback`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&mut self, callback: SheetCallback) -> bool {
        match self.registered.iter().position(|c| *c == callback) {
            Some(index) => {
                self.registered.remove(index);
                tracing::debug!(
                    target: "formsheet.sheet",
                    callback = callback.label(),
                    "removed sheet callback"
                );
                true
            }
            None => false,
        }
    }

    /// Register `callback` so that exactly one registration exists afterwards.
    pub fn ensure_once(&mut self, callback: SheetCallback) {
        while self.remove(callback) {}
        self.add(callback);
    }

    /// Number of registrations of `callback`.
    pub fn count(&self, callback: SheetCallback) -> usize {
        self.registered.iter().filter(|c| **c == callback).count()
    }

    /// Whether `callback` is registered at least once.
    pub fn contains(&self, callback: SheetCallback) -> bool {
        self.registered.contains(&callback)
    }

    /// Snapshot of the registrations in order, for dispatch.
    pub(crate) fn snapshot(&self) -> Vec<SheetCallback> {
        self.registered.clone()
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_unregistered_is_noop() {
        let mut callbacks = SheetCallbacks::new();
        assert!(!callbacks.remove(SheetCallback::DismissOnHidden));
        assert!(callbacks.is_empty());
    }

    #[test]
    fn add_twice_registers_twice() {
        let mut callbacks = SheetCallbacks::new();
        callbacks.add(SheetCallback::DismissOnHidden);
        callbacks.add(SheetCallback::DismissOnHidden);
        assert_eq!(callbacks.count(SheetCallback::DismissOnHidden), 2);
        assert!(callbacks.remove(SheetCallback::DismissOnHidden));
        assert_eq!(callbacks.count(SheetCallback::DismissOnHidden), 1);
    }

    #[test]
    fn ensure_once_collapses_duplicates() {
        let mut callbacks = SheetCallbacks::new();
        callbacks.add(SheetCallback::DismissOnHidden);
        callbacks.add(SheetCallback::KeyboardDismissOnCollapse);
        callbacks.add(SheetCallback::DismissOnHidden);
        callbacks.ensure_once(SheetCallback::DismissOnHidden);
        assert_eq!(callbacks.count(SheetCallback::DismissOnHidden), 1);
        assert_eq!(callbacks.count(SheetCallback::KeyboardDismissOnCollapse), 1);
        assert_eq!(callbacks.len(), 2);
    }
}
