#![forbid(unsafe_code)]

//! Sheet behavior controller.
//!
//! A [`SheetBehaviorController`] owns the live [`LayoutParams`] of one screen's
//! sheet. It re-resolves the layout whenever the keyboard or the detent
//! configuration changes, applies the result to the platform sheet in one
//! call, and reacts to physical state changes the platform reports.
//!
//! # Invariants
//!
//! 1. **Resolve then apply**: a failed resolution leaves the live parameters
//!    and the platform sheet untouched.
//! 2. **Single dismiss callback**: after any `configure`, exactly one
//!    [`SheetCallback::DismissOnHidden`] is registered.
//! 3. **Keyboard callback scope**: [`SheetCallback::KeyboardDismissOnCollapse`]
//!    is registered only while the keyboard is visible, and is removed before
//!    keyboard-free geometry is applied.
//! 4. **Idempotent dismissal**: once a removal succeeds it never runs again.
//!    A failed removal leaves the controller undismissed.
//!
//! # Failure Modes
//!
//! - No container height: `configure` fails with
//!   [`SheetError::ContainerHeightUnavailable`]. This is an environment bug.
//! - Focus cannot be acquired on collapse: the keyboard is left alone.
//! - The screen is not in a stack: dismissal fails with
//!   [`NavigationError::NotAStack`] and is reported as
//!   [`SheetReaction::DismissFailed`].

use formsheet_core::{
    ContainerHeightSource, Detents, KeyboardState, LayoutParams, SheetError, SheetState,
    resolve, resolve_container_height,
};

use crate::callbacks::{SheetCallback, SheetCallbacks};
use crate::navigation::{DismissOutcome, NavigationError};

// ============================================================================
// Collaborators
// ============================================================================

/// The platform sheet a controller drives.
pub trait SheetWidget {
    /// Apply a complete set of parameters.
    ///
    /// `rest_state` is `Some` when the sheet should also be moved to that
    /// state, `None` when its current physical state must be kept.
    fn apply_layout(&mut self, params: &LayoutParams, rest_state: Option<SheetState>);

    /// Try to move input focus onto the sheet surface.
    fn request_focus(&mut self) -> bool;
}

/// Platform input method service.
pub trait KeyboardService {
    /// Hide the on-screen keyboard.
    fn hide_keyboard(&mut self);
}

/// Removes the owning screen from whatever presents it.
pub trait ScreenRemoval {
    /// Remove the screen.
    fn remove_screen(&mut self) -> Result<(), NavigationError>;
}

/// How a hidden sheet's screen is removed. Chosen once per controller.
pub enum RemovalStrategy {
    /// A dimmed backdrop coordinator owns the screen and commits its removal.
    /// The host supplies that coordinator's commit; the stack is not touched.
    Supervised(Box<dyn ScreenRemoval>),
    /// The screen is dismissed straight from its stack.
    Direct(Box<dyn ScreenRemoval>),
}

impl RemovalStrategy {
    /// Label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supervised(_) => "supervised",
            Self::Direct(_) => "direct",
        }
    }

    fn run(&mut self) -> Result<(), NavigationError> {
        match self {
            Self::Supervised(remover) | Self::Direct(remover) => remover.remove_screen(),
        }
    }
}

impl std::fmt::Debug for RemovalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RemovalStrategy").field(&self.label()).finish()
    }
}

/// What the controller did in response to a physical state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetReaction {
    /// Nothing to do for this state.
    Ignored,
    /// The sheet was hidden and the screen dismissed (or already was).
    Dismiss(DismissOutcome),
    /// The sheet was hidden but the screen could not be removed.
    DismissFailed(NavigationError),
    /// The sheet collapsed and the keyboard was hidden.
    KeyboardHidden,
    /// The sheet collapsed but focus could not be acquired, so the keyboard
    /// was left visible.
    FocusRefused,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the live layout of one screen's sheet.
pub struct SheetBehaviorController<W: SheetWidget> {
    widget: W,
    keyboard_service: Box<dyn KeyboardService>,
    removal: RemovalStrategy,
    height_sources: Vec<Box<dyn ContainerHeightSource>>,
    detents: Detents,
    callbacks: SheetCallbacks,
    params: Option<LayoutParams>,
    keyboard: KeyboardState,
    physical: Option<SheetState>,
    dismissed: bool,
}

impl<W: SheetWidget> SheetBehaviorController<W> {
    /// Create a controller. Nothing is applied until [`create_initial`].
    ///
    /// `height_sources` are queried in order on every configuration.
    ///
    /// [`create_initial`]: Self::create_initial
    pub fn new(
        widget: W,
        detents: Detents,
        height_sources: Vec<Box<dyn ContainerHeightSource>>,
        keyboard_service: Box<dyn KeyboardService>,
        removal: RemovalStrategy,
    ) -> Self {
        Self {
            widget,
            keyboard_service,
            removal,
            height_sources,
            detents,
            callbacks: SheetCallbacks::new(),
            params: None,
            keyboard: KeyboardState::NotVisible,
            physical: None,
            dismissed: false,
        }
    }

    /// The platform sheet.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Mutable access to the platform sheet.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Live parameters, once configured.
    pub fn params(&self) -> Option<&LayoutParams> {
        self.params.as_ref()
    }

    /// Current detent configuration.
    pub fn detents(&self) -> &Detents {
        &self.detents
    }

    /// Keyboard state of the last successful configuration.
    pub fn keyboard(&self) -> KeyboardState {
        self.keyboard
    }

    /// Registered sheet callbacks.
    pub fn callbacks(&self) -> &SheetCallbacks {
        &self.callbacks
    }

    /// Last physical state reported by the platform.
    pub fn physical_state(&self) -> Option<SheetState> {
        self.physical
    }

    /// Whether the screen has been dismissed.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// First-time setup; same as `configure(KeyboardState::NotVisible)`.
    pub fn create_initial(&mut self) -> Result<LayoutParams, SheetError> {
        self.configure(KeyboardState::NotVisible)
    }

    /// Resolve and apply the layout for `keyboard`.
    pub fn configure(&mut self, keyboard: KeyboardState) -> Result<LayoutParams, SheetError> {
        let _span = tracing::debug_span!(
            "sheet.configure",
            keyboard = ?keyboard,
            detents = self.detents.count(),
        )
        .entered();

        let params = self.resolve_with(&self.detents, keyboard)?;
        self.install(params, keyboard);
        Ok(params)
    }

    /// Replace the detent configuration and re-apply it under the current
    /// keyboard state. A keyboard that just hid counts as not visible.
    ///
    /// On failure the previous detents stay in effect.
    pub fn set_detents(&mut self, detents: Detents) -> Result<LayoutParams, SheetError> {
        let _span = tracing::debug_span!(
            "sheet.set_detents",
            detents = detents.count(),
            initial_index = detents.initial_index(),
        )
        .entered();

        // A new configuration picks its own rest state once the keyboard is gone.
        let keyboard = match self.keyboard {
            KeyboardState::DidHide => KeyboardState::NotVisible,
            other => other,
        };
        let params = self.resolve_with(&detents, keyboard)?;
        self.detents = detents;
        self.install(params, keyboard);
        Ok(params)
    }

    /// Derive the keyboard state from an inset notification and configure.
    pub fn on_keyboard_insets(
        &mut self,
        visible: bool,
        height: u32,
    ) -> Result<LayoutParams, SheetError> {
        let next = KeyboardState::from_inset_change(self.keyboard, visible, height);
        self.configure(next)
    }

    fn resolve_with(
        &self,
        detents: &Detents,
        keyboard: KeyboardState,
    ) -> Result<LayoutParams, SheetError> {
        let sources: Vec<&dyn ContainerHeightSource> =
            self.height_sources.iter().map(|source| &**source).collect();
        let height = resolve_container_height(&sources).inspect_err(|err| {
            tracing::error!(target: "formsheet.sheet", error = %err, "sheet configuration aborted");
        })?;
        resolve(detents, keyboard, height)
    }

    fn install(&mut self, params: LayoutParams, keyboard: KeyboardState) {
        self.callbacks.ensure_once(SheetCallback::DismissOnHidden);

        let rest_state = match keyboard {
            KeyboardState::Visible(_) => {
                self.callbacks
                    .ensure_once(SheetCallback::KeyboardDismissOnCollapse);
                Some(params.rest_state)
            }
            KeyboardState::NotVisible => {
                self.callbacks
                    .remove(SheetCallback::KeyboardDismissOnCollapse);
                Some(params.rest_state)
            }
            KeyboardState::DidHide => {
                self.callbacks
                    .remove(SheetCallback::KeyboardDismissOnCollapse);
                None
            }
        };

        self.widget.apply_layout(&params, rest_state);
        if let Some(state) = rest_state {
            self.physical = Some(state);
        }
        self.params = Some(params);
        self.keyboard = keyboard;

        tracing::debug!(
            target: "formsheet.sheet",
            rest_state = ?params.rest_state,
            peek_height = ?params.peek_height,
            max_height = ?params.max_height,
            forced = rest_state.is_some(),
            "sheet layout applied"
        );
    }

    /// React to a physical state change reported by the platform.
    pub fn on_sheet_state_changed(&mut self, state: SheetState) -> SheetReaction {
        self.physical = Some(state);
        tracing::debug!(target: "formsheet.sheet", state = ?state, "sheet state changed");

        let mut reaction = SheetReaction::Ignored;
        for callback in self.callbacks.snapshot() {
            match (callback, state) {
                (SheetCallback::DismissOnHidden, SheetState::Hidden) => {
                    reaction = match self.dismiss() {
                        Ok(outcome) => SheetReaction::Dismiss(outcome),
                        Err(err) => SheetReaction::DismissFailed(err),
                    };
                }
                (SheetCallback::KeyboardDismissOnCollapse, SheetState::Collapsed) => {
                    reaction = self.hide_keyboard();
                }
                _ => {}
            }
        }
        reaction
    }

    /// Remove the owning screen using the configured strategy.
    ///
    /// Only the first successful call does anything. On failure the
    /// controller stays undismissed and a later call tries again.
    pub fn dismiss(&mut self) -> Result<DismissOutcome, NavigationError> {
        if self.dismissed {
            tracing::debug!(target: "formsheet.sheet", "dismiss ignored, already dismissed");
            return Ok(DismissOutcome::AlreadyDismissed);
        }
        tracing::info!(
            target: "formsheet.sheet",
            strategy = self.removal.label(),
            "dismissing hidden sheet"
        );
        self.removal.run().inspect_err(|err| {
            tracing::error!(target: "formsheet.sheet", error = %err, "sheet dismissal failed");
        })?;
        self.dismissed = true;
        Ok(DismissOutcome::Dismissed)
    }

    fn hide_keyboard(&mut self) -> SheetReaction {
        if !self.widget.request_focus() {
            tracing::warn!(
                target: "formsheet.sheet",
                "sheet could not take focus, keyboard left visible"
            );
            return SheetReaction::FocusRefused;
        }
        self.keyboard_service.hide_keyboard();
        SheetReaction::KeyboardHidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsheet_core::FixedHeight;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeSheet {
        applied: Vec<(LayoutParams, Option<SheetState>)>,
        grant_focus: bool,
    }

    impl SheetWidget for FakeSheet {
        fn apply_layout(&mut self, params: &LayoutParams, rest_state: Option<SheetState>) {
            self.applied.push((*params, rest_state));
        }
        fn request_focus(&mut self) -> bool {
            self.grant_focus
        }
    }

    struct CountingKeyboard(Rc<Cell<u32>>);

    impl KeyboardService for CountingKeyboard {
        fn hide_keyboard(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct Log(Rc<RefCell<Vec<&'static str>>>, &'static str);

    impl ScreenRemoval for Log {
        fn remove_screen(&mut self) -> Result<(), NavigationError> {
            self.0.borrow_mut().push(self.1);
            Ok(())
        }
    }

    struct Harness {
        controller: SheetBehaviorController<FakeSheet>,
        hides: Rc<Cell<u32>>,
        removals: Rc<RefCell<Vec<&'static str>>>,
    }

    fn harness(values: &[f64], index: usize, height: u32, supervised: bool) -> Harness {
        let hides = Rc::new(Cell::new(0));
        let removals = Rc::new(RefCell::new(Vec::new()));
        let removal = if supervised {
            RemovalStrategy::Supervised(Box::new(Log(removals.clone(), "commit")))
        } else {
            RemovalStrategy::Direct(Box::new(Log(removals.clone(), "dismiss")))
        };
        let controller = SheetBehaviorController::new(
            FakeSheet {
                grant_focus: true,
                ..FakeSheet::default()
            },
            Detents::new(values.to_vec(), index),
            vec![Box::new(FixedHeight(height))],
            Box::new(CountingKeyboard(hides.clone())),
            removal,
        );
        Harness {
            controller,
            hides,
            removals,
        }
    }

    #[test]
    fn configure_twice_is_idempotent() {
        let mut h = harness(&[0.3, 0.6, 0.9], 1, 1000, false);
        let first = h.controller.create_initial().unwrap();
        let second = h.controller.configure(KeyboardState::NotVisible).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            h.controller.callbacks().count(SheetCallback::DismissOnHidden),
            1
        );
        assert_eq!(h.controller.widget().applied.len(), 2);
    }

    #[test]
    fn keyboard_round_trip_restores_layout() {
        let mut h = harness(&[0.4, 0.8], 0, 1000, false);
        let rest = h.controller.create_initial().unwrap();
        let raised = h.controller.configure(KeyboardState::Visible(300)).unwrap();
        assert_eq!(raised.rest_state, SheetState::Expanded);
        assert_eq!(raised.max_height, Some(500));
        assert!(h
            .controller
            .callbacks()
            .contains(SheetCallback::KeyboardDismissOnCollapse));

        let restored = h.controller.configure(KeyboardState::DidHide).unwrap();
        assert_eq!(restored, rest);
        assert!(!h
            .controller
            .callbacks()
            .contains(SheetCallback::KeyboardDismissOnCollapse));
        let (_, forced) = h.controller.widget().applied.last().copied().unwrap();
        assert_eq!(forced, None, "DidHide must not move the sheet");
    }

    #[test]
    fn repeated_keyboard_does_not_stack_callbacks_or_shrink() {
        let mut h = harness(&[0.5], 0, 800, false);
        h.controller.create_initial().unwrap();
        let a = h.controller.configure(KeyboardState::Visible(300)).unwrap();
        let b = h.controller.configure(KeyboardState::Visible(300)).unwrap();
        assert_eq!(a.max_height, Some(100));
        assert_eq!(a, b);
        assert_eq!(
            h.controller
                .callbacks()
                .count(SheetCallback::KeyboardDismissOnCollapse),
            1
        );
    }

    #[test]
    fn failed_configure_keeps_previous_state() {
        let mut h = harness(&[0.5], 0, 800, false);
        let before = h.controller.create_initial().unwrap();
        let err = h
            .controller
            .set_detents(Detents::new(vec![0.3, 0.6, 0.0], 0))
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidDetentConfiguration { .. }));
        assert_eq!(h.controller.params(), Some(&before));
        assert_eq!(h.controller.detents(), &Detents::single(0.5));
        assert_eq!(h.controller.widget().applied.len(), 1);
    }

    #[test]
    fn missing_height_is_fatal() {
        let mut controller = SheetBehaviorController::new(
            FakeSheet::default(),
            Detents::single(0.5),
            Vec::new(),
            Box::new(CountingKeyboard(Rc::new(Cell::new(0)))),
            RemovalStrategy::Direct(Box::new(Log(Rc::default(), "dismiss"))),
        );
        assert_eq!(
            controller.create_initial(),
            Err(SheetError::ContainerHeightUnavailable)
        );
        assert!(controller.params().is_none());
        assert!(controller.callbacks().is_empty());
    }

    #[test]
    fn hidden_dismisses_once() {
        let mut h = harness(&[0.5], 0, 800, true);
        h.controller.create_initial().unwrap();
        h.controller.configure(KeyboardState::NotVisible).unwrap();
        assert_eq!(
            h.controller.on_sheet_state_changed(SheetState::Hidden),
            SheetReaction::Dismiss(DismissOutcome::Dismissed)
        );
        assert_eq!(
            h.controller.on_sheet_state_changed(SheetState::Hidden),
            SheetReaction::Dismiss(DismissOutcome::AlreadyDismissed)
        );
        assert_eq!(*h.removals.borrow(), vec!["commit"]);
        assert!(h.controller.is_dismissed());
    }

    #[test]
    fn collapse_hides_keyboard_only_while_visible() {
        let mut h = harness(&[0.3, 0.9], 1, 1000, false);
        h.controller.create_initial().unwrap();
        assert_eq!(
            h.controller.on_sheet_state_changed(SheetState::Collapsed),
            SheetReaction::Ignored
        );
        h.controller.configure(KeyboardState::Visible(250)).unwrap();
        assert_eq!(
            h.controller.on_sheet_state_changed(SheetState::Collapsed),
            SheetReaction::KeyboardHidden
        );
        assert_eq!(h.hides.get(), 1);
    }

    #[test]
    fn focus_refusal_leaves_keyboard() {
        let mut h = harness(&[0.3, 0.9], 1, 1000, false);
        h.controller.widget_mut().grant_focus = false;
        h.controller.configure(KeyboardState::Visible(250)).unwrap();
        assert_eq!(
            h.controller.on_sheet_state_changed(SheetState::Collapsed),
            SheetReaction::FocusRefused
        );
        assert_eq!(h.hides.get(), 0);
    }

    #[test]
    fn transient_states_are_ignored() {
        let mut h = harness(&[0.3, 0.9], 1, 1000, false);
        h.controller.configure(KeyboardState::Visible(250)).unwrap();
        for state in [SheetState::Dragging, SheetState::Settling, SheetState::Expanded] {
            assert_eq!(
                h.controller.on_sheet_state_changed(state),
                SheetReaction::Ignored
            );
        }
        assert_eq!(h.controller.physical_state(), Some(SheetState::Expanded));
        assert!(h.removals.borrow().is_empty());
    }

    #[test]
    fn inset_notifications_drive_keyboard_state() {
        let mut h = harness(&[0.5], 0, 800, false);
        h.controller.create_initial().unwrap();
        h.controller.on_keyboard_insets(true, 300).unwrap();
        assert_eq!(h.controller.keyboard(), KeyboardState::Visible(300));
        h.controller.on_keyboard_insets(false, 0).unwrap();
        assert_eq!(h.controller.keyboard(), KeyboardState::DidHide);
        h.controller.on_keyboard_insets(false, 0).unwrap();
        assert_eq!(h.controller.keyboard(), KeyboardState::NotVisible);
    }

    #[test]
    fn failed_removal_is_reported_and_retried() {
        use crate::navigation::{ContainerKind, ScreenTree, StackHandle};
        use formsheet_core::StackPresentation;

        let tree = Rc::new(RefCell::new(ScreenTree::new()));
        let (tabs, screen) = {
            let mut t = tree.borrow_mut();
            let tabs = t.add_container(ContainerKind::Plain);
            (tabs, t.push_screen(tabs, StackPresentation::FormSheet).unwrap())
        };
        let mut controller = SheetBehaviorController::new(
            FakeSheet::default(),
            Detents::single(0.5),
            vec![Box::new(FixedHeight(800))],
            Box::new(CountingKeyboard(Rc::default())),
            RemovalStrategy::Direct(Box::new(StackHandle::new(tree.clone(), screen))),
        );
        controller.create_initial().unwrap();

        for _ in 0..2 {
            assert_eq!(
                controller.on_sheet_state_changed(SheetState::Hidden),
                SheetReaction::DismissFailed(NavigationError::NotAStack(screen))
            );
            assert!(!controller.is_dismissed());
        }
        assert_eq!(tree.borrow().container_of(screen), Ok(Some(tabs)));
        assert_eq!(
            controller.dismiss(),
            Err(NavigationError::NotAStack(screen))
        );
    }
}
