#![forbid(unsafe_code)]

//! Runtime: the stateful half of a form sheet screen.
//!
//! - [`behavior`] drives the platform sheet from resolved layouts and reacts
//!   to its state changes.
//! - [`transition`] forwards renderer animation callbacks as start, progress
//!   and end signals.
//! - [`navigation`] answers whether a screen can go back and dismisses it
//!   from its stack.
//! - [`config`] holds host-provided sheet configuration.
//!
//! All of it runs on the UI thread; nothing here is `Send`.

pub mod behavior;
pub mod callbacks;
pub mod config;
pub mod navigation;
pub mod transition;

pub use behavior::{
    KeyboardService, RemovalStrategy, ScreenRemoval, SheetBehaviorController, SheetReaction,
    SheetWidget,
};
pub use callbacks::{SheetCallback, SheetCallbacks};
pub use config::{SheetConfig, SheetConfigError};
pub use navigation::{
    ContainerId, ContainerKind, DismissOutcome, NavigationError, ScreenId, ScreenTree,
    StackHandle,
};
pub use transition::{
    Animation, AnimationGroup, AnimationMember, AttachStrategy, ContainerNotifier, LifecyclePhase,
    ListenerTag, ProgressClock, TRANSITION_LISTENER, TransitionListener, TransitionPhase,
    TransitionProgressEmitter, attach_progress,
};
