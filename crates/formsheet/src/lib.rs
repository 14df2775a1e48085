#![forbid(unsafe_code)]

//! Form sheet screens: public facade.
//!
//! Re-exports the layout model from `formsheet-core` and the stateful
//! controller, transition and navigation pieces from `formsheet-runtime`,
//! plus a unified [`Error`] and a prelude for host glue.
//!
//! ```rust,ignore
//! use formsheet::prelude::*;
//!
//! let mut controller = SheetBehaviorController::new(
//!     sheet,
//!     Detents::new(vec![0.3, 0.6, 0.9], 1),
//!     vec![Box::new(FixedHeight(window_height))],
//!     Box::new(ime),
//!     RemovalStrategy::Direct(Box::new(stack_handle)),
//! );
//! controller.create_initial()?;
//! ```

pub mod error;

pub use error::{Error, FailureClass, Result};

// --- Core re-exports -------------------------------------------------------

pub use formsheet_core::{
    ContainerHeightSource, DetentClass, Detents, FixedHeight, HeaderConfig, HeaderMeasure,
    KeyboardState, LayoutParams, MAX_MEANINGFUL_DETENTS, SheetError, SheetState, SheetTransition,
    StackPresentation, header_content_inset, resolve, resolve_container_height, transition_for,
};

// --- Runtime re-exports ----------------------------------------------------

pub use formsheet_runtime::{
    Animation, AnimationGroup, AttachStrategy, ContainerId, ContainerKind, ContainerNotifier,
    DismissOutcome, KeyboardService, LifecyclePhase, NavigationError, RemovalStrategy,
    ScreenId, ScreenRemoval, ScreenTree, SheetBehaviorController, SheetCallback, SheetConfig,
    SheetConfigError, SheetReaction, SheetWidget, StackHandle, TransitionListener,
    TransitionPhase, TransitionProgressEmitter, attach_progress,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Detents, DismissOutcome, Error, FailureClass, FixedHeight, KeyboardService,
        KeyboardState, LayoutParams, RemovalStrategy, Result, ScreenRemoval, SheetBehaviorController,
        SheetConfig, SheetReaction, SheetState, SheetWidget, StackHandle, StackPresentation,
        TransitionListener, TransitionProgressEmitter,
    };

    pub use crate::{core, runtime};
}

pub use formsheet_core as core;
pub use formsheet_runtime as runtime;
