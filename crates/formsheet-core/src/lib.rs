#![forbid(unsafe_code)]

//! Core: detents, keyboard state, and sheet layout resolution.
//!
//! Everything in this crate is pure data or a pure function. The stateful
//! controller that applies resolved layouts to a platform sheet lives in
//! `formsheet-runtime`.

pub mod detent;
pub mod error;
pub mod geometry;
pub mod keyboard;
pub mod layout;
pub mod presentation;

pub use detent::{DetentClass, Detents, MAX_MEANINGFUL_DETENTS};
pub use error::SheetError;
pub use geometry::{ContainerHeightSource, FixedHeight, resolve_container_height};
pub use keyboard::KeyboardState;
pub use layout::{LayoutParams, SheetState, resolve};
pub use presentation::{
    HeaderConfig, HeaderMeasure, SheetTransition, StackPresentation, header_content_inset,
    transition_for,
};
