//! Input mapping: raw pointer and key events become high-level actions.
//!
//! # Invariants
//! - Controls consume actions, never raw window events.
//! - Mapping holds only button state; it never touches the camera.

pub mod action;
mod pointer;

pub use action::Action;
pub use pointer::{PointerButton, PointerMapper};
