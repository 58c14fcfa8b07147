//! Developer Tooling: a debug panel whose controls read and write scene
//! properties directly.
//!
//! The panel is UI-agnostic: it holds the bindings and their metadata, and a
//! front end (egui in the desktop app) draws one widget per binding.
//!
//! # Invariants
//! - Writes go straight to the bound property; there is no range check,
//!   batching or undo.
//! - A binding changes exactly the property it targets.

mod defaults;
mod panel;

pub use defaults::bind_defaults;
pub use panel::{Axis, Binding, BindingTarget, BindingValue, Control, DebugPanel, PanelError};
