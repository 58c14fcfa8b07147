//! Shared types used across the cottage workspace.
//!
//! # Invariants
//! - Colors are linear RGB and are never color-space converted.
//! - Transforms are local to their parent node.

mod color;
mod types;

pub use color::{Color, ColorError};
pub use types::Transform;
