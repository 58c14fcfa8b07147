//! wgpu render backend for the cottage scene.
//!
//! Draws every mesh of a [`cottage_scene::Scene`] with one ambient and one
//! directional light. Meshes whose material has `wireframe` set are drawn as
//! line lists of their triangle edges instead of filled triangles.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU buffers for a geometry are built once and reused every frame.
//! - Colors reach the surface unconverted; the surface format is not sRGB.

mod frame;
mod gpu;
mod shaders;
mod surface;

pub use frame::{DrawItem, FrameUniforms, InstanceData, draw_list, frame_uniforms};
pub use gpu::{SceneFrame, SceneRenderer};
pub use surface::{DrawingBuffer, SurfaceTarget, pick_surface_format};
