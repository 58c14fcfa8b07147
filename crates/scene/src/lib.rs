//! Scene Container: the root aggregate of everything rendered in a frame.
//!
//! Nodes are groups, meshes, or lights. Meshes reference shared geometries
//! and materials by handle, so several meshes can draw with one material.
//!
//! # Invariants
//! - A node has at most one parent, and only groups have children.
//! - Mesh traversal order is depth-first in root insertion order.
//! - Renderers read the scene; only explicit operations mutate it.

pub mod geometry;
mod node;
mod scene;

pub use geometry::{Geometry, MeshData, Vertex};
pub use node::{GeometryId, Light, MaterialId, Node, NodeId, NodeKind, StandardMaterial};
pub use scene::{LightInstance, MeshInstance, Scene, SceneError};
