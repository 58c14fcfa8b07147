//! Primitive geometries and their CPU tessellation.
//!
//! All meshes use counter-clockwise front faces with outward normals.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};

/// Primitive shape description. Dimensions are world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Axis-aligned box centered on the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Cone centered on its height with the apex on +Y. With four sides the
    /// first base corner sits on +Z.
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// UV sphere.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Triangle list ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique triangle edges as a line list, in ascending index order.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.into_iter().flat_map(|(a, b)| [a, b]).collect()
    }
}

impl Geometry {
    /// Generate vertices and indices for this shape.
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Self::Cone {
                radius,
                height,
                radial_segments,
            } => cone_mesh(radius, height, radial_segments.max(3)),
            Self::Plane { width, height } => plane_mesh(width, height),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere_mesh(radius, width_segments.max(3), height_segments.max(2)),
        }
    }

    /// True when every dimension is positive.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => width > 0.0 && height > 0.0 && depth > 0.0,
            Self::Cone { radius, height, .. } => radius > 0.0 && height > 0.0,
            Self::Plane { width, height } => width > 0.0 && height > 0.0,
            Self::Sphere { radius, .. } => radius > 0.0,
        }
    }
}

fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    // Four corners per face, wound counter-clockwise seen from outside.
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]], [0.0, 0.0, 1.0]),
        ([[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]], [0.0, 0.0, -1.0]),
        ([[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]], [1.0, 0.0, 0.0]),
        ([[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]], [-1.0, 0.0, 0.0]),
        ([[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]], [0.0, 1.0, 0.0]),
        ([[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]], [0.0, -1.0, 0.0]),
    ];

    let mut mesh = MeshData::default();
    for (corners, normal) in faces {
        let base = mesh.vertices.len() as u32;
        for position in corners {
            mesh.vertices.push(Vertex { position, normal });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

fn plane_mesh(width: f32, height: f32) -> MeshData {
    let (x, y) = (width / 2.0, height / 2.0);
    let normal = Vec3::Z;
    MeshData {
        vertices: vec![
            Vertex::new(Vec3::new(-x, -y, 0.0), normal),
            Vertex::new(Vec3::new(x, -y, 0.0), normal),
            Vertex::new(Vec3::new(x, y, 0.0), normal),
            Vertex::new(Vec3::new(-x, y, 0.0), normal),
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

fn cone_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let half = height / 2.0;
    let slope = radius / height;
    let mut mesh = MeshData::default();

    // Side: apex row then base row, each with a duplicated seam vertex.
    for row in 0..2u32 {
        let ring = row as f32 * radius;
        let y = half - row as f32 * height;
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(ring * sin, y, ring * cos),
                Vec3::new(sin, slope, cos).normalize(),
            ));
        }
    }
    let stride = segments + 1;
    for x in 0..segments {
        let base = stride + x;
        let next_base = stride + x + 1;
        let apex = x + 1;
        mesh.indices.extend_from_slice(&[base, next_base, apex]);
    }

    // Base cap: one center vertex per segment, then the rim.
    let down = Vec3::NEG_Y;
    let center_start = mesh.vertices.len() as u32;
    for _ in 0..segments {
        mesh.vertices.push(Vertex::new(Vec3::new(0.0, -half, 0.0), down));
    }
    let rim_start = mesh.vertices.len() as u32;
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices
            .push(Vertex::new(Vec3::new(radius * sin, -half, radius * cos), down));
    }
    for x in 0..segments {
        let center = center_start + x;
        let rim = rim_start + x;
        mesh.indices.extend_from_slice(&[rim + 1, rim, center]);
    }
    mesh
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.vertices
                .push(Vertex::new(position, position.normalize_or(Vec3::Y)));
        }
    }

    let stride = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            // Pole rows collapse one triangle of each quad.
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}
