use cottage_common::{Color, Transform};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Geometry;

/// Unique identifier for a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a geometry shared between meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryId(pub Uuid);

impl GeometryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GeometryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a material shared between meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lit surface material: base color plus a wireframe switch.
///
/// The default is white and filled, matching a material built with no options.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardMaterial {
    pub color: Color,
    pub wireframe: bool,
}

impl StandardMaterial {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            wireframe: false,
        }
    }
}

/// Light sources. A directional light shines from its node position toward
/// the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    Directional { color: Color, intensity: f32 },
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient { intensity, .. } | Self::Directional { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Self::Ambient { intensity, .. } | Self::Directional { intensity, .. } => {
                *intensity = value
            }
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Ambient { color, .. } | Self::Directional { color, .. } => *color,
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Light(Light),
}

/// A node in the scene tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind,
            transform,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}

/// Readable label for a geometry, used by text dumps.
pub(crate) fn geometry_label(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => format!("box {width}x{height}x{depth}"),
        Geometry::Cone {
            radius,
            height,
            radial_segments,
        } => format!("cone r={radius} h={height} sides={radial_segments}"),
        Geometry::Plane { width, height } => format!("plane {width}x{height}"),
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => format!("sphere r={radius} {width_segments}x{height_segments}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
        assert_ne!(MaterialId::new(), MaterialId::new());
        assert_ne!(GeometryId::new(), GeometryId::new());
    }

    #[test]
    fn default_material_is_white_and_filled() {
        let m = StandardMaterial::default();
        assert_eq!(m.color, Color::WHITE);
        assert!(!m.wireframe);
    }

    #[test]
    fn light_intensity_roundtrip() {
        let mut light = Light::Directional {
            color: Color::WHITE,
            intensity: 0.5,
        };
        light.set_intensity(0.25);
        assert_eq!(light.intensity(), 0.25);
        assert_eq!(light.color(), Color::WHITE);
    }
}
