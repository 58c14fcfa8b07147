use cottage_common::{Color, Transform};
use cottage_scene::{Geometry, MaterialId, NodeId, Scene, SceneError, StandardMaterial};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallProps {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: Color,
}

impl Default for WallProps {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 3.0,
            depth: 4.0,
            color: Color::from_hex(0x0afd3f),
        }
    }
}

/// Pyramid roof. `base_size` is the cone radius, so the corners overhang
/// the walls once the roof is turned a quarter of a side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofProps {
    pub base_size: f32,
    pub height: f32,
    pub sides: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorProps {
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

impl Default for DoorProps {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 2.0,
            color: Color::from_hex(0xfa1283),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BushPlacement {
    pub scale: f32,
    pub position: Vec3,
}

/// Bushes share one sphere and one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BushProps {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub placements: Vec<BushPlacement>,
}

impl Default for BushProps {
    fn default() -> Self {
        let bush = |scale: f32, x: f32, y: f32, z: f32| BushPlacement {
            scale,
            position: Vec3::new(x, y, z),
        };
        Self {
            radius: 1.0,
            width_segments: 16,
            height_segments: 16,
            placements: vec![
                bush(0.5, 0.8, 0.2, 2.2),
                bush(0.25, 1.4, 0.1, 2.1),
                bush(0.4, -0.8, 0.1, 2.2),
                bush(0.15, -1.0, 0.05, 2.6),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorProps {
    pub width: f32,
    pub depth: f32,
    pub color: Color,
}

impl Default for FloorProps {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            color: crate::css_color("#a9c388"),
        }
    }
}

/// All house dimensions. The roof base follows the wall width by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseProps {
    pub walls: WallProps,
    pub roof: RoofProps,
    pub door: DoorProps,
    pub bushes: BushProps,
    pub floor: FloorProps,
}

impl Default for HouseProps {
    fn default() -> Self {
        let walls = WallProps::default();
        Self {
            roof: RoofProps {
                base_size: walls.width,
                height: 1.5,
                sides: 4,
                color: Color::from_hex(0x0a3ffd),
            },
            walls,
            door: DoorProps::default(),
            bushes: BushProps::default(),
            floor: FloorProps::default(),
        }
    }
}

impl HouseProps {
    /// Walls rest on the ground.
    pub fn wall_y(&self) -> f32 {
        self.walls.height / 2.0
    }

    /// Roof sits on top of the walls.
    pub fn roof_y(&self) -> f32 {
        self.walls.height + self.roof.height / 2.0
    }

    /// Door bottom touches the ground.
    pub fn door_y(&self) -> f32 {
        self.door.height / 2.0
    }

    /// Door lies on the front wall face.
    pub fn door_z(&self) -> f32 {
        self.walls.depth / 2.0
    }
}

/// Handles to everything `build_house` created.
#[derive(Debug, Clone)]
pub struct HouseHandles {
    pub group: NodeId,
    pub walls: NodeId,
    pub roof: NodeId,
    pub door: NodeId,
    pub bushes: Vec<NodeId>,
    pub floor: NodeId,
    pub wall_material: MaterialId,
    pub roof_material: MaterialId,
    pub door_material: MaterialId,
    pub bush_material: MaterialId,
    pub floor_material: MaterialId,
}

/// Build the house group and the floor into `scene`.
///
/// Walls, roof, door and bushes become children of one group; the floor is a
/// separate root so it does not move with the house.
pub fn build_house(scene: &mut Scene, props: &HouseProps) -> Result<HouseHandles, SceneError> {
    let group = scene.add_group("house", Transform::default());

    let wall_material = scene.add_material(StandardMaterial::with_color(props.walls.color));
    let wall_geometry = scene.add_geometry(Geometry::Box {
        width: props.walls.width,
        height: props.walls.height,
        depth: props.walls.depth,
    });
    let walls = scene.add_mesh(
        "walls",
        wall_geometry,
        wall_material,
        Transform::from_position(Vec3::new(0.0, props.wall_y(), 0.0)),
    )?;
    scene.attach(walls, group)?;

    let roof_material = scene.add_material(StandardMaterial::with_color(props.roof.color));
    let roof_geometry = scene.add_geometry(Geometry::Cone {
        radius: props.roof.base_size,
        height: props.roof.height,
        radial_segments: props.roof.sides,
    });
    let roof = scene.add_mesh(
        "roof",
        roof_geometry,
        roof_material,
        Transform::from_position(Vec3::new(0.0, props.roof_y(), 0.0))
            .with_rotation(Quat::from_rotation_y(FRAC_PI_4)),
    )?;
    scene.attach(roof, group)?;

    let door_material = scene.add_material(StandardMaterial::with_color(props.door.color));
    let door_geometry = scene.add_geometry(Geometry::Plane {
        width: props.door.width,
        height: props.door.height,
    });
    let door = scene.add_mesh(
        "door",
        door_geometry,
        door_material,
        Transform::from_position(Vec3::new(0.0, props.door_y(), props.door_z())),
    )?;
    scene.attach(door, group)?;

    // Stock material: the bushes carry no color of their own.
    let bush_material = scene.add_material(StandardMaterial::default());
    let bush_geometry = scene.add_geometry(Geometry::Sphere {
        radius: props.bushes.radius,
        width_segments: props.bushes.width_segments,
        height_segments: props.bushes.height_segments,
    });
    let mut bushes = Vec::with_capacity(props.bushes.placements.len());
    for (i, placement) in props.bushes.placements.iter().enumerate() {
        let bush = scene.add_mesh(
            format!("bush{}", i + 1),
            bush_geometry,
            bush_material,
            Transform::from_position(placement.position).with_uniform_scale(placement.scale),
        )?;
        scene.attach(bush, group)?;
        bushes.push(bush);
    }

    let floor_material = scene.add_material(StandardMaterial::with_color(props.floor.color));
    let floor_geometry = scene.add_geometry(Geometry::Plane {
        width: props.floor.width,
        height: props.floor.depth,
    });
    let floor = scene.add_mesh(
        "floor",
        floor_geometry,
        floor_material,
        Transform::default().with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    )?;

    tracing::debug!(bushes = bushes.len(), "house built");

    Ok(HouseHandles {
        group,
        walls,
        roof,
        door,
        bushes,
        floor,
        wall_material,
        roof_material,
        door_material,
        bush_material,
        floor_material,
    })
}
