//! CPU-side frame data: uniforms and per-mesh instances.

use bytemuck::{Pod, Zeroable};
use cottage_common::Color;
use cottage_render::PerspectiveCamera;
use cottage_scene::{GeometryId, Light, Scene};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub light_color: [f32; 4],
    /// Unit vector pointing from the lit surface toward the light.
    pub light_dir: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: Mat4, color: Color) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: [color.r, color.g, color.b, 1.0],
        }
    }
}

/// One mesh to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub wireframe: bool,
    pub instance: InstanceData,
}

fn rgba(color: Color) -> [f32; 4] {
    [color.r, color.g, color.b, 1.0]
}

/// Gather camera and light state for the shader.
///
/// Ambient lights add up. The first directional light in traversal order is
/// used; it shines from its world position toward the origin.
pub fn frame_uniforms(scene: &Scene, camera: &PerspectiveCamera) -> FrameUniforms {
    let mut ambient = Color::BLACK;
    let mut directional: Option<(Color, Vec3)> = None;
    for instance in scene.lights() {
        match instance.light {
            Light::Ambient { color, intensity } => {
                let add = color.scaled(intensity);
                ambient = Color::new(ambient.r + add.r, ambient.g + add.g, ambient.b + add.b);
            }
            Light::Directional { color, intensity } => {
                if directional.is_none() {
                    let dir = instance.world_position.try_normalize().unwrap_or(Vec3::Y);
                    directional = Some((color.scaled(intensity), dir));
                }
            }
        }
    }
    let (light_color, light_dir) = directional.unwrap_or((Color::BLACK, Vec3::Y));

    FrameUniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        ambient: rgba(ambient),
        light_color: rgba(light_color),
        light_dir: light_dir.extend(0.0).to_array(),
    }
}

/// Every mesh in draw order with its material resolved. Meshes whose material
/// is missing are skipped.
pub fn draw_list(scene: &Scene) -> Vec<DrawItem> {
    scene
        .meshes()
        .into_iter()
        .filter_map(|mesh| {
            let Some(material) = scene.material(mesh.material) else {
                tracing::warn!(node = ?mesh.node, "mesh material missing, skipped");
                return None;
            };
            Some(DrawItem {
                geometry: mesh.geometry,
                wireframe: material.wireframe,
                instance: InstanceData::new(mesh.world, material.color),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cottage_common::Transform;
    use cottage_scene::{Geometry, StandardMaterial};

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        cam.position = Vec3::new(4.0, 2.0, 5.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn uniforms_from_two_lights() {
        let mut scene = Scene::new();
        scene.add_light(
            "ambient",
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::default(),
        );
        scene.add_light(
            "moon",
            Light::Directional {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::from_position(Vec3::new(4.0, 5.0, -2.0)),
        );

        let u = frame_uniforms(&scene, &camera());
        assert_eq!(u.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(u.light_color, [0.5, 0.5, 0.5, 1.0]);
        let dir = Vec3::new(u.light_dir[0], u.light_dir[1], u.light_dir[2]);
        assert!((dir - Vec3::new(4.0, 5.0, -2.0).normalize()).length() < 1e-6);
        assert_eq!(u.view_proj, camera().view_projection().to_cols_array_2d());
    }

    #[test]
    fn no_lights_is_black() {
        let u = frame_uniforms(&Scene::new(), &camera());
        assert_eq!(u.ambient, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.light_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn draw_list_follows_material_flags() {
        let mut scene = Scene::new();
        let geo = scene.add_geometry(Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        let red = scene.add_material(StandardMaterial::with_color(Color::from_hex(0xff0000)));
        let lines = scene.add_material(StandardMaterial {
            color: Color::WHITE,
            wireframe: true,
        });
        scene
            .add_mesh(
                "a",
                geo,
                red,
                Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
            )
            .unwrap();
        scene.add_mesh("b", geo, lines, Transform::default()).unwrap();

        let items = draw_list(&scene);
        assert_eq!(items.len(), 2);
        assert!(!items[0].wireframe);
        assert_eq!(items[0].instance.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(items[0].instance.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert!(items[1].wireframe);
        assert_eq!(items[1].geometry, geo);
    }

    #[test]
    fn instance_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 112);
    }
}
