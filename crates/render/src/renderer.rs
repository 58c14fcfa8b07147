use cottage_scene::Scene;

use crate::camera::PerspectiveCamera;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and camera and produces output. It never
/// mutates the scene; the debug panel is the only writer between frames.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Text renderer for headless runs.
///
/// Produces a human-readable frame description: camera, lights, and the node
/// tree. Used by the CLI and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (nodes={}, materials={}) ===\n",
            self.frames,
            scene.node_count(),
            scene.material_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect
        ));
        out.push_str(&scene.describe());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cottage_common::{Color, Transform};
    use cottage_scene::{Geometry, Light, StandardMaterial};
    use glam::Vec3;

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        cam.position = Vec3::new(4.0, 2.0, 5.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&Scene::new(), &camera());
        assert!(output.contains("Frame 1"));
        assert!(output.contains("nodes=0"));
        assert!(output.contains("aspect=1.500"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut scene = Scene::new();
        let geo = scene.add_geometry(Geometry::Plane {
            width: 20.0,
            height: 20.0,
        });
        let mat = scene.add_material(StandardMaterial::with_color(Color::from_hex(0xa9c388)));
        scene.add_mesh("floor", geo, mat, Transform::default()).unwrap();
        scene.add_light(
            "moon",
            Light::Directional {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::from_position(Vec3::new(4.0, 5.0, -2.0)),
        );

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &camera());
        assert!(output.contains("floor [mesh plane 20x20 #a9c388]"));
        assert!(output.contains("moon [directional #ffffff @ 0.5] pos=(4.00, 5.00, -2.00)"));

        renderer.render(&scene, &camera());
        assert_eq!(renderer.frames(), 2);
    }
}
