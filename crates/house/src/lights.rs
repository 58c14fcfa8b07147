use cottage_common::{Color, Transform};
use cottage_scene::{Light, NodeId, Scene};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightProps {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub moon_color: Color,
    pub moon_intensity: f32,
    pub moon_position: Vec3,
}

impl Default for LightProps {
    fn default() -> Self {
        Self {
            ambient_color: crate::css_color("#ffffff"),
            ambient_intensity: 0.5,
            moon_color: crate::css_color("#ffffff"),
            moon_intensity: 0.5,
            moon_position: Vec3::new(4.0, 5.0, -2.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LightHandles {
    pub ambient: NodeId,
    pub moon: NodeId,
}

/// Add the ambient light and the directional moon light as scene roots.
pub fn setup_lights(scene: &mut Scene, props: &LightProps) -> LightHandles {
    let ambient = scene.add_light(
        "ambient",
        Light::Ambient {
            color: props.ambient_color,
            intensity: props.ambient_intensity,
        },
        Transform::default(),
    );
    let moon = scene.add_light(
        "moon",
        Light::Directional {
            color: props.moon_color,
            intensity: props.moon_intensity,
        },
        Transform::from_position(props.moon_position),
    );
    LightHandles { ambient, moon }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_added_with_defaults() {
        let mut scene = Scene::new();
        let handles = setup_lights(&mut scene, &LightProps::default());
        let lights = scene.lights();
        assert_eq!(lights.len(), 2);

        assert_eq!(lights[0].node, handles.ambient);
        assert!(matches!(lights[0].light, Light::Ambient { intensity, .. } if intensity == 0.5));

        assert_eq!(lights[1].node, handles.moon);
        assert!(matches!(lights[1].light, Light::Directional { .. }));
        assert_eq!(lights[1].light.intensity(), 0.5);
        assert_eq!(lights[1].world_position, Vec3::new(4.0, 5.0, -2.0));
    }

    #[test]
    fn lights_are_roots() {
        let mut scene = Scene::new();
        let handles = setup_lights(&mut scene, &LightProps::default());
        assert_eq!(scene.roots(), &[handles.ambient, handles.moon]);
    }
}
