//! House Assembly and Lighting Setup.
//!
//! Builds the fixed demonstration scene from configuration records: walls,
//! roof, door and bushes grouped into a house, a floor plane, and the
//! ambient and moon lights.
//!
//! # Invariants
//! - Parts are positioned by arithmetic on sibling dimensions, never by
//!   hand-entered coordinates (bush placements excepted).
//! - Nothing here runs after startup; the debug panel mutates the result.

pub mod house;
pub mod lights;

pub use house::{
    BushPlacement, BushProps, DoorProps, FloorProps, HouseHandles, HouseProps, RoofProps,
    WallProps, build_house,
};
pub use lights::{LightHandles, LightProps, setup_lights};

use cottage_common::Color;
use cottage_scene::{Scene, SceneError};

/// Parse a `#rrggbb` default. A malformed literal falls back to white.
pub(crate) fn css_color(css: &str) -> Color {
    Color::from_css(css).unwrap_or_else(|e| {
        tracing::warn!("bad default color: {e}");
        Color::default()
    })
}

/// Everything the startup path produces.
#[derive(Debug, Clone)]
pub struct Cottage {
    pub house: HouseHandles,
    pub lights: LightHandles,
}

/// Build the full scene with default props.
pub fn build_default_scene() -> Result<(Scene, Cottage), SceneError> {
    let mut scene = Scene::new();
    let house = build_house(&mut scene, &HouseProps::default())?;
    let lights = setup_lights(&mut scene, &LightProps::default());
    tracing::info!(
        nodes = scene.node_count(),
        materials = scene.material_count(),
        "scene assembled"
    );
    Ok((scene, Cottage { house, lights }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_contents() {
        let (scene, _) = build_default_scene().unwrap();
        // walls, roof, door, 4 bushes, floor
        assert_eq!(scene.meshes().len(), 8);
        assert_eq!(scene.lights().len(), 2);
        // house group, floor, ambient, moon
        assert_eq!(scene.roots().len(), 4);
    }

    #[test]
    fn css_defaults_parse() {
        assert_eq!(css_color("#a9c388"), Color::from_hex(0xa9c388));
        assert_eq!(css_color("#ffffff"), Color::WHITE);
        assert_eq!(css_color("a9c388"), Color::WHITE);
        assert_eq!(FloorProps::default().color, Color::from_hex(0xa9c388));
        let lights = LightProps::default();
        assert_eq!(lights.ambient_color, Color::WHITE);
        assert_eq!(lights.moon_color, Color::WHITE);
    }
}
