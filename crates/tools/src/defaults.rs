use cottage_house::{HouseHandles, LightHandles};

use crate::panel::{Axis, BindingTarget, DebugPanel};

/// Register the standard cottage controls: one wireframe toggle per house
/// part, then the two light intensities and the moon position.
pub fn bind_defaults(panel: &mut DebugPanel, house: &HouseHandles, lights: &LightHandles) {
    let toggles = [
        (house.wall_material, "Wall wireframe"),
        (house.roof_material, "Roof wireframe"),
        (house.door_material, "Door wireframe"),
        (house.bush_material, "Bush wireframe"),
        (house.floor_material, "Floor wireframe"),
    ];
    for (material, label) in toggles {
        panel
            .add(BindingTarget::MaterialWireframe(material))
            .name(label);
    }

    for light in [lights.ambient, lights.moon] {
        panel
            .add(BindingTarget::LightIntensity(light))
            .min(0.0)
            .max(1.0)
            .step(0.001);
    }

    for axis in [Axis::X, Axis::Y, Axis::Z] {
        panel
            .add(BindingTarget::NodePosition(lights.moon, axis))
            .min(-5.0)
            .max(5.0)
            .step(0.001);
    }

    tracing::debug!(bindings = panel.len(), "debug panel bound");
}
