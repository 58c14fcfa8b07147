use cottage_scene::{MaterialId, NodeId, NodeKind, Scene, SceneError};

/// Errors from reading or writing panel bindings.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PanelError {
    #[error("no binding at index {0}")]
    NoSuchBinding(usize),
    #[error("binding {name:?} expects a {expected} value")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// A coordinate axis of a node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// The scene property a binding controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingTarget {
    MaterialWireframe(MaterialId),
    LightIntensity(NodeId),
    NodePosition(NodeId, Axis),
}

impl BindingTarget {
    fn default_name(&self) -> &'static str {
        match self {
            Self::MaterialWireframe(_) => "wireframe",
            Self::LightIntensity(_) => "intensity",
            Self::NodePosition(_, axis) => axis.label(),
        }
    }
}

/// A value read from or written to a binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingValue {
    Bool(bool),
    Number(f32),
}

/// The widget a binding is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Checkbox,
    Number {
        min: Option<f32>,
        max: Option<f32>,
        step: Option<f32>,
    },
}

/// One registered control.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub target: BindingTarget,
    pub label: String,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub step: Option<f32>,
}

impl Binding {
    fn new(target: BindingTarget) -> Self {
        Self {
            target,
            label: target.default_name().to_string(),
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn name(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn min(&mut self, min: f32) -> &mut Self {
        self.min = Some(min);
        self
    }

    pub fn max(&mut self, max: f32) -> &mut Self {
        self.max = Some(max);
        self
    }

    pub fn step(&mut self, step: f32) -> &mut Self {
        self.step = Some(step);
        self
    }

    pub fn control(&self) -> Control {
        match self.target {
            BindingTarget::MaterialWireframe(_) => Control::Checkbox,
            BindingTarget::LightIntensity(_) | BindingTarget::NodePosition(..) => Control::Number {
                min: self.min,
                max: self.max,
                step: self.step,
            },
        }
    }

    fn mismatch(&self, expected: &'static str) -> PanelError {
        PanelError::TypeMismatch {
            name: self.label.clone(),
            expected,
        }
    }
}

/// Debug panel: an ordered list of bindings plus a visibility flag.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    title: String,
    bindings: Vec<Binding>,
    visible: bool,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new("Debug")
    }
}

impl DebugPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bindings: Vec::new(),
            visible: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Register a control; configure it through the returned binding.
    pub fn add(&mut self, target: BindingTarget) -> &mut Binding {
        self.bindings.push(Binding::new(target));
        let last = self.bindings.len() - 1;
        &mut self.bindings[last]
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "panel visibility toggled");
    }

    fn binding(&self, index: usize) -> Result<&Binding, PanelError> {
        self.bindings
            .get(index)
            .ok_or(PanelError::NoSuchBinding(index))
    }

    /// Current value of the property behind binding `index`.
    pub fn read(&self, scene: &Scene, index: usize) -> Result<BindingValue, PanelError> {
        let binding = self.binding(index)?;
        let value = match binding.target {
            BindingTarget::MaterialWireframe(id) => {
                let material = scene
                    .material(id)
                    .ok_or(SceneError::MaterialNotFound(id))?;
                BindingValue::Bool(material.wireframe)
            }
            BindingTarget::LightIntensity(id) => {
                let node = scene.node(id).ok_or(SceneError::NodeNotFound(id))?;
                match node.kind {
                    NodeKind::Light(light) => BindingValue::Number(light.intensity()),
                    _ => return Err(SceneError::NotALight(id).into()),
                }
            }
            BindingTarget::NodePosition(id, axis) => {
                let node = scene.node(id).ok_or(SceneError::NodeNotFound(id))?;
                BindingValue::Number(node.transform.position[axis.index()])
            }
        };
        Ok(value)
    }

    /// Write `value` straight into the property behind binding `index`.
    pub fn write(
        &self,
        scene: &mut Scene,
        index: usize,
        value: BindingValue,
    ) -> Result<(), PanelError> {
        let binding = self.binding(index)?;
        match (binding.target, value) {
            (BindingTarget::MaterialWireframe(id), BindingValue::Bool(on)) => {
                scene
                    .material_mut(id)
                    .ok_or(SceneError::MaterialNotFound(id))?
                    .wireframe = on;
            }
            (BindingTarget::MaterialWireframe(_), _) => return Err(binding.mismatch("boolean")),
            (BindingTarget::LightIntensity(id), BindingValue::Number(v)) => {
                scene.light_mut(id)?.set_intensity(v);
            }
            (BindingTarget::NodePosition(id, axis), BindingValue::Number(v)) => {
                scene
                    .node_mut(id)
                    .ok_or(SceneError::NodeNotFound(id))?
                    .transform
                    .position[axis.index()] = v;
            }
            (BindingTarget::LightIntensity(_) | BindingTarget::NodePosition(..), _) => {
                return Err(binding.mismatch("number"));
            }
        }
        tracing::debug!(binding = %binding.label, ?value, "panel write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cottage_common::{Color, Transform};
    use cottage_scene::{Geometry, Light, StandardMaterial};
    use glam::Vec3;

    fn scene_with_light() -> (Scene, MaterialId, NodeId) {
        let mut scene = Scene::new();
        let geo = scene.add_geometry(Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        let mat = scene.add_material(StandardMaterial::default());
        scene.add_mesh("box", geo, mat, Transform::default()).unwrap();
        let light = scene.add_light(
            "moon",
            Light::Directional {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Transform::from_position(Vec3::new(4.0, 5.0, -2.0)),
        );
        (scene, mat, light)
    }

    #[test]
    fn fluent_metadata() {
        let mut panel = DebugPanel::default();
        let light = NodeId::new();
        panel
            .add(BindingTarget::LightIntensity(light))
            .name("moonLightIntensity")
            .min(0.0)
            .max(1.0)
            .step(0.001);
        let binding = &panel.bindings()[0];
        assert_eq!(binding.label, "moonLightIntensity");
        assert_eq!(
            binding.control(),
            Control::Number {
                min: Some(0.0),
                max: Some(1.0),
                step: Some(0.001)
            }
        );
    }

    #[test]
    fn default_names_follow_property() {
        let mut panel = DebugPanel::default();
        panel.add(BindingTarget::MaterialWireframe(MaterialId::new()));
        panel.add(BindingTarget::NodePosition(NodeId::new(), Axis::Y));
        assert_eq!(panel.bindings()[0].label, "wireframe");
        assert_eq!(panel.bindings()[0].control(), Control::Checkbox);
        assert_eq!(panel.bindings()[1].label, "y");
    }

    #[test]
    fn read_and_write_properties() {
        let (mut scene, mat, light) = scene_with_light();
        let mut panel = DebugPanel::default();
        panel.add(BindingTarget::MaterialWireframe(mat));
        panel.add(BindingTarget::LightIntensity(light));
        panel.add(BindingTarget::NodePosition(light, Axis::Z));

        assert_eq!(panel.read(&scene, 0).unwrap(), BindingValue::Bool(false));
        panel.write(&mut scene, 0, BindingValue::Bool(true)).unwrap();
        assert!(scene.material(mat).unwrap().wireframe);

        panel.write(&mut scene, 1, BindingValue::Number(0.8)).unwrap();
        assert_eq!(panel.read(&scene, 1).unwrap(), BindingValue::Number(0.8));

        panel.write(&mut scene, 2, BindingValue::Number(3.5)).unwrap();
        assert_eq!(
            scene.node(light).unwrap().transform.position,
            Vec3::new(4.0, 5.0, 3.5)
        );
    }

    #[test]
    fn writes_are_not_range_checked() {
        let (mut scene, _, light) = scene_with_light();
        let mut panel = DebugPanel::default();
        panel
            .add(BindingTarget::LightIntensity(light))
            .min(0.0)
            .max(1.0);
        panel.write(&mut scene, 0, BindingValue::Number(7.0)).unwrap();
        assert_eq!(panel.read(&scene, 0).unwrap(), BindingValue::Number(7.0));
    }

    #[test]
    fn errors() {
        let (mut scene, mat, _) = scene_with_light();
        let mut panel = DebugPanel::default();
        panel.add(BindingTarget::MaterialWireframe(mat));
        let missing = NodeId::new();
        panel.add(BindingTarget::LightIntensity(missing));

        assert_eq!(panel.read(&scene, 9), Err(PanelError::NoSuchBinding(9)));
        assert!(matches!(
            panel.write(&mut scene, 0, BindingValue::Number(1.0)),
            Err(PanelError::TypeMismatch {
                expected: "boolean",
                ..
            })
        ));
        assert_eq!(
            panel.read(&scene, 1),
            Err(PanelError::Scene(SceneError::NodeNotFound(missing)))
        );
    }

    #[test]
    fn intensity_on_a_mesh_is_rejected() {
        let (mut scene, _, _) = scene_with_light();
        let mesh = scene.meshes()[0].node;
        let mut panel = DebugPanel::default();
        panel.add(BindingTarget::LightIntensity(mesh));
        assert_eq!(
            panel.read(&scene, 0),
            Err(PanelError::Scene(SceneError::NotALight(mesh)))
        );
        assert_eq!(
            panel.write(&mut scene, 0, BindingValue::Number(1.0)),
            Err(PanelError::Scene(SceneError::NotALight(mesh)))
        );
    }

    #[test]
    fn visibility_toggles() {
        let mut panel = DebugPanel::default();
        assert!(panel.is_visible());
        panel.toggle_visible();
        assert!(!panel.is_visible());
        panel.set_visible(true);
        assert!(panel.is_visible());
    }
}
