/// A high-level action produced from user input.
///
/// Orbit controls and the debug panel consume actions; the window layer is
/// the only place that sees raw events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit around the target by a pointer delta in pixels.
    Rotate { dx: f32, dy: f32 },
    /// Slide the target in the view plane by a pointer delta in pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel steps; positive moves the camera closer.
    Zoom(f32),
    /// Show or hide the debug panel.
    TogglePanel,
    /// Input that maps to nothing.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}
