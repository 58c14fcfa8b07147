use crate::action::Action;

/// Backend-neutral mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Tracks held buttons and turns pointer motion into orbit actions.
///
/// Primary drag rotates, secondary drag pans, the wheel zooms. Middle drag
/// also zooms, one step per 10 pixels.
#[derive(Debug, Clone, Default)]
pub struct PointerMapper {
    primary: bool,
    secondary: bool,
    middle: bool,
}

/// Pixels of vertical middle-drag per zoom step.
const DRAG_ZOOM_PIXELS: f32 = 10.0;

impl PointerMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.primary = pressed,
            PointerButton::Secondary => self.secondary = pressed,
            PointerButton::Middle => self.middle = pressed,
        }
    }

    /// Any button held, i.e. a drag is in progress.
    pub fn dragging(&self) -> bool {
        self.primary || self.secondary || self.middle
    }

    /// Map a pointer delta to an action given the buttons currently held.
    pub fn on_motion(&self, dx: f32, dy: f32) -> Action {
        if self.primary {
            Action::Rotate { dx, dy }
        } else if self.secondary {
            Action::Pan { dx, dy }
        } else if self.middle {
            Action::Zoom(-dy / DRAG_ZOOM_PIXELS)
        } else {
            Action::Noop
        }
    }

    /// Map wheel lines to a zoom action. Positive lines scroll up.
    pub fn on_wheel(&self, lines: f32) -> Action {
        if lines == 0.0 {
            Action::Noop
        } else {
            Action::Zoom(lines)
        }
    }

    /// Forget held buttons, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        tracing::trace!("pointer state reset");
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_without_buttons_is_noop() {
        let m = PointerMapper::new();
        assert_eq!(m.on_motion(3.0, 4.0), Action::Noop);
        assert!(!m.dragging());
    }

    #[test]
    fn primary_rotates_secondary_pans() {
        let mut m = PointerMapper::new();
        m.on_button(PointerButton::Primary, true);
        assert_eq!(m.on_motion(3.0, 4.0), Action::Rotate { dx: 3.0, dy: 4.0 });
        m.on_button(PointerButton::Primary, false);
        m.on_button(PointerButton::Secondary, true);
        assert_eq!(m.on_motion(3.0, 4.0), Action::Pan { dx: 3.0, dy: 4.0 });
    }

    #[test]
    fn middle_drag_zooms() {
        let mut m = PointerMapper::new();
        m.on_button(PointerButton::Middle, true);
        assert_eq!(m.on_motion(0.0, -20.0), Action::Zoom(2.0));
    }

    #[test]
    fn wheel_maps_to_zoom() {
        let m = PointerMapper::new();
        assert_eq!(m.on_wheel(1.0), Action::Zoom(1.0));
        assert_eq!(m.on_wheel(0.0), Action::Noop);
    }

    #[test]
    fn reset_releases_buttons() {
        let mut m = PointerMapper::new();
        m.on_button(PointerButton::Secondary, true);
        m.reset();
        assert!(!m.dragging());
    }
}
