//! Damped orbit controls.
//!
//! The camera orbits `target` on a sphere. Input accumulates pending
//! rotation and pan; each `update` applies a `damping_factor` share of what
//! is pending and decays the rest, so motion eases out over later frames.

use cottage_input::Action;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Spherical coordinates around the Y axis: `phi` is the polar angle from +Y,
/// `theta` the azimuth measured from +Z toward +X.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let ring = self.phi.sin() * self.radius;
        Vec3::new(
            ring * self.theta.sin(),
            self.phi.cos() * self.radius,
            ring * self.theta.cos(),
        )
    }
}

/// Orbit camera controller with damping.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    scale: f32,
    last: Option<(Vec3, Vec3)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            scale: 1.0,
            last: None,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls with damping on, orbiting the origin.
    pub fn damped() -> Self {
        Self {
            enable_damping: true,
            ..Self::default()
        }
    }

    /// Queue an azimuth change. Positive angles swing the camera clockwise
    /// seen from above.
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    /// Queue a polar change. Positive angles raise the camera.
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_phi -= angle;
    }

    /// Zoom by wheel steps; each step scales the distance by `0.95^zoom_speed`.
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// Queue a pan of the target by a pixel delta, measured on a viewport of
    /// `viewport_height` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let distance = (camera.position - self.target).length() * (camera.fov_radians() / 2.0).tan();
        let frame = camera.world_matrix();
        let right = frame.x_axis.truncate();
        let up = frame.y_axis.truncate();
        self.pending_pan += right * (-2.0 * dx * self.pan_speed * distance / height);
        self.pending_pan += up * (2.0 * dy * self.pan_speed * distance / height);
    }

    /// Feed one input action. Returns false for actions the controls ignore.
    pub fn apply(&mut self, action: Action, camera: &PerspectiveCamera, viewport_height: f32) -> bool {
        let height = viewport_height.max(1.0);
        match action {
            Action::Rotate { dx, dy } => {
                self.rotate_left(TAU * dx * self.rotate_speed / height);
                self.rotate_up(TAU * dy * self.rotate_speed / height);
                true
            }
            Action::Pan { dx, dy } => {
                self.pan(dx, dy, camera, height);
                true
            }
            Action::Zoom(steps) => {
                self.dolly(steps);
                true
            }
            Action::TogglePanel | Action::Noop => false,
        }
    }

    /// Advance one frame: move the camera by the damped share of pending
    /// input and aim it at the target. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.pending_theta * share;
        spherical.phi += self.pending_phi * share;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pending_pan * share;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.pending_theta *= keep;
            self.pending_phi *= keep;
            self.pending_pan *= keep;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = match self.last {
            Some((position, target)) => {
                camera.position.distance_squared(position) > EPS
                    || self.target.distance_squared(target) > EPS
            }
            None => true,
        };
        if moved {
            self.last = Some((camera.position, self.target));
        }
        moved
    }

    /// Current distance from the camera to the target.
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        camera.position.distance(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        cam.position = position;
        cam
    }

    #[test]
    fn spherical_roundtrip() {
        let offset = Vec3::new(4.0, 2.0, 5.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-5);
    }

    #[test]
    fn first_update_aims_camera_and_settles() {
        let mut controls = OrbitControls::damped();
        let mut cam = camera_at(Vec3::new(4.0, 2.0, 5.0));
        cam.look_at(Vec3::new(1.0, 1.0, 1.0));

        assert!(controls.update(&mut cam));
        assert_eq!(cam.target, Vec3::ZERO);
        assert!((cam.position - Vec3::new(4.0, 2.0, 5.0)).length() < 1e-5);
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn damped_rotation_converges_to_full_angle() {
        let mut controls = OrbitControls::damped();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut cam);

        controls.rotate_left(-std::f32::consts::FRAC_PI_2);
        controls.update(&mut cam);
        // One damped step covers only a small share of the request.
        assert!(cam.position.x > 0.0 && cam.position.x < 1.0);

        for _ in 0..600 {
            controls.update(&mut cam);
            assert!((controls.distance(&cam) - 5.0).abs() < 1e-3);
        }
        assert!((cam.position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn undamped_rotation_is_immediate() {
        let mut controls = OrbitControls::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.rotate_left(-std::f32::consts::FRAC_PI_2);
        controls.update(&mut cam);
        assert!((cam.position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn polar_angle_stays_off_the_pole() {
        let mut controls = OrbitControls::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 4.99);
        assert!(cam.position.z > 0.0);
        assert!(!cam.view_matrix().is_nan());
    }

    #[test]
    fn zoom_scales_distance_without_damping() {
        let mut controls = OrbitControls::damped();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let action = Action::Zoom(1.0);
        assert!(controls.apply(action, &cam, 600.0));
        controls.update(&mut cam);
        assert!((controls.distance(&cam) - 4.75).abs() < 1e-4);
        controls.update(&mut cam);
        assert!((controls.distance(&cam) - 4.75).abs() < 1e-4);
    }

    #[test]
    fn distance_is_clamped() {
        let mut controls = OrbitControls::new();
        controls.max_distance = 6.0;
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.dolly(-100.0);
        controls.update(&mut cam);
        assert!((controls.distance(&cam) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut cam);

        controls.apply(Action::Pan { dx: 100.0, dy: 0.0 }, &cam, 500.0);
        controls.update(&mut cam);
        // Dragging right slides the view left: target moves toward -X.
        assert!(controls.target.x < 0.0);
        assert!(controls.target.y.abs() < 1e-5);
        assert!((cam.position - controls.target - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn rotate_action_uses_viewport_height() {
        let mut controls = OrbitControls::new();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        // A drag of the full viewport height is one full turn.
        controls.apply(Action::Rotate { dx: 150.0, dy: 0.0 }, &cam, 600.0);
        controls.update(&mut cam);
        assert!((cam.position - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn ignored_actions() {
        let mut controls = OrbitControls::new();
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0));
        assert!(!controls.apply(Action::TogglePanel, &cam, 600.0));
        assert!(!controls.apply(Action::Noop, &cam, 600.0));
    }
}
