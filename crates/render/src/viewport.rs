use crate::camera::PerspectiveCamera;

/// Highest pixel ratio the renderer will draw at.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Clamp a device pixel ratio to `MAX_PIXEL_RATIO`. Non-finite or
/// non-positive ratios fall back to 1.
pub fn cap_pixel_ratio(device_ratio: f32) -> f32 {
    if device_ratio.is_finite() && device_ratio > 0.0 {
        device_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// The output surface a renderer draws into.
///
/// Sizes are logical pixels; the drawing buffer is `size * pixel_ratio`.
pub trait RenderSurface {
    fn set_size(&mut self, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, ratio: f32);
}

/// Logical viewport size plus the capped pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_ratio: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: cap_pixel_ratio(device_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Physical size of the drawing buffer.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Push the current size into the camera and surface.
    pub fn apply(&self, camera: &mut PerspectiveCamera, surface: &mut impl RenderSurface) {
        camera.aspect = self.aspect();
        camera.update_projection_matrix();
        surface.set_size(self.width, self.height);
        surface.set_pixel_ratio(self.pixel_ratio);
    }

    /// Handle a resize: store the new size, then update the camera aspect,
    /// its projection, and the surface size and pixel ratio.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_ratio: f32,
        camera: &mut PerspectiveCamera,
        surface: &mut impl RenderSurface,
    ) {
        *self = Self::new(width, height, device_ratio);
        tracing::debug!(
            width = self.width,
            height = self.height,
            pixel_ratio = self.pixel_ratio,
            "viewport resized"
        );
        self.apply(camera, surface);
    }
}
