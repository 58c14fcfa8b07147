use cottage_render::RenderSurface;

/// Drawing buffer size tracking for a window surface.
///
/// Holds the logical size and pixel ratio last pushed by the viewport and
/// remembers whether the surface needs reconfiguring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingBuffer {
    width: u32,
    height: u32,
    pixel_ratio: f32,
    dirty: bool,
}

impl DrawingBuffer {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio,
            dirty: true,
        }
    }

    /// Logical size last pushed by the viewport.
    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Physical pixels per logical pixel. Overlays drawn into the buffer
    /// must use this scale, not the window's native one.
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Buffer size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Returns true once after each change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl RenderSurface for DrawingBuffer {
    fn set_size(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        if ratio != self.pixel_ratio {
            self.pixel_ratio = ratio;
            self.dirty = true;
        }
    }
}

/// A configured window surface whose size follows a [`DrawingBuffer`].
pub struct SurfaceTarget {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    buffer: DrawingBuffer,
}

impl SurfaceTarget {
    pub fn new(
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        buffer: DrawingBuffer,
    ) -> Self {
        Self {
            surface,
            config,
            buffer,
        }
    }

    pub fn buffer(&self) -> &DrawingBuffer {
        &self.buffer
    }

    /// Apply a pending size change. Returns true if the surface was reconfigured.
    pub fn configure_if_dirty(&mut self, device: &wgpu::Device) -> bool {
        if !self.buffer.take_dirty() {
            return false;
        }
        self.reconfigure(device);
        true
    }

    /// Configure the surface with the current drawing buffer size.
    pub fn reconfigure(&mut self, device: &wgpu::Device) {
        let (width, height) = self.buffer.physical_size();
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
        tracing::debug!(width, height, "surface configured");
    }
}

impl RenderSurface for SurfaceTarget {
    fn set_size(&mut self, width: u32, height: u32) {
        self.buffer.set_size(width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.buffer.set_pixel_ratio(ratio);
    }
}

/// Prefer a non-sRGB format so colors are written unconverted.
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cottage_render::{PerspectiveCamera, Viewport};

    #[test]
    fn buffer_follows_viewport() {
        let mut buffer = DrawingBuffer::new(800, 600, 1.0);
        assert!(buffer.take_dirty());
        assert!(!buffer.take_dirty());

        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut viewport = Viewport::new(800, 600, 1.0);
        viewport.resize(1280, 720, 3.0, &mut camera, &mut buffer);
        assert!(buffer.take_dirty());
        assert_eq!(buffer.physical_size(), (2560, 1440));
    }

    #[test]
    fn overlay_scale_matches_buffer_on_dense_displays() {
        let mut buffer = DrawingBuffer::new(800, 600, 1.0);
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut viewport = Viewport::new(800, 600, 1.0);
        viewport.resize(1280, 720, 3.0, &mut camera, &mut buffer);

        let ppp = buffer.pixel_ratio();
        assert_eq!(ppp, 2.0);
        let (lw, lh) = buffer.logical_size();
        let (pw, ph) = buffer.physical_size();
        assert_eq!((lw as f32 * ppp) as u32, pw);
        assert_eq!((lh as f32 * ppp) as u32, ph);

        // A panel anchored to the right edge at the native scale would land
        // past the buffer.
        let native_right = lw as f32 * 3.0;
        assert!(native_right > pw as f32);
        assert!(lw as f32 * ppp <= pw as f32);
    }

    #[test]
    fn unchanged_size_stays_clean() {
        let mut buffer = DrawingBuffer::new(800, 600, 1.5);
        buffer.take_dirty();
        buffer.set_size(800, 600);
        buffer.set_pixel_ratio(1.5);
        assert!(!buffer.take_dirty());
    }

    #[test]
    fn prefers_linear_format() {
        use wgpu::TextureFormat::*;
        assert_eq!(
            pick_surface_format(&[Bgra8UnormSrgb, Bgra8Unorm]),
            Some(Bgra8Unorm)
        );
        assert_eq!(pick_surface_format(&[Rgba8UnormSrgb]), Some(Rgba8UnormSrgb));
        assert_eq!(pick_surface_format(&[]), None);
    }
}
