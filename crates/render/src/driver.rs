use cottage_scene::Scene;
use std::time::{Duration, Instant};

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::renderer::Renderer;

/// Something that can schedule the next frame, such as a window redraw request.
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// Wall-clock time since the clock started.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

/// The per-frame callback.
///
/// Each tick advances the controls, renders once and schedules the next
/// frame. There is no pause or stop; the loop ends when the host stops
/// delivering frames.
#[derive(Debug, Default)]
pub struct RenderDriver {
    clock: Clock,
    frames: u64,
}

impl RenderDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Run one frame.
    pub fn tick<R: Renderer>(
        &mut self,
        controls: &mut OrbitControls,
        camera: &mut PerspectiveCamera,
        scene: &Scene,
        renderer: &mut R,
        scheduler: &impl FrameScheduler,
    ) -> R::Output {
        controls.update(camera);
        let output = renderer.render(scene, camera);
        scheduler.request_frame();
        self.frames += 1;
        if self.frames == 1 {
            tracing::info!("first frame rendered");
        }
        tracing::trace!(frame = self.frames, "frame");
        output
    }

    /// Give up on the current frame but keep the loop alive.
    ///
    /// Hosts call this when presenting fails, so a lost surface does not
    /// end the frame chain.
    pub fn skip(&self, scheduler: &impl FrameScheduler) {
        tracing::debug!(frame = self.frames, "frame skipped");
        scheduler.request_frame();
    }
}
