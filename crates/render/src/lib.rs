//! Rendering Adapter: camera, orbit controls, viewport, and the frame driver.
//!
//! Backends implement [`Renderer`]; the [`RenderDriver`] calls it once per
//! frame after advancing the [`OrbitControls`].
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Exactly one render per driver tick, and every tick schedules the next.
//! - The camera projection only changes through `update_projection_matrix`.

mod camera;
mod controls;
mod driver;
mod renderer;
mod viewport;

pub use camera::{CameraProps, PerspectiveCamera};
pub use controls::OrbitControls;
pub use driver::{Clock, FrameScheduler, RenderDriver};
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::{MAX_PIXEL_RATIO, RenderSurface, Viewport, cap_pixel_ratio};
