use anyhow::{Context, Result};
use clap::Parser;
use cottage_house::build_default_scene;
use cottage_input::{Action, PointerButton, PointerMapper};
use cottage_render::{
    CameraProps, FrameScheduler, OrbitControls, PerspectiveCamera, RenderDriver, Viewport,
};
use cottage_render_wgpu::{
    DrawingBuffer, SceneFrame, SceneRenderer, SurfaceTarget, pick_surface_format,
};
use cottage_scene::Scene;
use cottage_tools::{BindingValue, Control, DebugPanel, bind_defaults};
use egui::Context as EguiContext;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of touchpad scroll per wheel line.
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Parser)]
#[command(name = "cottage-desktop", about = "Cottage scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Start with the debug panel hidden (press H to show it)
    #[arg(long)]
    hide_panel: bool,
}

/// Asks the window for another redraw; the render driver calls it every frame.
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn request_frame(&self) {
        self.0.request_redraw();
    }
}

/// Scene and interaction state, independent of the GPU.
struct AppState {
    scene: Scene,
    panel: DebugPanel,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    pointer: PointerMapper,
    cursor: Option<PhysicalPosition<f64>>,
    driver: RenderDriver,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let (scene, cottage) = build_default_scene().context("failed to build scene")?;

        let mut panel = DebugPanel::new("Cottage");
        bind_defaults(&mut panel, &cottage.house, &cottage.lights);
        panel.set_visible(!cli.hide_panel);

        let viewport = Viewport::new(cli.width, cli.height, 1.0);
        let camera = PerspectiveCamera::from_props(&CameraProps::default(), viewport.aspect());

        Ok(Self {
            scene,
            panel,
            camera,
            controls: OrbitControls::damped(),
            viewport,
            pointer: PointerMapper::new(),
            cursor: None,
            driver: RenderDriver::new(),
        })
    }

    /// Route an action to the panel or the orbit controls.
    fn apply(&mut self, action: Action) {
        if action.is_noop() {
            return;
        }
        match action {
            Action::TogglePanel => self.panel.toggle_visible(),
            action => {
                self.controls
                    .apply(action, &self.camera, self.viewport.height as f32);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if key == KeyCode::KeyH {
            self.apply(Action::TogglePanel);
        }
    }

    /// Feed a cursor move in physical pixels to the orbit controls.
    fn handle_cursor(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let last = self.cursor.replace(position);
        if !self.pointer.dragging() {
            return;
        }
        if let Some(last) = last {
            let dx = ((position.x - last.x) / scale_factor) as f32;
            let dy = ((position.y - last.y) / scale_factor) as f32;
            let action = self.pointer.on_motion(dx, dy);
            self.apply(action);
        }
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
        };
        let action = self.pointer.on_wheel(lines);
        self.apply(action);
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.panel.is_visible() {
            return;
        }

        let panel = &self.panel;
        let scene = &mut self.scene;
        let elapsed = self.driver.clock().elapsed_secs();
        let frames = self.driver.frames();

        egui::Window::new(panel.title())
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                for (i, binding) in panel.bindings().iter().enumerate() {
                    let value = match panel.read(scene, i) {
                        Ok(value) => value,
                        Err(e) => {
                            ui.label(format!("{}: {e}", binding.label));
                            continue;
                        }
                    };
                    let written = match (binding.control(), value) {
                        (Control::Checkbox, BindingValue::Bool(mut on)) => ui
                            .checkbox(&mut on, binding.label.as_str())
                            .changed()
                            .then_some(BindingValue::Bool(on)),
                        (Control::Number { min, max, step }, BindingValue::Number(mut v)) => {
                            let changed = match (min, max) {
                                (Some(lo), Some(hi)) => {
                                    let mut slider = egui::Slider::new(&mut v, lo..=hi)
                                        .text(binding.label.as_str());
                                    if let Some(step) = step {
                                        slider = slider.step_by(step as f64);
                                    }
                                    ui.add(slider).changed()
                                }
                                _ => ui
                                    .horizontal(|ui| {
                                        ui.label(binding.label.as_str());
                                        ui.add(egui::DragValue::new(&mut v).speed(0.01))
                                            .changed()
                                    })
                                    .inner,
                            };
                            changed.then_some(BindingValue::Number(v))
                        }
                        _ => None,
                    };
                    if let Some(value) = written {
                        if let Err(e) = panel.write(scene, i, value) {
                            tracing::warn!("panel write failed: {e}");
                        }
                    }
                }

                ui.separator();
                ui.small(format!("{elapsed:.1}s  frame {frames}"));
                ui.small("H: toggle panel | LMB: orbit | RMB: pan | wheel: zoom");
            });
    }
}

/// Everything that exists only once the window and device are up.
struct Gpu {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: SurfaceTarget,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    initial_size: LogicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState, initial_size: LogicalSize<u32>) -> Self {
        Self {
            state,
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Cottage")
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cottage_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            pick_surface_format(&surface_caps.formats).context("surface has no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let scale_factor = window.scale_factor();
        let logical: LogicalSize<u32> = window.inner_size().to_logical(scale_factor);
        self.state.viewport = Viewport::new(logical.width, logical.height, scale_factor as f32);
        let viewport = self.state.viewport;
        let (width, height) = viewport.drawing_buffer_size();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let mut target = SurfaceTarget::new(
            surface,
            config,
            DrawingBuffer::new(viewport.width, viewport.height, viewport.pixel_ratio),
        );
        viewport.apply(&mut self.state.camera, &mut target);
        target.configure_if_dirty(&device);

        let renderer = SceneRenderer::new(&device, surface_format, width, height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            width,
            height,
            "GPU initialized"
        );

        window.request_redraw();

        Ok(Gpu {
            window,
            device,
            queue,
            target,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let logical: LogicalSize<u32> = size.to_logical(scale_factor);
        self.state.viewport.resize(
            logical.width,
            logical.height,
            scale_factor as f32,
            &mut self.state.camera,
            &mut gpu.target,
        );
        if gpu.target.configure_if_dirty(&gpu.device) {
            let config = &gpu.target.config;
            gpu.renderer
                .resize(&gpu.device, config.width, config.height);
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.target.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.target.reconfigure(&gpu.device);
                self.state.driver.skip(&WindowScheduler(&gpu.window));
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                self.state.driver.skip(&WindowScheduler(&gpu.window));
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let state = &mut self.state;
        let mut frame = SceneFrame {
            renderer: &mut gpu.renderer,
            device: &gpu.device,
            queue: &gpu.queue,
            view: &view,
        };
        state.driver.tick(
            &mut state.controls,
            &mut state.camera,
            &state.scene,
            &mut frame,
            &WindowScheduler(&gpu.window),
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        // The buffer is sized at the capped ratio, so egui points map through
        // that ratio rather than the window's native scale factor.
        let pixels_per_point = gpu.target.buffer().pixel_ratio();
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.target.config.width, gpu.target.config.height],
            pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let scale_factor = gpu.window.scale_factor();
        let consumed = gpu.egui_winit.on_window_event(&gpu.window, &event).consumed;

        // Releases always reach the mapper so a drag cannot stick under the panel.
        if let WindowEvent::MouseInput {
            state: ElementState::Released,
            button,
            ..
        } = &event
        {
            if let Some(button) = pointer_button(*button) {
                self.state.pointer.on_button(button, false);
            }
        }
        if consumed {
            if let WindowEvent::CursorMoved { position, .. } = event {
                self.state.cursor = Some(position);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = gpu.window.inner_size();
                self.resize(size, scale_factor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                if let Some(button) = pointer_button(button) {
                    self.state.pointer.on_button(button, true);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor(position, scale_factor);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.handle_wheel(delta);
            }
            WindowEvent::Focused(false) => {
                self.state.pointer.reset();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cottage-desktop starting");

    let state = AppState::new(&cli)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(state, LogicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(&Cli::parse_from(["cottage-desktop"])).unwrap()
    }

    #[test]
    fn hover_tracks_cursor_without_moving_camera() {
        let mut state = state();
        state.controls.update(&mut state.camera);

        state.handle_cursor(PhysicalPosition::new(10.0, 10.0), 1.0);
        state.handle_cursor(PhysicalPosition::new(200.0, 50.0), 1.0);
        assert_eq!(state.cursor, Some(PhysicalPosition::new(200.0, 50.0)));
        assert!(!state.controls.update(&mut state.camera));
    }

    #[test]
    fn drag_rotates_camera() {
        let mut state = state();
        state.controls.update(&mut state.camera);

        state.handle_cursor(PhysicalPosition::new(10.0, 10.0), 1.0);
        state.pointer.on_button(PointerButton::Primary, true);
        state.handle_cursor(PhysicalPosition::new(200.0, 10.0), 1.0);
        assert!(state.controls.update(&mut state.camera));
    }

    #[test]
    fn noop_leaves_panel_alone() {
        let mut state = state();
        let visible = state.panel.is_visible();
        state.apply(Action::Noop);
        assert_eq!(state.panel.is_visible(), visible);
        state.handle_key(KeyCode::KeyH);
        assert_eq!(state.panel.is_visible(), !visible);
    }
}
