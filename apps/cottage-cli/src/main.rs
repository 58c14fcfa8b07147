use anyhow::Context;
use clap::{Parser, Subcommand};
use cottage_house::build_default_scene;
use cottage_render::{
    CameraProps, DebugTextRenderer, FrameScheduler, OrbitControls, PerspectiveCamera,
    RenderDriver, RenderSurface, Viewport,
};
use cottage_tools::{DebugPanel, bind_defaults};
use std::cell::Cell;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cottage-cli", about = "Headless tools for the cottage scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene statistics
    Info,
    /// Print the assembled scene
    Scene {
        /// Dump as JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
    /// Run the render driver with the text renderer
    Frames {
        /// Number of frames to render
        #[arg(short, long, default_value = "3")]
        count: u64,
    },
    /// Show what a viewport resize does to the camera and drawing buffer
    Resize {
        width: u32,
        height: u32,
        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        dpr: f32,
    },
}

/// Counts frame requests instead of scheduling anything.
#[derive(Default)]
struct CountingScheduler {
    requests: Cell<u64>,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Surface stand-in that reports what the viewport pushed into it.
#[derive(Default)]
struct PrintSurface {
    size: (u32, u32),
    pixel_ratio: f32,
}

impl RenderSurface for PrintSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cottage-cli starting");

    let (scene, cottage) = build_default_scene().context("failed to build scene")?;

    match cli.command {
        Commands::Info => {
            println!("cottage-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "scene: nodes={} meshes={} lights={} materials={} geometries={}",
                scene.node_count(),
                scene.meshes().len(),
                scene.lights().len(),
                scene.material_count(),
                scene.geometry_count()
            );
            let mut panel = DebugPanel::default();
            bind_defaults(&mut panel, &cottage.house, &cottage.lights);
            println!("panel: {} bindings", panel.len());
            for (i, binding) in panel.bindings().iter().enumerate() {
                let value = panel
                    .read(&scene, i)
                    .with_context(|| format!("reading binding {}", binding.label))?;
                println!("  {:<16} {:?}", binding.label, value);
            }
        }
        Commands::Scene { json } => {
            if json {
                let out =
                    serde_json::to_string_pretty(&scene).context("failed to serialize scene")?;
                println!("{out}");
            } else {
                print!("{}", scene.describe());
            }
        }
        Commands::Frames { count } => {
            let props = CameraProps::default();
            let viewport = Viewport::new(1280, 720, 1.0);
            let mut camera = PerspectiveCamera::from_props(&props, viewport.aspect());
            let mut controls = OrbitControls::damped();
            let mut renderer = DebugTextRenderer::new();
            let scheduler = CountingScheduler::default();
            let mut driver = RenderDriver::new();

            let mut last = String::new();
            for _ in 0..count {
                last = driver.tick(&mut controls, &mut camera, &scene, &mut renderer, &scheduler);
            }
            print!("{last}");
            println!(
                "frames={} renders={} requests={} elapsed={:.3}s",
                driver.frames(),
                renderer.frames(),
                scheduler.requests.get(),
                driver.clock().elapsed_secs()
            );
        }
        Commands::Resize { width, height, dpr } => {
            let mut camera = PerspectiveCamera::from_props(&CameraProps::default(), 1.0);
            let mut surface = PrintSurface::default();
            let mut viewport = Viewport::new(1, 1, 1.0);
            viewport.resize(width, height, dpr, &mut camera, &mut surface);
            let (bw, bh) = viewport.drawing_buffer_size();
            println!("camera aspect: {:.4}", camera.aspect);
            println!(
                "surface size: {}x{} pixel ratio: {}",
                surface.size.0, surface.size.1, surface.pixel_ratio
            );
            println!("drawing buffer: {bw}x{bh}");
        }
    }

    Ok(())
}
