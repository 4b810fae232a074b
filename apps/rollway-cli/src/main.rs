use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rollway_driver::PoseDriver;
use rollway_render::{DebugTextRenderer, RenderView};
use rollway_scene::{SceneConfig, SceneContext, SceneHost};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollway", about = "Headless host for the rollway marble-run course")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Mount the default course and run it at a fixed step
    Run {
        /// YAML scene config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Print the text render every N frames (0 disables)
        #[arg(short, long, default_value = "120")]
        every: u64,
        /// Override the config frame step in seconds
        #[arg(long)]
        dt: Option<f32>,
        /// Produce the physics debug overlay
        #[arg(long)]
        debug: bool,
    },
    /// Parse and validate a scene config
    CheckConfig {
        path: PathBuf,
    },
    /// Print kinematic actor poses at sampled times
    Actor {
        /// YAML scene config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seconds between samples
        #[arg(short, long, default_value = "0.5")]
        step: f64,
        /// Number of samples
        #[arg(short, long, default_value = "8")]
        samples: u32,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(p) => SceneConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("rollway-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", rollway_kernel::crate_info());
            println!("driver: {}", rollway_driver::crate_info());
            println!("assets: {}", rollway_assets::crate_info());
            println!("render: {}", rollway_render::crate_info());
            println!("scene: {}", rollway_scene::crate_info());
        }
        Commands::Run {
            config,
            frames,
            every,
            dt,
            debug,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dt) = dt {
                config.dt = dt;
            }
            config.debug |= debug;
            config.validate()?;

            let scene = SceneContext::mount(&config).context("mounting course")?;
            let mut host = SceneHost::new();
            host.mount(scene);

            let renderer = DebugTextRenderer::new();
            let view = RenderView::default();
            let dt = f64::from(config.dt);
            println!("Running {frames} frames at dt={dt:.4}s (debug={})", config.debug);

            for _ in 0..frames {
                let Some(report) = host.frame(dt)? else {
                    break;
                };
                if every > 0 && report.frame % every == 0 {
                    if let Some(scene) = host.scene() {
                        println!("--- frame {} (t={:.2}s) ---", report.frame, report.elapsed);
                        print!("{}", scene.render(&renderer, &view));
                    }
                }
            }

            if let Some(scene) = host.scene() {
                let hash = scene.world().state_hash();
                tracing::info!(frames, hash = %format!("{hash:#018x}"), "run complete");
                println!("state hash: {hash:#018x}");
            }
            if let Some(stats) = host.unmount() {
                println!(
                    "Frames: {} avg={:?} min={:?} max={:?}",
                    stats.frames, stats.average, stats.min, stats.max
                );
            }
        }
        Commands::CheckConfig { path } => {
            let config = load_config(Some(&path))?;
            println!("{}: OK", path.display());
            println!("  gravity={} dt={} debug={}", config.gravity, config.dt, config.debug);
            println!(
                "  box_length={} sphere radius={} restitution={}",
                config.box_length, config.sphere.radius, config.sphere.restitution
            );
            match &config.track {
                Some(track) => println!("  track={}", track.display()),
                None => println!("  track=built-in"),
            }
        }
        Commands::Actor {
            config,
            step,
            samples,
        } => {
            let config = load_config(config.as_deref())?;
            for i in 0..samples {
                let t = f64::from(i) * step;
                let pose = config.driver.pose_at(t);
                println!(
                    "t={t:>6.2} translation=({:.3}, {:.3}, {:.3}) rotation=({:.3}, {:.3}, {:.3})",
                    pose.translation.x,
                    pose.translation.y,
                    pose.translation.z,
                    pose.rotation.x,
                    pose.rotation.y,
                    pose.rotation.z
                );
            }
        }
    }

    Ok(())
}
