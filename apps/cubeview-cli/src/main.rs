use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cubeview_render::DebugTextRenderer;
use cubeview_runtime::{
    App, AppConfig, FrameOutcome, HeadlessContainer, HeadlessHost, ManualScheduler, ResizeOutcome,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubeview-cli", about = "Headless cubeview driver")]
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
    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration file to merge over the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Drive the render loop against an in-memory container
    Run {
        /// Number of frame callbacks to fire
        #[arg(short, long, default_value = "3")]
        frames: u64,
        /// Initial container width
        #[arg(long, default_value = "800")]
        width: u32,
        /// Initial container height
        #[arg(long, default_value = "600")]
        height: u32,
        /// Device pixel ratio of the container
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f64,
        /// Milliseconds between frame timestamps
        #[arg(long, default_value = "16.0")]
        frame_ms: f64,
        /// Resize the container before a frame, as WIDTHxHEIGHT@FRAME
        #[arg(long)]
        resize: Vec<ResizeStep>,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print one JSON frame report per line
        #[arg(long)]
        json: bool,
    },
}

/// A scripted container resize applied before frame `frame` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResizeStep {
    width: u32,
    height: u32,
    frame: u64,
}

impl FromStr for ResizeStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, frame) = s
            .split_once('@')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT@FRAME, got `{s}`"))?;
        let (width, height) = size
            .split_once('x')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{size}`"))?;
        let parse = |v: &str| v.trim().parse::<u64>().map_err(|e| format!("`{v}`: {e}"));

        let frame = parse(frame)?;
        if frame == 0 {
            return Err("frames are numbered from 1".into());
        }
        Ok(Self {
            width: u32::try_from(parse(width)?).map_err(|e| e.to_string())?,
            height: u32::try_from(parse(height)?).map_err(|e| e.to_string())?,
            frame,
        })
    }
}

struct RunOptions {
    frames: u64,
    width: u32,
    height: u32,
    pixel_ratio: f64,
    frame_ms: f64,
    resize: Vec<ResizeStep>,
    json: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn run(config: AppConfig, opts: RunOptions) -> anyhow::Result<()> {
    if !(opts.pixel_ratio.is_finite() && opts.pixel_ratio > 0.0) {
        bail!("pixel ratio must be positive, got {}", opts.pixel_ratio);
    }

    let container = HeadlessContainer::new(opts.width, opts.height).with_pixel_ratio(opts.pixel_ratio);
    let host = HeadlessHost::new().with_container(config.container_id.clone(), container);
    let mut app = App::initialize(&host, config, |_| Ok(DebugTextRenderer::new()))?;

    let mut scheduler = ManualScheduler::new();
    app.start(&mut scheduler);

    for frame in 1..=opts.frames {
        for step in opts.resize.iter().filter(|s| s.frame == frame) {
            app.container_mut().resize(step.width, step.height);
            let outcome = app.on_resize();
            if !opts.json {
                println!("resize before frame {frame}: {}", describe_resize(&outcome));
            }
        }

        if !scheduler.take() {
            tracing::info!(frame, "no frame scheduled, loop ended");
            break;
        }

        let timestamp_ms = (frame - 1) as f64 * opts.frame_ms;
        let report = app.frame(timestamp_ms, &mut scheduler)?;
        if opts.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            let outcome = match report.outcome {
                FrameOutcome::Rendered => "rendered",
                FrameOutcome::Skipped => "skipped",
                FrameOutcome::Dropped => "dropped",
            };
            println!(
                "frame {}: t={:.3}s {outcome}{}",
                report.frame,
                report.time_seconds,
                if report.camera_moved { " (camera moved)" } else { "" }
            );
        }
    }
    app.stop();

    if !opts.json {
        println!(
            "{} frame(s), {} drawn",
            app.frame_count(),
            app.renderer().frame_count()
        );
        if let Some(last) = app.renderer().last_frame() {
            println!("{last}");
        }
    }
    Ok(())
}

fn describe_resize(outcome: &ResizeOutcome) -> String {
    match outcome {
        ResizeOutcome::Applied(viewport) => format!("applied {viewport}"),
        ResizeOutcome::Clamped { requested, applied } => {
            format!("{requested} clamped to {applied}")
        }
        ResizeOutcome::Deferred(viewport) => format!("{viewport} deferred"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubeview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cubeview_common::crate_info());
            println!("scene: {}", cubeview_scene::crate_info());
            println!("render: {}", cubeview_render::crate_info());
            println!("render-wgpu: {}", cubeview_render_wgpu::crate_info());
            println!("input: {}", cubeview_input::crate_info());
            println!("runtime: {}", cubeview_runtime::crate_info());
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            frames,
            width,
            height,
            pixel_ratio,
            frame_ms,
            resize,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            run(
                config,
                RunOptions {
                    frames,
                    width,
                    height,
                    pixel_ratio,
                    frame_ms,
                    resize,
                    json,
                },
            )?;
        }
    }

    Ok(())
}
