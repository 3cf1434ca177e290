mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderstar_engine::{Engine, EngineConfig};
use renderstar_render::{DebugTextRenderer, Renderer};
use renderstar_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

use demo::DemoMod;

#[derive(Parser)]
#[command(name = "renderstar-cli", about = "Headless driver for the RenderStar scene engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the demo scene for a fixed number of frames
    Run {
        /// Number of frames to drive (overrides the config)
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Engine config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the final frame as text
        #[arg(long)]
        dump: bool,
    },
    /// Print the demo scene hierarchy
    Tree {
        /// Engine config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<EngineConfig> {
    Ok(match path {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    })
}

fn demo_engine(config: EngineConfig) -> anyhow::Result<Engine> {
    let aspect_ratio = config.aspect_ratio;
    let mut engine = Engine::new(config);
    engine.register_mod(DemoMod { aspect_ratio })?;
    Ok(engine)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("renderstar-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", renderstar_kernel::crate_info());
            println!("events: {}", renderstar_events::crate_info());
            println!("assets: {}", renderstar_assets::crate_info());
            println!("render: {}", renderstar_render::crate_info());
            println!("tools: {}", renderstar_tools::crate_info());
            println!("engine: {}", renderstar_engine::crate_info());
        }
        Commands::Run {
            ticks,
            config,
            dump,
        } => {
            let mut config = load_config(config)?;
            if let Some(ticks) = ticks {
                config.ticks = ticks;
            }
            let ticks = config.ticks;
            println!("{}: running {ticks} frames", config.title);

            let mut engine = demo_engine(config)?;
            let frames = engine.run_headless(ticks)?;

            let scene = &engine.context().scene;
            println!("Frames: {frames}");
            println!("{}", SceneInspector::summary(scene));
            if let Some(info) = scene
                .find("Square")
                .and_then(|id| SceneInspector::inspect_node(scene, id))
            {
                println!("{info}");
            }
            if dump {
                print!("{}", DebugTextRenderer::new().render(scene, &engine.camera_view()));
            }
            engine.clean_up();
        }
        Commands::Tree { config } => {
            let mut engine = demo_engine(load_config(config)?)?;
            engine.pre_initialize()?;
            engine.initialize()?;
            for line in SceneInspector::tree(&engine.context().scene) {
                println!("{line}");
            }
            engine.clean_up();
        }
    }

    Ok(())
}
