use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use eframe::egui;

use particle_field::{FieldConfig, LaunchOptions, ParticleFieldApp};

#[derive(Parser, Debug)]
#[command(about = "Animated particle field background")]
struct Args {
    /// YAML file overriding the default field parameters.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the swirl effect turned off.
    #[arg(long)]
    no_swirl: bool,

    /// Show the diagnostics panel on start.
    #[arg(long)]
    diagnostics: bool,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::default(),
    };
    log::debug!("field config: {:?}", config);

    let options = LaunchOptions {
        no_swirl: args.no_swirl,
        diagnostics: args.diagnostics,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Particle Field")
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    // No drawable surface means no loop: report it and exit.
    eframe::run_native(
        "Particle Field",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ParticleFieldApp::new(config, options)))),
    )
    .map_err(|err| anyhow!("failed to open the particle field window: {err}"))
}
