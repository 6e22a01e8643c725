//! Posture monitor application: webcam posture alerts with a Pomodoro timer.

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use posture_monitor::{
    app::{AppConfig, PostureApp},
    classifier::Tolerance,
    config::{Config, EXAMPLE_CONFIG},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use (overrides the config file)
    #[arg(long)]
    cam: Option<i32>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Posture tolerance from 0 (strict) to 10 (lenient)
    #[arg(short, long)]
    tolerance: Option<u8>,

    /// Seconds of bad posture before an alert
    #[arg(short, long)]
    warning_time: Option<f64>,

    /// Start and stop timer phases when standing up or sitting down
    #[arg(short, long)]
    auto_advance: bool,

    /// Disable alert sounds
    #[arg(short, long)]
    mute: bool,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Posture Monitor");

    // Load configuration if provided
    let mut settings = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        info!("Using default configuration");
        Config::default()
    };

    // Command-line overrides
    if let Some(cam) = args.cam {
        settings.camera.index = cam;
    }
    if let Some(tolerance) = args.tolerance {
        settings.posture.tolerance = Tolerance::new(tolerance).value();
    }
    if let Some(warning_time) = args.warning_time {
        settings.posture.warning_time_secs = warning_time;
    }
    if args.auto_advance {
        settings.timer.auto_advance = true;
    }
    if args.mute {
        settings.audio.enabled = false;
    }

    settings.validate()?;

    let config = AppConfig {
        settings,
        headless: args.headless,
        debug: args.debug,
    };

    // Create and run application
    let mut app = PostureApp::new(config)?;
    app.run()?;

    Ok(())
}
