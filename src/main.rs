use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use env_logger::Env;

use gesture_galaxy::prelude::*;

/// Where gestures come from besides the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GestureInput {
    /// Keyboard only.
    Keyboard,
    /// One gesture per line on stdin (bare token or JSON payload).
    Stdin,
    /// A looping built-in tour of every gesture.
    Demo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Smoothing {
    /// Fixed fraction per frame, speed follows the refresh rate.
    PerFrame,
    /// Fraction scaled by elapsed time against a 60 Hz reference.
    TimeNormalized,
}

#[derive(Parser, Debug)]
#[command(
    name = "gesture-galaxy",
    version,
    about = "Spiral galaxy point cloud steered by gesture events"
)]
struct Args {
    /// JSON configuration file; command-line flags override its values.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,

    /// Number of particles.
    #[arg(short = 'n', long)]
    particles: Option<u32>,

    /// Number of spiral arms.
    #[arg(long)]
    branches: Option<u32>,

    /// Galaxy radius.
    #[arg(long)]
    radius: Option<f32>,

    /// Arm twist per unit radius.
    #[arg(long)]
    spin: Option<f32>,

    /// Seconds a gesture stays active before reverting.
    #[arg(long)]
    dwell: Option<f32>,

    /// Per-step smoothing factor in (0, 1].
    #[arg(long)]
    smoothing_factor: Option<f32>,

    #[arg(long, value_enum)]
    smoothing: Option<Smoothing>,

    #[arg(short, long, value_enum, default_value = "keyboard")]
    input: GestureInput,
}

impl Args {
    fn into_config(self) -> Result<(GalaxyConfig, GestureInput, Option<PathBuf>), RunError> {
        let mut config = match &self.config {
            Some(path) => GalaxyConfig::load(path)?,
            None => GalaxyConfig::default(),
        };

        if let Some(n) = self.particles {
            config.particle_count = n;
        }
        if let Some(b) = self.branches {
            config.galaxy.branches = b;
        }
        if let Some(r) = self.radius {
            config.galaxy.radius = r;
        }
        if let Some(s) = self.spin {
            config.galaxy.spin = s;
        }
        if let Some(d) = self.dwell {
            config.session.dwell_secs = d;
        }
        if let Some(k) = self.smoothing_factor {
            config.motion.smoothing_factor = k;
        }
        match self.smoothing {
            Some(Smoothing::PerFrame) => config.motion.smoothing_mode = SmoothingMode::PerFrame,
            Some(Smoothing::TimeNormalized) => {
                config.motion.smoothing_mode = SmoothingMode::TimeNormalized { reference_hz: 60.0 }
            }
            None => {}
        }

        config.validate()?;
        Ok((config, self.input, self.dump_config))
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let (config, input, dump_config) = args.into_config()?;

    if let Some(path) = dump_config {
        config.save(&path)?;
        log::info!("configuration written to {}", path.display());
        return Ok(());
    }

    let system = GalaxySystem::new(config)?;

    match input {
        GestureInput::Keyboard => {}
        GestureInput::Stdin => {
            log::info!("reading gestures from stdin");
            spawn_gesture_source(LineGestureSource::new(io::BufReader::new(io::stdin())), system.sender());
        }
        GestureInput::Demo => {
            log::info!("replaying demo gesture tour");
            spawn_gesture_source(ScriptedGestureSource::demo(), system.sender());
        }
    }

    gesture_galaxy::app::run(system)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
