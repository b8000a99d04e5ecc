//! Headless driver: spawns a flock, runs a fixed-timestep loop, and
//! reports telemetry through tracing.

mod prefs;

use anyhow::{Context, Result};
use clap::Parser;
use flock_core::{
    ArenaBounds, DisplaySettings, Flock, FlockConfig, FrameInput, Rgb, TuningParams,
};
use prefs::Preferences;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "flock", about = "Emergent flocking simulation driver")]
struct Cli {
    /// Number of boids to spawn.
    #[arg(long, default_value_t = 50)]
    boids: usize,

    /// Arena width in world units.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Arena height in world units.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Boid radius in world units.
    #[arg(long, default_value_t = 4.0)]
    radius: f64,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 1_000)]
    frames: u64,

    /// Fixed simulation rate in frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// RNG seed for reproducible runs.
    #[arg(long, env = "FLOCK_SEED")]
    seed: Option<u64>,

    /// Cohesion rule scale.
    #[arg(long, default_value_t = 1.0)]
    cohesion: f64,

    /// Alignment rule scale.
    #[arg(long, default_value_t = 1.0)]
    alignment: f64,

    /// Repulsion rule scale.
    #[arg(long, default_value_t = 1.0)]
    repulsion: f64,

    /// Visibility radius scale.
    #[arg(long, default_value_t = 1.0)]
    visibility: f64,

    /// Acceleration cap multiplier.
    #[arg(long, default_value_t = 1.0)]
    accel: f64,

    /// Boid fill opacity.
    #[arg(long, default_value_t = 0.75)]
    opacity: f64,

    /// Override and persist the boid color (#RRGGBB).
    #[arg(long)]
    color: Option<String>,

    /// Override and persist whether trails are drawn.
    #[arg(long)]
    show_path: Option<bool>,

    /// Preferences file location.
    #[arg(long, default_value = "flock-prefs.json")]
    prefs: PathBuf,

    /// Frames between telemetry log lines.
    #[arg(long, default_value_t = 60)]
    log_every: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let preferences = resolve_preferences(&cli)?;
    let color = Rgb::from_hex(&preferences.color)
        .with_context(|| format!("preference color {:?} is not valid hex", preferences.color))?;

    let config = FlockConfig {
        count: cli.boids,
        radius: cli.radius,
        width: cli.width,
        height: cli.height,
        rng_seed: cli.seed,
        ..FlockConfig::default()
    };
    let mut flock = Flock::new(config).context("spawning flock")?;
    info!(
        boids = flock.boid_count(),
        width = cli.width,
        height = cli.height,
        frames = cli.frames,
        "Flock spawned"
    );

    let mut input = FrameInput {
        dt: 0.0,
        bounds: ArenaBounds::new(cli.width, cli.height),
        tuning: TuningParams {
            cohesion: cli.cohesion,
            alignment: cli.alignment,
            repulsion: cli.repulsion,
            visibility: cli.visibility,
            acceleration_multiplier: cli.accel,
        },
        display: DisplaySettings {
            color,
            opacity: cli.opacity,
            show_path: preferences.show_path,
        },
    };

    // First frame has no elapsed time to integrate over; it only
    // resolves telemetry.
    let telemetry = flock.step(&input);
    info!(
        visibility_radius = telemetry.visibility_radius,
        max_acceleration = telemetry.max_acceleration,
        color = %telemetry.color,
        "Tuning resolved"
    );

    input.dt = 1.0 / cli.fps;
    for frame in 1..=cli.frames {
        let telemetry = flock.step(&input);
        if cli.log_every > 0 && frame % cli.log_every == 0 {
            info!(
                frame = telemetry.frame.0,
                boids = telemetry.boid_count,
                trail_len = telemetry.trail_len,
                mean_speed = mean_speed(&flock),
                "Frame advanced"
            );
        }
    }

    info!(
        frames = flock.frame().0,
        mean_speed = mean_speed(&flock),
        "Run complete"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Load stored preferences and fold in CLI overrides, persisting when
/// anything changed.
fn resolve_preferences(cli: &Cli) -> Result<Preferences> {
    let mut preferences = Preferences::load(&cli.prefs);
    let mut dirty = false;

    if let Some(color) = &cli.color {
        Rgb::from_hex(color).with_context(|| format!("--color {color:?} is not valid hex"))?;
        if preferences.color != *color {
            preferences.color = color.clone();
            dirty = true;
        }
    }
    if let Some(show_path) = cli.show_path {
        if preferences.show_path != show_path {
            preferences.show_path = show_path;
            dirty = true;
        }
    }

    if dirty {
        preferences.save(&cli.prefs)?;
        info!(path = %cli.prefs.display(), "Preferences updated");
    }
    Ok(preferences)
}

fn mean_speed(flock: &Flock) -> f64 {
    let velocities = flock.columns().velocities();
    if velocities.is_empty() {
        return 0.0;
    }
    let total: f64 = velocities.iter().map(|v| v.magnitude()).sum();
    total / velocities.len() as f64
}
