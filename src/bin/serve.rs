use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use std::{env, error::Error, time::Duration};

use quadflyer::{
    components::{InputConfig, InputMode, QuadrotorConfig},
    plugins::{LinkPlugin, PhysicsPlugin, PilotInputPlugin, QuadrotorPlugin, StartupSequencePlugin},
    resources::PhysicsConfig,
    utils::ConfigError,
};

const FRAME_RATE: f64 = 60.0;

/// Config from the path given on the command line, or a network-driven default craft.
fn load_config() -> Result<QuadrotorConfig, ConfigError> {
    match env::args().nth(1) {
        Some(path) => QuadrotorConfig::load(path),
        None => Ok(QuadrotorConfig {
            input: InputConfig {
                mode: InputMode::Network,
                ..Default::default()
            },
            ..Default::default()
        }),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    if config.input.mode != InputMode::Network {
        // Headless: no keyboard or gamepad is attached.
        eprintln!(
            "quadflyer_serve: input mode {} has no device here, commands may never arrive",
            config.input.mode
        );
    }

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / FRAME_RATE,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins((
            StartupSequencePlugin,
            PhysicsPlugin::new(PhysicsConfig::default()),
            QuadrotorPlugin::new(config),
            PilotInputPlugin,
            LinkPlugin::default(),
        ))
        .run();

    Ok(())
}
