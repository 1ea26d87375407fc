//! Headless симуляция Warden
//!
//! `warden_simulation [scenario.json]` — без аргумента грузится встроенный демо-сценарий.
//! Уровень логов: env `WARDEN_LOG` (debug / info / warning / error).

use std::process::ExitCode;

use warden_simulation::logger::{self, LogLevel};
use warden_simulation::{create_headless_app, spawn_scenario, CaptureLog, Guard, ScenarioConfig, SimulationPlugin};

fn load_scenario() -> Result<ScenarioConfig, warden_simulation::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => ScenarioConfig::load(path),
        None => {
            let scenario = ScenarioConfig::default();
            scenario.validate()?;
            Ok(scenario)
        }
    }
}

fn main() -> ExitCode {
    logger::init_logger();
    if let Ok(level) = std::env::var("WARDEN_LOG") {
        match LogLevel::parse(&level) {
            Some(level) => logger::set_log_level(level),
            None => logger::log_warning(&format!("⚠️ Unknown WARDEN_LOG level `{}`, using default", level)),
        }
    }

    let scenario = match load_scenario() {
        Ok(scenario) => scenario,
        Err(err) => {
            logger::log_error(&format!("❌ Scenario rejected: {}", err));
            return ExitCode::FAILURE;
        }
    };

    logger::log_info(&format!(
        "Starting Warden headless simulation (seed: {}, ticks: {})",
        scenario.seed, scenario.ticks
    ));

    let mut app = create_headless_app(scenario.seed);
    app.add_plugins(SimulationPlugin);
    spawn_scenario(app.world_mut(), &scenario);

    let mut reported_captures = 0;
    for tick in 0..scenario.ticks {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let mut guards = world.query::<&Guard>();
            let states: Vec<String> = guards
                .iter(world)
                .map(|guard| format!("{:?}", guard.state()))
                .collect();
            logger::log_info(&format!("Tick {}: guards [{}]", tick, states.join(", ")));
        }

        let captures = app.world().resource::<CaptureLog>().len();
        if captures > reported_captures {
            logger::log_info(&format!("Tick {}: total captures {}", tick, captures));
            reported_captures = captures;
        }
    }

    logger::log_info(&format!("Simulation complete! Captures: {}", reported_captures));
    ExitCode::SUCCESS
}
