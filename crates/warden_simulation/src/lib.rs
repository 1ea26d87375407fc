//! Warden Simulation Core
//!
//! Guard AI на Bevy 0.16: vision cone perception + behavior FSM
//! (Idle / Patrol / Alert / Returning), headless и детерминированно.
//!
//! Слои:
//! - ai — behavior core + ECS системы (FixedUpdate 60Hz)
//! - components — NavAgent, препятствия, Intruder marker
//! - config / scenario — serde конфиги и spawn headless сценариев

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod components;
pub mod config;
pub mod logger;
pub mod scenario;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{
    CaptureLog, ContactReported, Guard, GuardAIPlugin, GuardStateChanged, ReturnToPost, StateKind, TargetCaught,
};
pub use components::*;
pub use config::{ConfigError, GuardConfig, ScenarioConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use scenario::{spawn_scenario, ScenarioEntities};

/// Частота simulation tick (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Seed задаёт create_headless_app; init не перетирает уже вставленный
            .init_resource::<DeterministicRng>()
            .add_plugins(GuardAIPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: каждый `app.update()` (кроме первого) = ровно один FixedUpdate tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

    app
}

/// Snapshot мира для сравнения детерминизма
/// (Debug-сериализация компонентов, отсортированных по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
