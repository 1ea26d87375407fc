//! Spawn headless сценария: guards, intruder, препятствия.

use bevy::prelude::*;

use crate::ai::context::Pose;
use crate::ai::Guard;
use crate::components::{Intruder, NavAgent, ObstacleCollider};
use crate::config::{GuardSpawnConfig, IntruderConfig, ObstacleConfig, ScenarioConfig};
use crate::logger;

/// Радиус тела guard для identity raycast
pub const GUARD_BODY_RADIUS: f32 = 0.4;

/// Entities созданные из сценария (в порядке конфига)
#[derive(Debug, Clone, Default)]
pub struct ScenarioEntities {
    pub guards: Vec<Entity>,
    pub intruder: Option<Entity>,
    pub obstacles: Vec<Entity>,
}

pub fn spawn_guard(world: &mut World, spawn: &GuardSpawnConfig) -> Entity {
    let position = Vec3::from_array(spawn.position);
    let pose = Pose::new(position, spawn.yaw_degrees.to_radians());
    let waypoints = spawn.waypoints.iter().copied().map(Vec3::from_array).collect();

    let mut nav = NavAgent::new(position, spawn.move_speed);
    nav.stopping_distance = spawn.stopping_distance;

    world
        .spawn((
            Name::new(spawn.name.clone()),
            Transform::from_translation(position).with_rotation(pose.rotation()),
            Guard::new(pose, waypoints, spawn.config.clone()),
            nav,
            ObstacleCollider::actor(GUARD_BODY_RADIUS),
        ))
        .id()
}

pub fn spawn_intruder(world: &mut World, intruder: &IntruderConfig) -> Entity {
    world
        .spawn((
            Name::new("intruder"),
            Transform::from_translation(Vec3::from_array(intruder.position)),
            Intruder,
            ObstacleCollider::actor(intruder.body_radius),
        ))
        .id()
}

pub fn spawn_obstacle(world: &mut World, obstacle: &ObstacleConfig) -> Entity {
    world
        .spawn((
            Name::new("obstacle"),
            Transform::from_translation(Vec3::from_array(obstacle.center)),
            ObstacleCollider::wall(Vec3::from_array(obstacle.half_extents)),
        ))
        .id()
}

/// Спавн всего сценария. Сценарий должен быть уже провалидирован.
pub fn spawn_scenario(world: &mut World, scenario: &ScenarioConfig) -> ScenarioEntities {
    let obstacles = scenario
        .obstacles
        .iter()
        .map(|obstacle| spawn_obstacle(world, obstacle))
        .collect();

    let intruder = scenario
        .intruder
        .as_ref()
        .map(|intruder| spawn_intruder(world, intruder));

    let guards: Vec<Entity> = scenario
        .guards
        .iter()
        .map(|guard| spawn_guard(world, guard))
        .collect();

    logger::log(&format!(
        "🗺️ Scenario spawned: {} guards, intruder: {}, {} obstacles",
        guards.len(),
        intruder.is_some(),
        scenario.obstacles.len()
    ));

    ScenarioEntities {
        guards,
        intruder,
        obstacles,
    }
}
