//! Конфигурация guards и headless сценариев.
//!
//! Значения по умолчанию взяты из настроек игрового прототипа.
//! Core AI считает параметры уже провалидированными — `validate()` зовёт вызывающая сторона
//! (main, spawn из сценария).

use std::path::Path;

use bevy::prelude::Reflect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{IdleRotationMode, StateKind};
use crate::components::COLLISION_MASK_OBSTACLES;

/// Ошибки конфигурации (сценарий или параметры guard)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read scenario file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("expected finite value >= 0, got {}", value)));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("expected finite value > 0, got {}", value)));
    }
    Ok(())
}

/// Допустимый диапазон полного угла обзора (градусы)
pub const VISION_ANGLE_RANGE: (f32, f32) = (10.0, 120.0);

/// Параметры guard AI (per-agent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GuardConfig {
    // --- Vision ---
    /// Радиус vision cone (метры)
    pub vision_radius: f32,
    /// Полный угол обзора (градусы), половина — в каждую сторону от forward
    pub vision_angle_degrees: f32,
    /// Маска слоёв для occlusion raycast
    pub obstacle_mask: u32,
    /// Второй raycast: первый hit обязан быть целью
    pub confirm_target_identity: bool,

    // --- Patrol ---
    /// Пауза на каждом waypoint (секунды)
    pub patrol_wait_time: f32,

    // --- Idle rotation ---
    /// Шаг поворота (градусы)
    pub idle_rotate_angle: f32,
    /// Длительность одного цикла поворота (секунды)
    pub idle_rotate_interval: f32,
    /// Скорость интерполяции yaw (доля за секунду)
    pub rotation_speed: f32,
    pub idle_rotation_mode: IdleRotationMode,
    /// Насколько далеко от spawn считаем "не на месте" (метры)
    pub origin_epsilon: f32,

    // --- Arrival / return ---
    /// Добавка к stopping distance навигации
    pub arrive_tolerance: f32,
    /// Grace period после потери цели перед возвратом к прежнему поведению (секунды)
    pub lost_chase_return_delay: f32,

    // --- FSM ---
    pub starting_state: StateKind,

    // --- Capture ---
    /// Дистанция контакта guard ↔ intruder (planar, метры)
    pub contact_radius: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            vision_radius: 5.0,
            vision_angle_degrees: 60.0,
            obstacle_mask: COLLISION_MASK_OBSTACLES,
            confirm_target_identity: false,
            patrol_wait_time: 1.5,
            idle_rotate_angle: 90.0,
            idle_rotate_interval: 2.0,
            rotation_speed: 2.0,
            idle_rotation_mode: IdleRotationMode::Stepwise,
            origin_epsilon: 0.1,
            arrive_tolerance: 0.05,
            lost_chase_return_delay: 1.0,
            starting_state: StateKind::Idle,
            contact_radius: 0.75,
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("vision_radius", self.vision_radius)?;

        let (min_angle, max_angle) = VISION_ANGLE_RANGE;
        if !(min_angle..=max_angle).contains(&self.vision_angle_degrees) {
            return Err(invalid(
                "vision_angle_degrees",
                format!(
                    "expected {}..={} degrees, got {}",
                    min_angle, max_angle, self.vision_angle_degrees
                ),
            ));
        }

        if self.obstacle_mask == 0 {
            return Err(invalid("obstacle_mask", "mask must select at least one layer"));
        }

        require_non_negative("patrol_wait_time", self.patrol_wait_time)?;
        if !self.idle_rotate_angle.is_finite() {
            return Err(invalid("idle_rotate_angle", "expected finite angle"));
        }
        require_positive("idle_rotate_interval", self.idle_rotate_interval)?;
        require_positive("rotation_speed", self.rotation_speed)?;
        require_non_negative("origin_epsilon", self.origin_epsilon)?;
        require_non_negative("arrive_tolerance", self.arrive_tolerance)?;
        require_non_negative("lost_chase_return_delay", self.lost_chase_return_delay)?;
        require_non_negative("contact_radius", self.contact_radius)?;

        Ok(())
    }
}

/// Guard в сценарии
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSpawnConfig {
    pub name: String,
    pub position: [f32; 3],
    /// Начальный yaw (градусы, 0 = +Z)
    pub yaw_degrees: f32,
    /// Упорядоченные waypoints (может быть пусто)
    pub waypoints: Vec<[f32; 3]>,
    /// Скорость NavAgent (m/s)
    pub move_speed: f32,
    pub stopping_distance: f32,
    pub config: GuardConfig,
}

impl Default for GuardSpawnConfig {
    fn default() -> Self {
        Self {
            name: "guard".to_string(),
            position: [0.0; 3],
            yaw_degrees: 0.0,
            waypoints: Vec::new(),
            move_speed: 3.5,
            stopping_distance: 0.0,
            config: GuardConfig::default(),
        }
    }
}

/// Intruder (цель) в сценарии — стоит на месте, двигать его можно извне
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntruderConfig {
    pub position: [f32; 3],
    /// Радиус тела для identity raycast
    pub body_radius: f32,
}

impl Default for IntruderConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            body_radius: 0.4,
        }
    }
}

/// Препятствие (AABB на environment слое)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

/// Headless сценарий: guards + intruder + препятствия
///
/// Отсутствующие в JSON списки = пусто (демо-уровень только через `Default`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Сколько app.update() прогнать
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    #[serde(default)]
    pub guards: Vec<GuardSpawnConfig>,
    #[serde(default)]
    pub intruder: Option<IntruderConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

fn default_seed() -> u64 {
    42
}

fn default_ticks() -> u32 {
    1200
}

impl Default for ScenarioConfig {
    /// Демо-уровень: патрульный вокруг склада, часовой у двери, intruder за ящиком
    fn default() -> Self {
        Self {
            seed: default_seed(),
            ticks: default_ticks(),
            guards: vec![
                GuardSpawnConfig {
                    name: "patrol".to_string(),
                    position: [0.0, 1.0, 0.0],
                    waypoints: vec![[0.0, 0.0, 0.0], [8.0, 0.0, 0.0], [8.0, 0.0, 8.0], [0.0, 0.0, 8.0]],
                    config: GuardConfig {
                        starting_state: StateKind::Patrol,
                        ..GuardConfig::default()
                    },
                    ..GuardSpawnConfig::default()
                },
                GuardSpawnConfig {
                    name: "sentry".to_string(),
                    position: [-6.0, 1.0, 4.0],
                    yaw_degrees: 90.0,
                    ..GuardSpawnConfig::default()
                },
            ],
            intruder: Some(IntruderConfig {
                position: [10.0, 1.0, 4.0],
                ..IntruderConfig::default()
            }),
            obstacles: vec![ObstacleConfig {
                center: [4.0, 1.0, 4.0],
                half_extents: [1.0, 1.0, 1.0],
            }],
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: ScenarioConfig = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for guard in &self.guards {
            guard.config.validate()?;
            require_positive("move_speed", guard.move_speed)?;
            require_non_negative("stopping_distance", guard.stopping_distance)?;
        }

        if let Some(intruder) = &self.intruder {
            require_non_negative("body_radius", intruder.body_radius)?;
        }

        for obstacle in &self.obstacles {
            if obstacle.half_extents.iter().any(|extent| !extent.is_finite() || *extent <= 0.0) {
                return Err(invalid("half_extents", "obstacle extents must be > 0"));
            }
        }

        Ok(())
    }
}
