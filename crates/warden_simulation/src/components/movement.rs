//! Movement компоненты: headless навигационный агент

use bevy::prelude::*;

use crate::ai::NavigationAgent;
use crate::shared::{planar_distance, yaw_from_direction};

/// Headless навигатор (straight-line, без pathfinding)
///
/// Архитектура:
/// - Guard AI пишет команды через `NavigationAgent` trait
/// - `advance_navigators` двигает `position` и синхронизирует Transform
/// - В Godot вместо него работает NavigationAgent3D, контракт тот же
///
/// Движение только в плоскости XZ: высота агента не меняется, поэтому
/// arrival проверяется planar distance.
///
/// Path latency: новый destination принимается через `path_latency_ticks`,
/// до этого агент продолжает идти по текущему пути (как NavigationAgent3D).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Текущая позиция (authoritative для Transform.translation)
    pub position: Vec3,
    /// Скорость движения (m/s)
    pub speed: f32,
    /// Дистанция на которой агент останавливается перед целью
    pub stopping_distance: f32,
    /// Сколько тиков "считается путь" после set_destination (эмуляция pathPending)
    pub path_latency_ticks: u32,
    destination: Option<Vec3>,
    /// Точка, к которой агент реально идёт (destination после расчёта пути)
    path: Option<Vec3>,
    stopped: bool,
    pending_ticks: u32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            speed: 3.5,
            stopping_distance: 0.0,
            path_latency_ticks: 0,
            destination: None,
            path: None,
            stopped: false,
            pending_ticks: 0,
        }
    }
}

impl NavAgent {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed,
            ..default()
        }
    }

    pub fn with_path_latency(mut self, ticks: u32) -> Self {
        self.path_latency_ticks = ticks;
        self
    }

    /// Один шаг движения. Возвращает yaw движения если агент сдвинулся.
    pub fn advance(&mut self, delta: f32) -> Option<f32> {
        if self.pending_ticks > 0 {
            self.pending_ticks -= 1;
        }
        if self.pending_ticks == 0 {
            self.path = self.destination;
        }

        if self.stopped {
            return None;
        }

        let path = self.path?;
        let remaining = planar_distance(self.position, path) - self.stopping_distance;
        if remaining <= 0.0 {
            return None;
        }

        let mut offset = path - self.position;
        offset.y = 0.0;
        let direction = offset.normalize_or_zero();
        let step = (self.speed * delta).min(remaining);
        self.position += direction * step;

        yaw_from_direction(direction)
    }
}

impl NavigationAgent for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        // Повторный set той же точки не перезапускает расчёт пути,
        // новая точка во время расчёта подхватится по его завершении
        if self.destination != Some(point) && self.pending_ticks == 0 {
            self.pending_ticks = self.path_latency_ticks;
        }
        self.destination = Some(point);
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn path_pending(&self) -> bool {
        self.pending_ticks > 0
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|destination| planar_distance(self.position, destination))
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn warp(&mut self, point: Vec3) {
        self.position = point;
        self.destination = None;
        self.path = None;
        self.pending_ticks = 0;
    }
}
