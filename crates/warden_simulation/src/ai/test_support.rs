//! Test doubles для guard AI collaborators (только #[cfg(test)]).

use bevy::prelude::*;

use crate::ai::collaborators::{NavigationAgent, TargetLocator};
use crate::shared::planar_distance;

/// Команда отправленная навигатору (для проверки порядка вызовов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavCommand {
    SetDestination(Vec3),
    Stop,
    Resume,
    Warp(Vec3),
}

/// Навигатор без pathfinding: двигается по прямой, если не остановлен
#[derive(Debug, Clone)]
pub struct MockNavigator {
    pub position: Vec3,
    pub speed: f32,
    pub stopping: f32,
    pub pending: bool,
    destination: Option<Vec3>,
    stopped: bool,
    pub commands: Vec<NavCommand>,
}

impl MockNavigator {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            speed: 4.0,
            stopping: 0.0,
            pending: false,
            destination: None,
            stopped: false,
            commands: Vec::new(),
        }
    }

    /// Сдвиг к destination на `speed * delta` (без overshoot)
    pub fn step(&mut self, delta: f32) {
        if self.stopped || self.pending {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };

        let to_destination = destination - self.position;
        let distance = to_destination.length();
        let step = self.speed * delta;
        if distance <= step {
            self.position = destination;
        } else {
            self.position += to_destination / distance * step;
        }
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl NavigationAgent for MockNavigator {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.commands.push(NavCommand::SetDestination(point));
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.commands.push(NavCommand::Stop);
    }

    fn resume(&mut self) {
        self.stopped = false;
        self.commands.push(NavCommand::Resume);
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|destination| planar_distance(self.position, destination))
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping
    }

    fn warp(&mut self, point: Vec3) {
        self.position = point;
        self.destination = None;
        self.commands.push(NavCommand::Warp(point));
    }
}

/// Одна цель с фиксированной (изменяемой в тесте) позицией
#[derive(Debug, Clone, Default)]
pub struct StaticTargets {
    pub target: Option<(Entity, Vec3)>,
}

impl StaticTargets {
    pub fn with(target: Entity, position: Vec3) -> Self {
        Self {
            target: Some((target, position)),
        }
    }
}

impl TargetLocator for StaticTargets {
    fn find_tagged_target(&self) -> Option<Entity> {
        self.target.map(|(entity, _)| entity)
    }

    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.target
            .filter(|(entity, _)| *entity == target)
            .map(|(_, position)| position)
    }
}
