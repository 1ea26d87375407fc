//! Внешние сервисы, которыми пользуется guard AI.
//!
//! Core не двигает агента и не ищет пути сам — только отдаёт команды
//! (`set_destination` / `stop` / `resume`) и читает состояние навигации.
//! Реализации: `NavAgent` (headless), Godot NavigationAgent3D (tactical layer), test doubles.

use bevy::prelude::*;

use crate::shared::planar_distance;

/// Навигационный агент (path computation + movement execution)
pub trait NavigationAgent {
    fn set_destination(&mut self, point: Vec3);

    /// Текущая цель (None если путь сброшен, например после `warp`)
    fn destination(&self) -> Option<Vec3>;

    fn stop(&mut self);

    fn resume(&mut self);

    fn is_stopped(&self) -> bool;

    /// true пока путь ещё считается
    fn path_pending(&self) -> bool;

    fn remaining_distance(&self) -> f32;

    fn stopping_distance(&self) -> f32;

    /// Телепорт (respawn и т.п.). Сбрасывает путь.
    fn warp(&mut self, point: Vec3);
}

/// Поиск цели по тегу (аналог FindGameObjectWithTag("Player"))
pub trait TargetLocator {
    fn find_tagged_target(&self) -> Option<Entity>;

    /// Позиция цели; None если entity исчезла
    fn target_position(&self, target: Entity) -> Option<Vec3>;

    fn is_tagged_target(&self, entity: Entity) -> bool {
        self.find_tagged_target() == Some(entity)
    }
}

/// Кто кого поймал
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureReport {
    pub guard: Entity,
    pub target: Entity,
}

/// Outbound callback: цель поймана (игровой flow решает что дальше — respawn, game over)
pub trait CaptureNotifier {
    fn target_caught(&mut self, report: CaptureReport);
}

impl<F> CaptureNotifier for F
where
    F: FnMut(CaptureReport),
{
    fn target_caught(&mut self, report: CaptureReport) {
        self(report)
    }
}

/// Arrival condition: `!path_pending && planar(position, destination) <= stopping + tolerance`.
///
/// Без destination считаем что агент уже на месте.
pub fn has_arrived(navigation: &dyn NavigationAgent, position: Vec3, arrive_tolerance: f32) -> bool {
    if navigation.path_pending() {
        return false;
    }

    let Some(destination) = navigation.destination() else {
        return true;
    };

    planar_distance(position, destination) <= navigation.stopping_distance() + arrive_tolerance
}
