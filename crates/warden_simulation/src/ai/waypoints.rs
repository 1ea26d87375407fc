//! Patrol route — циклический обход waypoints.
//!
//! Пустой маршрут валиден: все операции no-op, patrol превращается в "стоим на месте".

use bevy::prelude::*;

use crate::shared::planar_distance_squared;

/// `(index + 1) mod len`; None для пустого маршрута
pub fn next_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((index + 1) % len)
}

/// `(index - 1)` с нормализацией в [0, len)
pub fn previous_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    wrap_index(index as isize - 1, len)
}

/// Нормализация произвольного (в т.ч. отрицательного) индекса в [0, len)
pub fn wrap_index(index: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(index.rem_euclid(len as isize) as usize)
}

/// Ближайший waypoint по planar distance (Y исключён).
///
/// При равенстве выигрывает меньший индекс.
pub fn closest_index(waypoints: &[Vec3], position: Vec3) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (index, waypoint) in waypoints.iter().enumerate() {
        let distance = planar_distance_squared(*waypoint, position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// Маршрут патруля + текущий индекс
///
/// Инвариант: `current_index < waypoints.len()` когда маршрут не пуст.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    current_index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current_index: 0,
        }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Waypoint под текущим индексом
    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.current_index).copied()
    }

    /// Установить индекс (с нормализацией). Возвращает новый waypoint.
    pub fn set_index(&mut self, index: isize) -> Option<Vec3> {
        self.current_index = wrap_index(index, self.len())?;
        self.current()
    }

    pub fn advance(&mut self) -> Option<Vec3> {
        self.current_index = next_index(self.current_index, self.len())?;
        self.current()
    }

    pub fn retreat(&mut self) -> Option<Vec3> {
        self.current_index = previous_index(self.current_index, self.len())?;
        self.current()
    }

    /// Перейти к ближайшему к `position` waypoint
    pub fn snap_to_closest(&mut self, position: Vec3) -> Option<Vec3> {
        self.current_index = closest_index(&self.waypoints, position)?;
        self.current()
    }
}
