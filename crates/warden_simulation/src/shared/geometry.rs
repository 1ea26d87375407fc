//! Плоская геометрия для AI: yaw ↔ direction, planar distance.
//!
//! Соглашение: yaw = 0 смотрит в +Z, положительный yaw поворачивает к +X
//! (совпадает с `Quat::from_rotation_y(yaw) * Vec3::Z`).

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Квадрат расстояния в плоскости XZ (Y игнорируется).
///
/// Высота ground offset иначе мешает сходимости arrival-проверок.
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar_distance_squared(a, b).sqrt()
}

/// Forward вектор для yaw (в плоскости XZ, длина 1)
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw направления движения; `None` если направление вырождено в плоскости.
pub fn yaw_from_direction(direction: Vec3) -> Option<f32> {
    if direction.x * direction.x + direction.z * direction.z <= f32::EPSILON {
        return None;
    }
    Some(direction.x.atan2(direction.z))
}

pub fn yaw_from_rotation(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::Z;
    yaw_from_direction(forward).unwrap_or(0.0)
}

/// Нормализация угла в (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Интерполяция угла по кратчайшей дуге, `t` в [0, 1].
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t.clamp(0.0, 1.0))
}
