//! Perception — vision cone с occlusion raycast.
//!
//! Чистая геометрия: distance → angle → raycast. Без side effects и кэша,
//! вызывается один раз за tick на агента.
//!
//! Граничные правила:
//! - `distance == radius` — цель видна (inclusive)
//! - `distance == 0` — направление не определено, цель считается видимой
//!   (угол и occlusion не проверяются)
//! - нулевой / NaN `forward` — цель не видна

use bevy::prelude::*;

use crate::components::COLLISION_MASK_RAYCAST_LOS;

/// Hit первого коллайдера на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Дистанция от origin до точки попадания
    pub distance: f32,
    /// Entity коллайдера (None для анонимной геометрии)
    pub entity: Option<Entity>,
}

/// Параметры raycast запроса
#[derive(Debug, Clone, Copy)]
pub struct RayQuery {
    pub origin: Vec3,
    pub direction: Dir3,
    pub max_distance: f32,
    /// Битовая маска слоёв (COLLISION_LAYER_*)
    pub mask: u32,
    /// Коллайдер который игнорируем (собственное тело наблюдателя)
    pub exclude: Option<Entity>,
}

/// Raycast против геометрии сцены (внешний сервис: Rapier, Godot physics, ObstacleField)
pub trait ObstacleRaycaster {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit>;
}

/// Пустая сцена — ничего не блокирует
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl ObstacleRaycaster for OpenSky {
    fn cast_ray(&self, _query: &RayQuery) -> Option<RayHit> {
        None
    }
}

/// Допуск: hit "на" цели (поверхность коллайдера цели) не считается препятствием
const OCCLUSION_EPSILON: f32 = 1e-3;

/// Vision cone: радиус + половина угла вокруг forward
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct VisionCone {
    pub radius: f32,
    /// Половина угла обзора (радианы)
    pub half_angle: f32,
    /// Маска occlusion raycast
    pub obstacle_mask: u32,
    /// Второй raycast без obstacle-only маски: первый hit должен быть целью
    pub confirm_identity: bool,
}

impl VisionCone {
    /// Cone из полного угла обзора в градусах (как в конфиге)
    pub fn from_degrees(radius: f32, vision_angle_degrees: f32, obstacle_mask: u32) -> Self {
        Self {
            radius,
            half_angle: (vision_angle_degrees * 0.5).to_radians(),
            obstacle_mask,
            confirm_identity: false,
        }
    }

    pub fn with_identity_check(mut self, enabled: bool) -> Self {
        self.confirm_identity = enabled;
        self
    }

    /// Видит ли наблюдатель цель.
    ///
    /// `observer` исключается из identity raycast (луч стартует внутри собственного тела).
    pub fn is_target_visible(
        &self,
        origin: Vec3,
        forward: Vec3,
        target_position: Vec3,
        target: Entity,
        observer: Option<Entity>,
        raycaster: &dyn ObstacleRaycaster,
    ) -> bool {
        let to_target = target_position - origin;
        let distance = to_target.length();

        if distance > self.radius {
            return false;
        }

        let Ok(direction) = Dir3::new(to_target) else {
            // distance == 0 (или вырожденный вектор) — цель "внутри" наблюдателя
            return true;
        };

        let Ok(facing) = Dir3::new(forward) else {
            // Вырожденный forward: угол не определён (NaN прошёл бы проверку)
            return false;
        };

        let angle = facing.as_vec3().angle_between(direction.as_vec3());
        if angle > self.half_angle {
            return false;
        }

        let occlusion = RayQuery {
            origin,
            direction,
            max_distance: distance,
            mask: self.obstacle_mask,
            exclude: observer,
        };
        if blocks_target(raycaster.cast_ray(&occlusion), target, distance) {
            return false;
        }

        if self.confirm_identity {
            let identity = RayQuery {
                mask: COLLISION_MASK_RAYCAST_LOS,
                ..occlusion
            };
            if blocks_target(raycaster.cast_ray(&identity), target, distance) {
                return false;
            }
        }

        true
    }
}

/// Hit блокирует только если это не сама цель и он раньше цели
fn blocks_target(hit: Option<RayHit>, target: Entity, target_distance: f32) -> bool {
    match hit {
        None => false,
        Some(hit) if hit.entity == Some(target) => false,
        Some(hit) => hit.distance < target_distance - OCCLUSION_EPSILON,
    }
}
