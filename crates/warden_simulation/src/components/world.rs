//! World компоненты: collision layers, препятствия, intruder marker

use bevy::prelude::*;

// ============================================================================
// Layer битовые маски (на каком слое объект находится)
// ============================================================================

/// Layer 2: Actors (guards, intruder)
pub const COLLISION_LAYER_ACTORS: u32 = 0b10; // 2

/// Layer 3: Environment (стены, ящики, колонны)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

// ============================================================================
// Mask битовые маски (что ловит raycast)
// ============================================================================

/// Mask: occlusion raycast vision cone — только environment
pub const COLLISION_MASK_OBSTACLES: u32 = COLLISION_LAYER_ENVIRONMENT;

/// Mask: identity raycast (Actors + Environment)
///
/// Первый hit должен быть самой целью, иначе LOS blocked.
pub const COLLISION_MASK_RAYCAST_LOS: u32 = COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT;

/// Marker: цель для guards (аналог тега "Player")
///
/// Guard находит первую такую entity лениво и кэширует её в AgentContext.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Intruder;

/// Форма коллайдера препятствия (axis-aligned, rotation Transform игнорируется)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ObstacleShape {
    /// AABB с половинными размерами
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

/// Коллайдер для headless raycast (ObstacleField собирает их каждый tick)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ObstacleCollider {
    pub shape: ObstacleShape,
    /// Битовая маска слоёв (COLLISION_LAYER_*)
    pub layers: u32,
}

impl ObstacleCollider {
    /// Стена/ящик на environment слое
    pub fn wall(half_extents: Vec3) -> Self {
        Self {
            shape: ObstacleShape::Box { half_extents },
            layers: COLLISION_LAYER_ENVIRONMENT,
        }
    }

    /// Тело актора (capsule аппроксимируем сферой)
    pub fn actor(radius: f32) -> Self {
        Self {
            shape: ObstacleShape::Sphere { radius },
            layers: COLLISION_LAYER_ACTORS,
        }
    }
}
