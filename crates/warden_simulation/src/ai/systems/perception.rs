//! Perception collaborators для ECS: raycast по ObstacleField, поиск intruder.
//!
//! ObstacleField пересобирается каждый tick из `ObstacleCollider` + Transform.
//! Raycast — `bevy::math::bounding` (AABB / sphere), без physics engine.

use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::ai::collaborators::TargetLocator;
use crate::ai::perception::{ObstacleRaycaster, RayHit, RayQuery};
use crate::components::{ObstacleCollider, ObstacleShape};

#[derive(Debug, Clone, Copy)]
enum Volume {
    Box(Aabb3d),
    Sphere(BoundingSphere),
}

#[derive(Debug, Clone, Copy)]
struct FieldCollider {
    entity: Entity,
    layers: u32,
    volume: Volume,
}

impl FieldCollider {
    fn intersect(&self, ray: &RayCast3d) -> Option<f32> {
        match &self.volume {
            Volume::Box(aabb) => ray.aabb_intersection_at(aabb),
            Volume::Sphere(sphere) => ray.sphere_intersection_at(sphere),
        }
    }
}

/// Снимок коллайдеров сцены на текущий tick
#[derive(Resource, Debug, Default, Clone)]
pub struct ObstacleField {
    colliders: Vec<FieldCollider>,
}

impl ObstacleField {
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn insert(&mut self, entity: Entity, center: Vec3, collider: &ObstacleCollider) {
        let volume = match collider.shape {
            ObstacleShape::Box { half_extents } => Volume::Box(Aabb3d::new(center, half_extents)),
            ObstacleShape::Sphere { radius } => Volume::Sphere(BoundingSphere::new(center, radius)),
        };
        self.colliders.push(FieldCollider {
            entity,
            layers: collider.layers,
            volume,
        });
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl ObstacleRaycaster for ObstacleField {
    /// Ближайший hit среди коллайдеров попавших в маску (exclude пропускается)
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        let ray = RayCast3d::from_ray(Ray3d::new(query.origin, query.direction), query.max_distance);

        self.colliders
            .iter()
            .filter(|collider| collider.layers & query.mask != 0)
            .filter(|collider| Some(collider.entity) != query.exclude)
            .filter_map(|collider| {
                let distance = collider.intersect(&ray)?;
                (distance <= query.max_distance).then_some(RayHit {
                    distance,
                    entity: Some(collider.entity),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Система: пересобрать ObstacleField из текущих Transform
pub fn rebuild_obstacle_field(
    mut field: ResMut<ObstacleField>,
    colliders: Query<(Entity, &Transform, &ObstacleCollider)>,
) {
    field.clear();
    for (entity, transform, collider) in colliders.iter() {
        field.insert(entity, transform.translation, collider);
    }
}

/// Intruders этого tick (TargetLocator для guard core)
///
/// Tagged target = intruder с наименьшим Entity (стабильно между прогонами).
#[derive(Debug, Default, Clone)]
pub struct TaggedTargets {
    targets: Vec<(Entity, Vec3)>,
}

impl TaggedTargets {
    pub fn collect(targets: impl IntoIterator<Item = (Entity, Vec3)>) -> Self {
        let mut targets: Vec<_> = targets.into_iter().collect();
        targets.sort_by_key(|(entity, _)| *entity);
        Self { targets }
    }
}

impl TargetLocator for TaggedTargets {
    fn find_tagged_target(&self) -> Option<Entity> {
        self.targets.first().map(|(entity, _)| *entity)
    }

    fn target_position(&self, target: Entity) -> Option<Vec3> {
        self.targets
            .iter()
            .find(|(entity, _)| *entity == target)
            .map(|(_, position)| *position)
    }

    fn is_tagged_target(&self, entity: Entity) -> bool {
        self.targets.iter().any(|(candidate, _)| *candidate == entity)
    }
}
