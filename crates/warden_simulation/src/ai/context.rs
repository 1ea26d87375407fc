//! AgentContext — общая запись агента, которую читает/пишет активное состояние.
//!
//! Один контекст на guard, никакого sharing между агентами. Pose синхронизируется
//! с внешним Transform каждый tick (Transform может "прыгнуть" после warp/respawn).

use bevy::prelude::*;

use crate::ai::components::ResumableState;
use crate::ai::perception::VisionCone;
use crate::ai::waypoints::PatrolRoute;
use crate::config::GuardConfig;
use crate::shared::{forward_from_yaw, yaw_from_rotation};

/// Позиция + yaw (радианы, 0 = +Z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            yaw: yaw_from_rotation(transform.rotation),
        }
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AgentContext {
    /// Текущая поза
    pub pose: Pose,
    /// Поза при spawn (не меняется после создания)
    origin: Pose,
    pub route: PatrolRoute,
    /// Что делали перед последним входом в Alert (None = ещё не было)
    pub last_non_alert: Option<ResumableState>,
    /// Закэшированная цель
    pub target: Option<Entity>,
    pub config: GuardConfig,
}

impl AgentContext {
    pub fn new(spawn: Pose, waypoints: Vec<Vec3>, config: GuardConfig) -> Self {
        Self {
            pose: spawn,
            origin: spawn,
            route: PatrolRoute::new(waypoints),
            last_non_alert: None,
            target: None,
            config,
        }
    }

    pub fn origin(&self) -> Pose {
        self.origin
    }

    /// Считываем позу из внешнего Transform
    pub fn sync_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn vision_cone(&self) -> VisionCone {
        VisionCone::from_degrees(
            self.config.vision_radius,
            self.config.vision_angle_degrees,
            self.config.obstacle_mask,
        )
        .with_identity_check(self.config.confirm_target_identity)
    }

    /// На spawn точке (в пределах origin_epsilon)?
    pub fn is_at_origin(&self) -> bool {
        let epsilon = self.config.origin_epsilon;
        self.pose.position.distance_squared(self.origin.position) <= epsilon * epsilon
    }
}
