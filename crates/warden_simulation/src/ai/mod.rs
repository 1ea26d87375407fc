//! Guard AI — perception + behavior state machine
//!
//! Два слоя:
//! - behavior core (perception, waypoints, idle_rotation, machine) — чистая логика,
//!   внешний мир только через collaborator traits
//! - ECS слой (systems) — Bevy системы в FixedUpdate, реализуют collaborators

use bevy::prelude::*;

pub mod collaborators;
pub mod components;
pub mod context;
pub mod events;
pub mod idle_rotation;
pub mod machine;
pub mod perception;
pub mod systems;
pub mod waypoints;

#[cfg(test)]
pub(crate) mod test_support;


// Re-export основных типов
pub use collaborators::{has_arrived, CaptureNotifier, CaptureReport, NavigationAgent, TargetLocator};
pub use components::{Guard, GuardState, ResumableState, StateKind, StateTransition};
pub use context::{AgentContext, Pose};
pub use events::{CaptureLog, ContactReported, GuardStateChanged, ReturnToPost, TargetCaught};
pub use idle_rotation::{IdlePhase, IdleRotation, IdleRotationMode};
pub use machine::{BehaviorStateMachine, TickContext};
pub use perception::{ObstacleRaycaster, OpenSky, RayHit, RayQuery, VisionCone};
pub use systems::{ContactTracking, ObstacleField, TaggedTargets};
pub use waypoints::PatrolRoute;

/// Guard AI Plugin
///
/// Регистрирует events, resources и системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. handle_return_requests — внешние команды ReturnToPost
/// 2. advance_navigators — движение NavAgent → Transform
/// 3. rebuild_obstacle_field — снимок коллайдеров (уже сдвинутых) для raycast
/// 4. guard_behavior_tick — perception + FSM каждого guard
/// 5. detect_contacts — proximity trigger guard ↔ actor
/// 6. relay_captures — подтверждённые контакты → TargetCaught
pub struct GuardAIPlugin;

impl Plugin for GuardAIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GuardStateChanged>()
            .add_event::<ContactReported>()
            .add_event::<TargetCaught>()
            .add_event::<ReturnToPost>()
            .init_resource::<ObstacleField>()
            .init_resource::<ContactTracking>()
            .init_resource::<CaptureLog>()
            .add_systems(
                FixedUpdate,
                (
                    systems::handle_return_requests,
                    systems::advance_navigators,
                    systems::rebuild_obstacle_field,
                    systems::guard_behavior_tick,
                    systems::detect_contacts,
                    systems::relay_captures,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
