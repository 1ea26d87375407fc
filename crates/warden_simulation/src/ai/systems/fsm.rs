//! Guard FSM systems: tick state machine, внешние команды возврата на пост.

use bevy::prelude::*;

use crate::ai::components::Guard;
use crate::ai::context::Pose;
use crate::ai::events::{GuardStateChanged, ReturnToPost};
use crate::ai::machine::TickContext;
use crate::ai::systems::perception::{ObstacleField, TaggedTargets};
use crate::components::{Intruder, NavAgent};
use crate::logger;
use crate::DeterministicRng;

/// Система: один tick BehaviorStateMachine для каждого guard
///
/// Pose читается из Transform (после advance_navigators), yaw пишется обратно.
/// Позицию двигает только NavAgent.
pub fn guard_behavior_tick(
    mut guards: Query<(Entity, &mut Guard, &mut NavAgent, &mut Transform), Without<Intruder>>,
    intruders: Query<(Entity, &Transform), (With<Intruder>, Without<Guard>)>,
    field: Res<ObstacleField>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut state_events: EventWriter<GuardStateChanged>,
) {
    let delta = time.delta_secs();
    let targets = TaggedTargets::collect(
        intruders
            .iter()
            .map(|(entity, transform)| (entity, transform.translation)),
    );

    for (entity, mut guard, mut nav, mut transform) in guards.iter_mut() {
        let guard = &mut *guard;
        guard.context.sync_pose(Pose::from_transform(&transform));

        let mut tick = TickContext {
            navigation: &mut *nav,
            raycaster: &*field,
            targets: &targets,
            rng: &mut rng.rng,
            observer: Some(entity),
            delta,
        };
        let transition = guard.machine.tick(&mut guard.context, &mut tick);

        let rotation = guard.context.pose.rotation();
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }

        if let Some(transition) = transition {
            state_events.write(GuardStateChanged {
                guard: entity,
                from: transition.from,
                to: transition.to,
            });
        }
    }
}

/// Система: ReturnToPost → `request_return(delay)`
pub fn handle_return_requests(mut requests: EventReader<ReturnToPost>, mut guards: Query<&mut Guard>) {
    for request in requests.read() {
        let Ok(mut guard) = guards.get_mut(request.guard) else {
            logger::log_warning(&format!(
                "⚠️ ReturnToPost: entity {:?} is not a guard, ignored",
                request.guard
            ));
            continue;
        };

        guard.machine.request_return(request.delay);
        logger::log(&format!(
            "🏠 Guard {:?}: return to post in {:.2}s",
            request.guard, request.delay
        ));
    }
}
