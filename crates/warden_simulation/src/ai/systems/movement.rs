//! Navigation execution: NavAgent → Transform.

use bevy::prelude::*;

use crate::components::NavAgent;

/// Система: двигаем NavAgent на fixed delta, Transform следует за позицией.
///
/// Rotation меняется только при движении (лицом по ходу). Стоящего агента
/// поворачивает guard core (idle rotation, возврат yaw на посту).
pub fn advance_navigators(mut agents: Query<(&mut NavAgent, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut nav, mut transform) in agents.iter_mut() {
        if let Some(yaw) = nav.advance(delta) {
            transform.rotation = Quat::from_rotation_y(yaw);
        }

        if transform.translation != nav.position {
            transform.translation = nav.position;
        }
    }
}
