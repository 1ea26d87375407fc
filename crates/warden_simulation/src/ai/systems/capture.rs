//! Capture systems: контакт guard ↔ actor → TargetCaught.
//!
//! detect_contacts — proximity trigger (planar distance ≤ contact_radius),
//! событие только на входе в контакт. relay_captures — решение "поймали ли цель"
//! принимает guard core (`report_contact`).

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::ai::collaborators::CaptureReport;
use crate::ai::components::Guard;
use crate::ai::events::{CaptureLog, ContactReported, TargetCaught};
use crate::ai::systems::perception::TaggedTargets;
use crate::components::Intruder;
use crate::logger;
use crate::shared::planar_distance;

/// Пары (guard, other) которые были в контакте на прошлом tick
#[derive(Resource, Debug, Default)]
pub struct ContactTracking {
    active: BTreeSet<(Entity, Entity)>,
}

impl ContactTracking {
    pub fn is_in_contact(&self, guard: Entity, other: Entity) -> bool {
        self.active.contains(&(guard, other))
    }
}

/// Система: proximity trigger между guards и actors (intruders + другие guards)
pub fn detect_contacts(
    guards: Query<(Entity, &Guard, &Transform)>,
    actors: Query<(Entity, &Transform), Or<(With<Intruder>, With<Guard>)>>,
    mut tracking: ResMut<ContactTracking>,
    mut contacts: EventWriter<ContactReported>,
) {
    let mut current = BTreeSet::new();

    for (guard_entity, guard, guard_transform) in guards.iter() {
        let radius = guard.context.config.contact_radius;

        for (other, other_transform) in actors.iter() {
            if other == guard_entity {
                continue;
            }
            if planar_distance(guard_transform.translation, other_transform.translation) > radius {
                continue;
            }

            current.insert((guard_entity, other));
            if !tracking.is_in_contact(guard_entity, other) {
                contacts.write(ContactReported {
                    guard: guard_entity,
                    other,
                });
            }
        }
    }

    tracking.active = current;
}

/// Система: ContactReported → guard.report_contact → TargetCaught + CaptureLog
pub fn relay_captures(
    mut contacts: EventReader<ContactReported>,
    guards: Query<&Guard>,
    intruders: Query<(Entity, &Transform), With<Intruder>>,
    mut caught: EventWriter<TargetCaught>,
    mut capture_log: ResMut<CaptureLog>,
) {
    let targets = TaggedTargets::collect(
        intruders
            .iter()
            .map(|(entity, transform)| (entity, transform.translation)),
    );

    for contact in contacts.read() {
        let Ok(guard) = guards.get(contact.guard) else {
            continue;
        };

        let mut notifier = |report: CaptureReport| {
            logger::log_info(&format!(
                "🚨 Guard {:?} caught intruder {:?}",
                report.guard, report.target
            ));
            capture_log.captures.push(report);
            caught.write(TargetCaught::from(report));
        };

        guard
            .machine
            .report_contact(&guard.context, contact.guard, contact.other, &targets, &mut notifier);
    }
}
