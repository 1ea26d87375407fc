//! BehaviorStateMachine — Idle / Patrol / Alert / Returning.
//!
//! Один tick:
//! 1. sense — один vision check на tick (до update, никаких повторных чтений)
//! 2. pending return countdown (`request_return`)
//! 3. update активного состояния → возможно next state
//! 4. change_state: запомнить last_non_alert → exit(old) → enter(new)
//!
//! Все ожидания (patrol wait, grace period, idle rotation) — поля варианта,
//! двигаются на `delta`. Смена варианта = старые таймеры исчезают.

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::collaborators::{has_arrived, CaptureNotifier, CaptureReport, NavigationAgent, TargetLocator};
use crate::ai::components::{GuardState, ResumableState, StateKind, StateTransition};
use crate::ai::context::AgentContext;
use crate::ai::perception::ObstacleRaycaster;
use crate::logger::{log_with_level, LogLevel};

/// Collaborators одного tick (всё внешнее — по ссылке)
pub struct TickContext<'a> {
    pub navigation: &'a mut dyn NavigationAgent,
    pub raycaster: &'a dyn ObstacleRaycaster,
    pub targets: &'a dyn TargetLocator,
    pub rng: &'a mut dyn RngCore,
    /// Entity самого guard (исключается из raycast)
    pub observer: Option<Entity>,
    pub delta: f32,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct BehaviorStateMachine {
    state: GuardState,
    /// Отложенный переход в Returning (секунды до срабатывания)
    pending_return: Option<f32>,
    /// Enter стартового состояния уже выполнен
    started: bool,
}

impl BehaviorStateMachine {
    pub fn new(starting_state: StateKind) -> Self {
        Self {
            state: GuardState::fresh(starting_state),
            pending_return: None,
            started: false,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn pending_return(&self) -> Option<f32> {
        self.pending_return
    }

    /// Запланировать переход в Returning через `delay` секунд (заменяет предыдущий запрос)
    pub fn request_return(&mut self, delay: f32) {
        self.pending_return = Some(delay.max(0.0));
    }

    /// Один шаг симуляции. Первый вызов только входит в стартовое состояние.
    pub fn tick(&mut self, context: &mut AgentContext, tick: &mut TickContext) -> Option<StateTransition> {
        if !self.started {
            self.started = true;
            let kind = self.state.kind();
            self.enter(context, tick, None);
            log_transition(tick.observer, None, kind);
            return Some(StateTransition { from: None, to: kind });
        }

        let sighting = sense(context, tick);

        if let Some(remaining) = self.pending_return.as_mut() {
            *remaining -= tick.delta;
            if *remaining <= 0.0 {
                self.pending_return = None;
                return Some(self.change_state(StateKind::Returning, context, tick));
            }
        }

        let next = self.update(context, tick, sighting)?;
        Some(self.switch_state(next, context, tick, sighting))
    }

    /// Exit(old) → Enter(new) в пределах одного вызова
    pub fn change_state(
        &mut self,
        next: StateKind,
        context: &mut AgentContext,
        tick: &mut TickContext,
    ) -> StateTransition {
        self.switch_state(next, context, tick, None)
    }

    /// `sighting` — позиция цели из этого tick (Alert стартует погоню сразу к ней)
    fn switch_state(
        &mut self,
        next: StateKind,
        context: &mut AgentContext,
        tick: &mut TickContext,
        sighting: Option<Vec3>,
    ) -> StateTransition {
        let from = self.state.kind();

        if let Some(resumable) = ResumableState::from_kind(from) {
            context.last_non_alert = Some(resumable);
        }

        self.exit();
        self.state = GuardState::fresh(next);
        self.enter(context, tick, sighting);

        log_transition(tick.observer, Some(from), next);
        StateTransition { from: Some(from), to: next }
    }

    /// Контакт guard ↔ other (trigger). Tagged цель → notifier. Возвращает true если поймали.
    pub fn report_contact(
        &self,
        context: &AgentContext,
        guard: Entity,
        other: Entity,
        targets: &dyn TargetLocator,
        notifier: &mut dyn CaptureNotifier,
    ) -> bool {
        let is_target = context.target == Some(other) || targets.is_tagged_target(other);
        if !is_target {
            return false;
        }

        notifier.target_caught(CaptureReport { guard, target: other });
        true
    }

    fn enter(&mut self, context: &mut AgentContext, tick: &mut TickContext, sighting: Option<Vec3>) {
        match &mut self.state {
            GuardState::Idle(rotation) => {
                rotation.begin(context, tick.navigation, tick.rng);
            }

            GuardState::Patrol { .. } => match context.route.current() {
                Some(waypoint) => {
                    tick.navigation.set_destination(waypoint);
                    tick.navigation.resume();
                }
                // Пустой маршрут — стоим на месте
                None => tick.navigation.stop(),
            },

            GuardState::Alert {
                last_known_position, ..
            } => {
                self.pending_return = None;
                if let Some(position) = sighting {
                    *last_known_position = Some(position);
                    tick.navigation.set_destination(position);
                }
                tick.navigation.resume();
            }

            GuardState::Returning => {
                tick.navigation.set_destination(context.origin().position);
                tick.navigation.resume();
            }
        }
    }

    fn exit(&mut self) {
        match &mut self.state {
            GuardState::Idle(rotation) => rotation.cancel(),
            GuardState::Patrol { wait_remaining } => *wait_remaining = None,
            GuardState::Alert { .. } | GuardState::Returning => {}
        }
    }

    fn update(
        &mut self,
        context: &mut AgentContext,
        tick: &mut TickContext,
        sighting: Option<Vec3>,
    ) -> Option<StateKind> {
        match &mut self.state {
            GuardState::Idle(rotation) => {
                if sighting.is_some() {
                    return Some(StateKind::Alert);
                }
                rotation.update(context, tick.navigation, tick.rng, tick.delta);
                None
            }

            GuardState::Patrol { wait_remaining } => {
                if sighting.is_some() {
                    return Some(StateKind::Alert);
                }

                if let Some(remaining) = wait_remaining.as_mut() {
                    *remaining -= tick.delta;
                    if *remaining <= 0.0 {
                        *wait_remaining = None;
                        tick.navigation.resume();
                    }
                    return None;
                }

                if context.route.is_empty() {
                    return None;
                }

                let arrived = has_arrived(
                    tick.navigation,
                    context.pose.position,
                    context.config.arrive_tolerance,
                );
                if arrived {
                    if let Some(next) = context.route.advance() {
                        tick.navigation.set_destination(next);
                    }
                    tick.navigation.stop();
                    *wait_remaining = Some(context.config.patrol_wait_time);
                }
                None
            }

            GuardState::Alert {
                lost_remaining,
                last_known_position,
            } => {
                if let Some(position) = sighting {
                    *lost_remaining = None;
                    *last_known_position = Some(position);
                    tick.navigation.resume();
                    tick.navigation.set_destination(position);
                    return None;
                }

                // Потеряли цель: идём к last_known_position пока тикает grace period
                context.target = None;
                if lost_remaining.is_none() {
                    if let Some(position) = *last_known_position {
                        tick.navigation.set_destination(position);
                    }
                }
                let remaining = lost_remaining.get_or_insert(context.config.lost_chase_return_delay);
                *remaining -= tick.delta;
                if *remaining > 0.0 {
                    return None;
                }

                Some(recovery_state(context))
            }

            GuardState::Returning => {
                let arrived = has_arrived(
                    tick.navigation,
                    context.pose.position,
                    context.config.arrive_tolerance,
                );
                if !arrived {
                    return None;
                }

                tick.navigation.stop();
                context.pose.yaw = context.origin().yaw;
                context.route.snap_to_closest(context.pose.position);
                Some(StateKind::Idle)
            }
        }
    }
}

/// Видна ли цель в этом tick. Цель ищется лениво и кэшируется в контексте.
fn sense(context: &mut AgentContext, tick: &TickContext) -> Option<Vec3> {
    if context.target.is_none() {
        context.target = tick.targets.find_tagged_target();
    }
    let target = context.target?;

    let Some(position) = tick.targets.target_position(target) else {
        // Цель исчезла (despawn) — сбрасываем кэш
        context.target = None;
        return None;
    };

    let visible = context.vision_cone().is_target_visible(
        context.pose.position,
        context.pose.forward(),
        position,
        target,
        tick.observer,
        tick.raycaster,
    );
    visible.then_some(position)
}

/// Куда возвращаемся после Alert
fn recovery_state(context: &mut AgentContext) -> StateKind {
    match context.last_non_alert {
        Some(ResumableState::Patrol) => {
            context.route.snap_to_closest(context.pose.position);
            StateKind::Patrol
        }
        Some(ResumableState::Returning) => StateKind::Returning,
        Some(ResumableState::Idle) | None => StateKind::Idle,
    }
}

fn log_transition(guard: Option<Entity>, from: Option<StateKind>, to: StateKind) {
    let message = match from {
        Some(from) => format!("🔀 Guard {:?}: {:?} → {:?}", guard, from, to),
        None => format!("🟢 Guard {:?}: start in {:?}", guard, to),
    };
    log_with_level(LogLevel::Debug, &message);
}
