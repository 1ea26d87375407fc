//! Idle rotation — часовой на посту поворачивается шагами.
//!
//! Две фазы:
//! 1. ReturningToOrigin — если guard не на spawn точке, сначала идём туда
//! 2. Rotating — yaw плавно тянется к `yaw + idle_rotate_angle` в течение
//!    `idle_rotate_interval`, затем snap и новый цикл (бесконечно)
//!
//! Фаза — обычное поле, прогрессирует на `delta` каждый tick. Exit состояния = `cancel()`.

use bevy::prelude::*;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::ai::collaborators::{has_arrived, NavigationAgent};
use crate::ai::context::AgentContext;
use crate::shared::{lerp_angle, wrap_angle};

/// Как выбирается следующий heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum IdleRotationMode {
    /// `yaw + idle_rotate_angle` (детерминированный шаг)
    #[default]
    Stepwise,
    /// Случайный heading в [0°, 360°) из DeterministicRng
    RandomHeading,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum IdlePhase {
    /// Идём обратно на spawn точку, вращение ждёт arrival
    ReturningToOrigin,
    /// Поворот к target_yaw, elapsed — время текущего цикла
    Rotating { target_yaw: f32, elapsed: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct IdleRotation {
    phase: Option<IdlePhase>,
}

impl IdleRotation {
    pub fn phase(&self) -> Option<IdlePhase> {
        self.phase
    }

    /// Enter: либо возврат на spawn, либо сразу вращение
    pub fn begin(
        &mut self,
        context: &AgentContext,
        navigation: &mut dyn NavigationAgent,
        rng: &mut dyn RngCore,
    ) {
        if context.is_at_origin() {
            self.start_rotating(context, navigation, rng);
        } else {
            navigation.resume();
            navigation.set_destination(context.origin().position);
            self.phase = Some(IdlePhase::ReturningToOrigin);
        }
    }

    /// Один tick. Пишет yaw в `context.pose`.
    pub fn update(
        &mut self,
        context: &mut AgentContext,
        navigation: &mut dyn NavigationAgent,
        rng: &mut dyn RngCore,
        delta: f32,
    ) {
        match self.phase {
            None => {}

            Some(IdlePhase::ReturningToOrigin) => {
                let arrived = has_arrived(
                    navigation,
                    context.pose.position,
                    context.config.arrive_tolerance,
                );
                if arrived {
                    self.start_rotating(context, navigation, rng);
                }
            }

            Some(IdlePhase::Rotating { target_yaw, elapsed }) => {
                let config = &context.config;
                let elapsed = elapsed + delta;

                if elapsed >= config.idle_rotate_interval {
                    // Цикл закончен: snap к цели и сразу следующий шаг
                    context.pose.yaw = wrap_angle(target_yaw);
                    self.phase = Some(IdlePhase::Rotating {
                        target_yaw: next_heading(context, rng),
                        elapsed: 0.0,
                    });
                } else {
                    let t = delta * config.rotation_speed;
                    context.pose.yaw = lerp_angle(context.pose.yaw, target_yaw, t);
                    self.phase = Some(IdlePhase::Rotating { target_yaw, elapsed });
                }
            }
        }
    }

    /// Exit: никакой "осиротевшей" фазы после смены состояния
    pub fn cancel(&mut self) {
        self.phase = None;
    }

    fn start_rotating(
        &mut self,
        context: &AgentContext,
        navigation: &mut dyn NavigationAgent,
        rng: &mut dyn RngCore,
    ) {
        navigation.stop();
        self.phase = Some(IdlePhase::Rotating {
            target_yaw: next_heading(context, rng),
            elapsed: 0.0,
        });
    }
}

fn next_heading(context: &AgentContext, rng: &mut dyn RngCore) -> f32 {
    match context.config.idle_rotation_mode {
        IdleRotationMode::Stepwise => {
            wrap_angle(context.pose.yaw + context.config.idle_rotate_angle.to_radians())
        }
        IdleRotationMode::RandomHeading => wrap_angle(rng.gen_range(0.0..TAU)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::context::Pose;
    use crate::ai::test_support::MockNavigator;
    use crate::config::GuardConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::FRAC_PI_2;

    const DELTA: f32 = 0.1;

    fn context_at(position: Vec3, config: GuardConfig) -> AgentContext {
        let mut context = AgentContext::new(Pose::default(), Vec::new(), config);
        context.pose.position = position;
        context
    }

    #[test]
    fn test_starts_rotating_at_origin() {
        let context = context_at(Vec3::ZERO, GuardConfig::default());
        let mut nav = MockNavigator::at(Vec3::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rotation = IdleRotation::default();

        rotation.begin(&context, &mut nav, &mut rng);

        assert!(nav.is_stopped());
        let Some(IdlePhase::Rotating { target_yaw, elapsed }) = rotation.phase() else {
            panic!("ожидали Rotating, получили {:?}", rotation.phase());
        };
        assert!((target_yaw - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(elapsed, 0.0);
    }

    #[test]
    fn test_walks_back_before_rotating() {
        let start = Vec3::new(3.0, 0.0, 0.0);
        let mut context = context_at(start, GuardConfig::default());
        let mut nav = MockNavigator::at(start);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rotation = IdleRotation::default();

        rotation.begin(&context, &mut nav, &mut rng);

        assert_eq!(rotation.phase(), Some(IdlePhase::ReturningToOrigin));
        assert_eq!(nav.destination(), Some(Vec3::ZERO));
        assert!(!nav.is_stopped());

        // Ещё не дошли — никакого вращения
        rotation.update(&mut context, &mut nav, &mut rng, DELTA);
        assert_eq!(rotation.phase(), Some(IdlePhase::ReturningToOrigin));
        assert_eq!(context.pose.yaw, 0.0);

        // Дошли
        context.pose.position = Vec3::new(0.02, 0.0, 0.0);
        rotation.update(&mut context, &mut nav, &mut rng, DELTA);
        assert!(matches!(rotation.phase(), Some(IdlePhase::Rotating { .. })));
        assert!(nav.is_stopped());
    }

    #[test]
    fn test_stepwise_cycle_snaps_to_target() {
        let config = GuardConfig {
            idle_rotate_interval: 0.95,
            ..GuardConfig::default()
        };
        let mut context = context_at(Vec3::ZERO, config);
        let mut nav = MockNavigator::at(Vec3::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rotation = IdleRotation::default();
        rotation.begin(&context, &mut nav, &mut rng);

        // Первый tick: yaw сдвигается к 90°, но не доходит
        rotation.update(&mut context, &mut nav, &mut rng, DELTA);
        assert!(context.pose.yaw > 0.0 && context.pose.yaw < FRAC_PI_2);

        // Дотикиваем интервал: snap ровно на 90°
        for _ in 0..9 {
            rotation.update(&mut context, &mut nav, &mut rng, DELTA);
        }
        assert!(
            (context.pose.yaw - FRAC_PI_2).abs() < 1e-5,
            "yaw = {}",
            context.pose.yaw.to_degrees()
        );

        // Следующий цикл целится в 180°
        let Some(IdlePhase::Rotating { target_yaw, .. }) = rotation.phase() else {
            panic!("вращение должно продолжаться");
        };
        assert!((target_yaw.abs() - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_random_heading_is_seeded() {
        let config = GuardConfig {
            idle_rotation_mode: IdleRotationMode::RandomHeading,
            ..GuardConfig::default()
        };
        let context = context_at(Vec3::ZERO, config);

        let pick = |seed: u64| {
            let mut nav = MockNavigator::at(Vec3::ZERO);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut rotation = IdleRotation::default();
            rotation.begin(&context, &mut nav, &mut rng);
            match rotation.phase() {
                Some(IdlePhase::Rotating { target_yaw, .. }) => target_yaw,
                other => panic!("unexpected phase {:?}", other),
            }
        };

        assert_eq!(pick(9), pick(9));
    }

    #[test]
    fn test_cancel_stops_rotation() {
        let mut context = context_at(Vec3::ZERO, GuardConfig::default());
        let mut nav = MockNavigator::at(Vec3::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut rotation = IdleRotation::default();
        rotation.begin(&context, &mut nav, &mut rng);

        rotation.cancel();
        rotation.update(&mut context, &mut nav, &mut rng, DELTA);

        assert_eq!(rotation.phase(), None);
        assert_eq!(context.pose.yaw, 0.0);
    }
}
