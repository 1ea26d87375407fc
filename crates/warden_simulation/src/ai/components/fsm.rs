//! FSM компоненты guard: состояния, память "что делал до тревоги", сам Guard.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::context::{AgentContext, Pose};
use crate::ai::idle_rotation::IdleRotation;
use crate::ai::machine::BehaviorStateMachine;
use crate::config::GuardConfig;

/// Тег состояния (без runtime данных) — для конфига, событий, логов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum StateKind {
    /// Стоим на посту и осматриваемся
    #[default]
    Idle,
    /// Обход waypoints
    Patrol,
    /// Видим цель — преследуем
    Alert,
    /// Возвращаемся на spawn точку
    Returning,
}

/// Состояние к которому можно вернуться после Alert.
///
/// Alert здесь не выражается — инвариант "last_non_alert != Alert" держит тип.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ResumableState {
    Idle,
    Patrol,
    Returning,
}

impl ResumableState {
    pub fn from_kind(kind: StateKind) -> Option<Self> {
        match kind {
            StateKind::Idle => Some(Self::Idle),
            StateKind::Patrol => Some(Self::Patrol),
            StateKind::Returning => Some(Self::Returning),
            StateKind::Alert => None,
        }
    }

    pub fn kind(self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::Patrol => StateKind::Patrol,
            Self::Returning => StateKind::Returning,
        }
    }
}

/// Активное состояние guard + его runtime данные (таймеры, фазы).
///
/// Таймеры живут внутри варианта: смена состояния = данные старого варианта исчезают.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum GuardState {
    Idle(IdleRotation),

    Patrol {
        /// Сколько ещё стоим на waypoint (None = не ждём)
        wait_remaining: Option<f32>,
    },

    Alert {
        /// Grace period после потери цели (None = цель видна)
        lost_remaining: Option<f32>,
        /// Последняя позиция где видели цель
        last_known_position: Option<Vec3>,
    },

    Returning,
}

impl GuardState {
    /// Свежий вариант без данных (перед Enter)
    pub fn fresh(kind: StateKind) -> Self {
        match kind {
            StateKind::Idle => Self::Idle(IdleRotation::default()),
            StateKind::Patrol => Self::Patrol { wait_remaining: None },
            StateKind::Alert => Self::Alert {
                lost_remaining: None,
                last_known_position: None,
            },
            StateKind::Returning => Self::Returning,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            Self::Idle(_) => StateKind::Idle,
            Self::Patrol { .. } => StateKind::Patrol,
            Self::Alert { .. } => StateKind::Alert,
            Self::Returning => StateKind::Returning,
        }
    }
}

/// Результат смены состояния (для событий и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    /// None — первый вход в стартовое состояние
    pub from: Option<StateKind>,
    pub to: StateKind,
}

/// Guard AI component: контекст агента + state machine
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Guard {
    pub context: AgentContext,
    pub machine: BehaviorStateMachine,
}

impl Guard {
    pub fn new(spawn: Pose, waypoints: Vec<Vec3>, config: GuardConfig) -> Self {
        let machine = BehaviorStateMachine::new(config.starting_state);
        Self {
            context: AgentContext::new(spawn, waypoints, config),
            machine,
        }
    }

    pub fn state(&self) -> StateKind {
        self.machine.state().kind()
    }
}
