//! Guard AI events — входящие команды и исходящие уведомления ECS слоя.

use bevy::prelude::*;

use crate::ai::collaborators::CaptureReport;
use crate::ai::components::StateKind;

/// Guard сменил состояние (включая первый вход: `from = None`)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStateChanged {
    pub guard: Entity,
    pub from: Option<StateKind>,
    pub to: StateKind,
}

/// Контакт guard ↔ другой entity (аналог trigger enter)
///
/// Генерируется detect_contacts только при входе в контакт, не каждый tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactReported {
    pub guard: Entity,
    pub other: Entity,
}

/// Цель поймана — игровой flow решает что дальше (respawn, game over)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCaught {
    pub guard: Entity,
    pub target: Entity,
}

impl From<CaptureReport> for TargetCaught {
    fn from(report: CaptureReport) -> Self {
        Self {
            guard: report.guard,
            target: report.target,
        }
    }
}

/// Команда: guard вернуться на пост через `delay` секунд
///
/// Повторная команда заменяет предыдущую. Вход в Alert отменяет ожидание.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ReturnToPost {
    pub guard: Entity,
    pub delay: f32,
}

/// История поимок (для headless прогонов и тестов)
#[derive(Resource, Debug, Default, Clone)]
pub struct CaptureLog {
    pub captures: Vec<CaptureReport>,
}

impl CaptureLog {
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    pub fn last(&self) -> Option<&CaptureReport> {
        self.captures.last()
    }
}
