//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - movement: навигация (NavAgent — headless NavigationAgent)
//! - world: collision layers, препятствия, Intruder marker
//!
//! Guard component живёт в `ai::components` рядом с FSM.

pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use movement::*;
pub use world::*;
