//! Guard AI systems (ECS слой поверх behavior core)

pub mod capture;
pub mod fsm;
pub mod movement;
pub mod perception;

// Re-export all systems
pub use capture::*;
pub use fsm::*;
pub use movement::*;
pub use perception::*;
