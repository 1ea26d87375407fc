//! Shared — cross-cutting утилиты
//!
//! - geometry: yaw/direction конверсии, planar distance

pub mod geometry;

pub use geometry::*;
