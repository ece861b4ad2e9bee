//! Stagehand Core - shared primitives for the Stagehand NPC engine
//!
//! This crate provides the small foundation the engine crates build on:
//! - Mathematical primitives (re-exported from glam)
//! - Yaw/facing helpers for characters that turn on the ground plane
//! - Elapsed-time primitives (cooldown timer)

pub mod math;
pub mod time;

pub use glam::{Quat, Vec2, Vec3};
pub use time::Cooldown;
