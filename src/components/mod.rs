//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulation world. Components define data such as position, facing,
//! belt state, and animation playback.
//!
//! Submodules overview:
//! - [`animation`] – clip sets, playback state, and shared graph references
//! - [`conveyor`] – belt tiles, items riding them, and transfer markers
//! - [`direction`] – 8-way quantized facing
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`sprite`] – 2D sprite rendering component written by the animation systems

pub mod animation;
pub mod conveyor;
pub mod direction;
pub mod mapposition;
pub mod rigidbody;
pub mod sprite;
