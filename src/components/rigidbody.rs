//! Kinematic body component.
//!
//! Stores the velocity consumed by the movement system and quantized by the
//! direction resolver. Intentionally minimal: the simulation has no forces,
//! friction, or collision response.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Kinematic body storing velocity in world units per second.
///
/// Updated by game logic, consumed by
/// [`movement`](crate::systems::movement::movement) to integrate
/// [`MapPosition`](super::mapposition::MapPosition) and by
/// [`update_direction`](crate::systems::direction::update_direction) to derive
/// the entity's facing.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(velocity: Vec2) -> Self {
        Self { velocity }
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.x != 0.0 || self.velocity.y != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_at_rest() {
        let rb = RigidBody::new();
        assert!(!rb.is_moving());
    }

    #[test]
    fn test_is_moving_on_either_axis() {
        assert!(RigidBody::with_velocity(Vec2::new(0.0, -3.0)).is_moving());
        assert!(RigidBody::with_velocity(Vec2::new(0.5, 0.0)).is_moving());
    }
}
