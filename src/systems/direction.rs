//! Direction resolver system.
//!
//! Quantizes each entity's velocity into one of eight discrete facings. A
//! zero velocity leaves the stored [`Direction`] untouched, so an entity that
//! stops keeps facing the way it was last moving.
//!
//! # Related
//!
//! - [`crate::components::direction::Facing::from_velocity`] – the pure quantizer
//! - [`crate::systems::animation`] – consumes the facing for sprite rows

use bevy_ecs::prelude::*;

use crate::components::direction::{Direction, Facing};
use crate::components::rigidbody::RigidBody;

/// Update each entity's facing from its current velocity.
pub fn update_direction(mut query: Query<(&RigidBody, &mut Direction)>) {
    for (rigidbody, mut direction) in query.iter_mut() {
        if let Some(facing) = Facing::from_velocity(rigidbody.velocity) {
            // Avoid tripping change detection when the facing is unchanged.
            if direction.facing != facing {
                direction.facing = facing;
            }
        }
    }
}
