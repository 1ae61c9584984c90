use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Integrate rigid body velocities into positions.
pub fn movement(mut query: Query<(&mut MapPosition, &RigidBody)>, time: Res<WorldTime>) {
    for (mut position, rigidbody) in query.iter_mut() {
        let delta = rigidbody.velocity * time.delta;
        position.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::time::update_world_time;
    use glam::Vec2;

    #[test]
    fn test_movement_integrates_velocity() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = world
            .spawn((
                MapPosition::new(0.0, 0.0),
                RigidBody::with_velocity(Vec2::new(10.0, -4.0)),
            ))
            .id();

        update_world_time(&mut world, 0.5);
        let mut schedule = Schedule::default();
        schedule.add_systems(movement);
        schedule.run(&mut world);

        let pos = world.get::<MapPosition>(entity).unwrap();
        assert_eq!(pos.pos, Vec2::new(5.0, -2.0));
    }
}
