//! High-level world setup and the operations exposed to collaborators.
//!
//! This module owns the lifecycle of a simulation world: resource insertion,
//! the fixed-order simulation schedule, belt placement with corner
//! inference, item spawning, and the fixed-interval tick driver. Rendering
//! and asset IO live outside; everything here is headless.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info, warn};

use crate::components::animation::{AnimationGraphRef, AnimationState};
use crate::components::conveyor::{Conveyor, ConveyorItem, Lane};
use crate::components::direction::{Direction, Facing};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::resources::animationstore::{AnimationClipDef, AnimationSetDef, AnimationStore};
use crate::resources::graphstore::{
    AnimationGraphDef, AnimationGraphStore, ConditionRegistry, TransitionDef,
};
use crate::resources::gridindex::GridIndex;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::{SimulationClock, WorldTime};
use crate::systems::animation::{animation, animation_graph, set_sprite_animation};
use crate::systems::conveyor::{conveyor_step, conveyor_transfer, item_world_position};
use crate::systems::direction::update_direction;
use crate::systems::movement::movement;
use crate::systems::time::update_world_time;

/// Clip set shared by every belt tile: one fixed-row clip per facing, rows
/// matching the [`Facing`] discriminants on a single "belt" sheet.
fn belt_animation_def(tile_size: f32) -> AnimationSetDef {
    let facings = [
        Facing::UpLeft,
        Facing::Left,
        Facing::DownLeft,
        Facing::Down,
        Facing::DownRight,
        Facing::Right,
        Facing::UpRight,
        Facing::Up,
    ];
    AnimationSetDef {
        frame_width: tile_size,
        frame_height: tile_size,
        clips: facings
            .iter()
            .map(|facing| AnimationClipDef {
                name: facing.clip_name().to_string(),
                tex_key: "belt".to_string(),
                frame_count: 4,
                direction_count: 1,
                frame_time: 0.15,
                looped: true,
                row: Some(facing.row()),
            })
            .collect(),
    }
}

/// Insert the resources every simulation world needs.
pub fn init_world(world: &mut World, config: SimConfig) {
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(SimulationClock::new(config.tick_interval));
    world.insert_resource(GridIndex::new(config.tile_size));
    world.insert_resource(ConditionRegistry::default());
    let mut animations = AnimationStore::default();
    animations.insert("belt", belt_animation_def(config.tile_size));
    world.insert_resource(animations);
    world.insert_resource(AnimationGraphStore::default());
    world.insert_resource(config);
}

/// Build the fixed-order simulation schedule.
///
/// Direction resolution feeds the animation graph, playback follows, then
/// the conveyor step raises transfer markers that the transfer pass resolves
/// in the same tick. Strictly sequential by construction.
pub fn build_simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            movement,
            update_direction,
            animation_graph,
            animation,
            conveyor_step,
            conveyor_transfer,
        )
            .chain(),
    );
    schedule
}

/// Accumulate render-frame time and run the simulation schedule once per
/// elapsed fixed interval. Rendering cadence never changes simulation
/// behavior: a long frame runs several ticks, a short one runs none.
pub fn advance_simulation(world: &mut World, schedule: &mut Schedule, dt: f32) {
    let interval = {
        let mut clock = world.resource_mut::<SimulationClock>();
        clock.accumulator += dt;
        clock.interval
    };
    while world.resource::<SimulationClock>().accumulator >= interval {
        update_world_time(world, interval);
        schedule.run(world);
        let mut clock = world.resource_mut::<SimulationClock>();
        clock.accumulator -= interval;
        clock.tick_count += 1;
    }
}

/// Place a belt at the tile containing `pos`, facing `facing`.
///
/// Registers the tile in the [`GridIndex`] and runs the one-hop corner
/// inference on the forward neighbor: a perpendicular belt there is
/// rewritten to the matching diagonal composite and its animation switched;
/// a belt already facing the same way is a no-op continuation. Only that
/// single neighbor is ever touched.
pub fn spawn_belt(world: &mut World, pos: Vec2, facing: Facing) -> Entity {
    let (tile, center, tile_size) = {
        let grid = world.resource::<GridIndex>();
        let tile = grid.tile_of(pos.x, pos.y);
        (tile, grid.tile_center(tile), grid.tile_size())
    };

    let entity = world
        .spawn((
            Conveyor::new(facing),
            MapPosition::new(center.x, center.y),
            Sprite::new("belt", tile_size, tile_size),
            AnimationState::default(),
        ))
        .id();
    if let Some(set) = world.resource::<AnimationStore>().build_set("belt") {
        if let Ok(mut entry) = world.get_entity_mut(entity) {
            entry.insert(set);
        }
        set_sprite_animation(world, entity, facing.clip_name());
    }
    world.resource_mut::<GridIndex>().insert(tile, entity);
    debug!("belt {entity:?} placed at ({}, {}) facing {facing:?}", tile.x, tile.y);

    // Corner inference on the single forward neighbor.
    let forward = tile + facing.forward_offset();
    let neighbor = world.resource::<GridIndex>().get(forward);
    if let Some(neighbor) = neighbor
        && let Some(neighbor_conveyor) = world.get::<Conveyor>(neighbor)
    {
        let neighbor_facing = neighbor_conveyor.facing;
        if neighbor_facing == facing {
            // Continuation of an existing run.
        } else if let Some(composite) = Facing::compose(facing, neighbor_facing) {
            if let Some(mut neighbor_mut) = world.get_mut::<Conveyor>(neighbor) {
                neighbor_mut.facing = composite;
                neighbor_mut.is_corner = true;
            }
            set_sprite_animation(world, neighbor, composite.clip_name());
            debug!(
                "belt {neighbor:?} rewritten to corner {composite:?} by placement of {entity:?}"
            );
        }
    }

    entity
}

/// Remove a belt: unregister its tile and despawn every item riding it.
pub fn despawn_belt(world: &mut World, belt: Entity) {
    let Some(conveyor) = world.get::<Conveyor>(belt).cloned() else {
        warn!("despawn_belt called on {belt:?} which has no Conveyor");
        return;
    };
    if let Some(pos) = world.get::<MapPosition>(belt).map(|p| p.pos) {
        let tile = {
            let grid = world.resource::<GridIndex>();
            grid.tile_of(pos.x, pos.y)
        };
        world.resource_mut::<GridIndex>().remove(tile);
    }
    for lane in &conveyor.lanes {
        for &item in lane.iter() {
            if let Ok(entry) = world.get_entity_mut(item) {
                entry.despawn();
            }
        }
    }
    if let Ok(entry) = world.get_entity_mut(belt) {
        entry.despawn();
    }
}

/// Spawn an item on a belt's lane at progress 0.
///
/// Returns `None` when the belt is dead or the lane is at capacity; both are
/// logged diagnostics, not errors.
pub fn spawn_conveyor_item(world: &mut World, belt: Entity, lane: Lane) -> Option<Entity> {
    let tile_size = world.resource::<GridIndex>().tile_size();
    let Some(conveyor) = world.get::<Conveyor>(belt) else {
        warn!("cannot spawn item: {belt:?} has no Conveyor");
        return None;
    };
    if !conveyor.can_accept(lane) {
        warn!("cannot spawn item: {belt:?} lane {lane:?} is at capacity");
        return None;
    }
    let facing = conveyor.facing;
    let belt_pos = world.get::<MapPosition>(belt).map(|p| p.pos)?;

    let pos = item_world_position(belt_pos, facing, lane, 0.0, tile_size);
    let entity = world
        .spawn((
            ConveyorItem {
                conveyor: belt,
                lane,
                progress: 0.0,
            },
            MapPosition::new(pos.x, pos.y),
            Sprite::new("item", tile_size * 0.25, tile_size * 0.25),
        ))
        .id();
    if let Some(mut conveyor_mut) = world.get_mut::<Conveyor>(belt) {
        conveyor_mut.lane_mut(lane).push(entity);
    }
    debug!("item {entity:?} spawned on belt {belt:?} lane {lane:?}");
    Some(entity)
}

/// Switch an entity to the named animation clip. Unknown names are logged
/// and leave the entity unchanged.
pub fn set_animation(world: &mut World, entity: Entity, clip_name: &str) {
    set_sprite_animation(world, entity, clip_name);
}

/// Quantize a velocity into a facing; `None` leaves the caller's stored
/// direction untouched.
pub fn resolve_direction(velocity: Vec2) -> Option<Facing> {
    Facing::from_velocity(velocity)
}

/// Seed a small demo layout: a belt run with a corner, a few items, and an
/// animated walker driven by a locomotion graph. Used by the headless demo
/// binary and handy as a smoke-test fixture.
pub fn setup_demo(world: &mut World) {
    let tile = world.resource::<GridIndex>().tile_size();

    // A run of three belts heading east, then one heading south placed so
    // its forward neighbor forms a corner with the run.
    let first = spawn_belt(world, Vec2::new(0.5 * tile, 2.5 * tile), Facing::Right);
    spawn_belt(world, Vec2::new(1.5 * tile, 2.5 * tile), Facing::Right);
    spawn_belt(world, Vec2::new(2.5 * tile, 2.5 * tile), Facing::Right);
    spawn_belt(world, Vec2::new(2.5 * tile, 1.5 * tile), Facing::Down);

    spawn_conveyor_item(world, first, Lane::Left);
    spawn_conveyor_item(world, first, Lane::Right);

    spawn_demo_walker(world, tile);

    info!(
        "demo world ready: {} grid tiles occupied",
        world.resource::<GridIndex>().len()
    );
}

/// Spawn the demo's walking archetype: a moving body whose clips come from
/// the [`AnimationStore`] and whose clip switches run through a locomotion
/// graph resolved against the condition registry.
fn spawn_demo_walker(world: &mut World, tile: f32) {
    world.resource_mut::<AnimationStore>().insert(
        "walker",
        AnimationSetDef {
            frame_width: tile,
            frame_height: tile,
            clips: vec![
                AnimationClipDef {
                    name: "idle".to_string(),
                    tex_key: "walker".to_string(),
                    frame_count: 2,
                    direction_count: 8,
                    frame_time: 0.4,
                    looped: true,
                    row: None,
                },
                AnimationClipDef {
                    name: "walk".to_string(),
                    tex_key: "walker".to_string(),
                    frame_count: 4,
                    direction_count: 8,
                    frame_time: 0.15,
                    looped: true,
                    row: None,
                },
            ],
        },
    );

    let graph_def = AnimationGraphDef {
        transitions: vec![
            TransitionDef {
                from: "*".to_string(),
                to: "walk".to_string(),
                condition: Some("is_moving".to_string()),
                priority: 1,
            },
            TransitionDef {
                from: "*".to_string(),
                to: "idle".to_string(),
                condition: Some("is_idle".to_string()),
                priority: 1,
            },
        ],
    };
    let graph = world.resource_scope::<AnimationGraphStore, _>(|world, mut store| {
        let registry = world.resource::<ConditionRegistry>();
        store.insert_def("walker", &graph_def, registry);
        store.get("walker")
    });

    let set = world.resource::<AnimationStore>().build_set("walker");
    if let (Some(graph), Some(set)) = (graph, set) {
        world.spawn((
            MapPosition::new(0.5 * tile, 0.5 * tile),
            RigidBody::with_velocity(Vec2::new(tile, 0.0)),
            Direction::default(),
            Sprite::new("walker", tile, tile),
            set,
            AnimationState::default(),
            AnimationGraphRef::new(graph),
        ));
    }
}
