//! Conveyor simulation systems.
//!
//! Two exclusive passes run on every fixed simulation tick, in order:
//!
//! 1. [`conveyor_step`] advances item progress along belt tiles, enforcing
//!    the minimum following distance within each lane, and marks items that
//!    reached the end of their tile with a [`ConveyorTransfer`] when a belt
//!    occupies the forward neighbor tile.
//! 2. [`conveyor_transfer`] resolves marked items with a two-phase handshake:
//!    remove from the source lane queue by identity, insert at the head of
//!    the destination queue. A full destination lane abandons the transfer
//!    and the item retries next tick from its stalled position.
//!
//! Items tolerate dead belt references: an orphaned item is skipped, never
//! deleted, so stale external references stay valid.
//!
//! # Related
//!
//! - [`crate::components::conveyor`] – belts, items, markers, lane table
//! - [`crate::resources::gridindex::GridIndex`] – forward-neighbor discovery

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::conveyor::{
    Conveyor, ConveyorItem, ConveyorTransfer, ITEM_SPACING, Lane, target_lane,
};
use crate::components::direction::Facing;
use crate::components::mapposition::MapPosition;
use crate::resources::gridindex::GridIndex;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

/// World-space position of an item from its belt position, lane, and
/// progress. Lane tracks sit a quarter tile either side of the belt axis;
/// corners use their exit axis.
pub fn item_world_position(
    belt_pos: Vec2,
    facing: Facing,
    lane: Lane,
    progress: f32,
    tile_size: f32,
) -> Vec2 {
    let lane_offset = match lane {
        Lane::Left => -tile_size * 0.25,
        Lane::Right => tile_size * 0.25,
    };
    let along = progress * tile_size - tile_size * 0.5;
    match facing.exit_dir() {
        Facing::Up => Vec2::new(belt_pos.x + lane_offset, belt_pos.y - along),
        Facing::Down => Vec2::new(belt_pos.x - lane_offset, belt_pos.y + along),
        Facing::Right => Vec2::new(belt_pos.x + along, belt_pos.y - lane_offset),
        Facing::Left => Vec2::new(belt_pos.x - along, belt_pos.y + lane_offset),
        // exit_dir only returns cardinals
        _ => belt_pos,
    }
}

/// Advance every unmarked item along its belt.
///
/// Per item: resolve the owning belt (skip orphans), clamp the advance to the
/// first item ahead in the lane minus [`ITEM_SPACING`], and on reaching
/// progress 1.0 look up the forward neighbor tile. A belt there gets a
/// transfer marker with the lane mapped through the direction-pair table;
/// no belt means the item stalls at 1.0 indefinitely.
pub fn conveyor_step(world: &mut World) {
    let (speed, tile_size) = {
        let config = world.resource::<SimConfig>();
        (config.belt_speed, config.tile_size)
    };
    let dt = world.resource::<WorldTime>().delta;

    let mut query =
        world.query_filtered::<Entity, (With<ConveyorItem>, Without<ConveyorTransfer>)>();
    let items: Vec<Entity> = query.iter(world).collect();

    for entity in items {
        let Some(item) = world.get::<ConveyorItem>(entity).copied() else {
            continue;
        };
        let Some(conveyor) = world.get::<Conveyor>(item.conveyor) else {
            // Orphan tolerance: the belt died, the item stays put.
            debug!("item {entity:?} references dead belt {:?}, skipped", item.conveyor);
            continue;
        };
        let facing = conveyor.facing;

        // First item ahead in queue order bounds our advance.
        let mut max_allowed = 1.0f32;
        for &other in conveyor.lane(item.lane).iter() {
            if other == entity {
                continue;
            }
            let Some(other_item) = world.get::<ConveyorItem>(other) else {
                continue;
            };
            if other_item.progress > item.progress {
                let blocked = other_item.progress - ITEM_SPACING;
                if blocked < max_allowed {
                    max_allowed = blocked;
                }
                break;
            }
        }

        let belt_pos = world.get::<MapPosition>(item.conveyor).map(|p| p.pos);
        let new_progress = (item.progress + speed * dt).min(max_allowed).clamp(0.0, 1.0);

        let mut transfer = None;
        if new_progress >= 1.0 {
            let grid = world.resource::<GridIndex>();
            if let Some(belt_pos) = belt_pos {
                let forward = grid.tile_of(belt_pos.x, belt_pos.y) + facing.forward_offset();
                if let Some(next) = grid.get(forward)
                    && let Some(next_conveyor) = world.get::<Conveyor>(next)
                {
                    transfer = Some(ConveyorTransfer {
                        next_conveyor: next,
                        target_lane: target_lane(facing, next_conveyor.facing, item.lane),
                    });
                }
            }
        }

        if let Some(mut item_mut) = world.get_mut::<ConveyorItem>(entity) {
            item_mut.progress = new_progress;
        }
        if let Some(belt_pos) = belt_pos
            && let Some(mut map_pos) = world.get_mut::<MapPosition>(entity)
        {
            map_pos.pos = item_world_position(belt_pos, facing, item.lane, new_progress, tile_size);
        }
        if let Some(transfer) = transfer
            && let Ok(mut entry) = world.get_entity_mut(entity)
        {
            entry.insert(transfer);
        }
    }
}

/// Resolve pending transfers raised by [`conveyor_step`].
///
/// Two-phase: the item leaves its source lane queue by identity, then enters
/// the head of the destination lane. A full or dead destination clears the
/// marker and leaves the item stalled at progress 1.0 for a retry next tick —
/// recoverable, never an error or a lost item.
pub fn conveyor_transfer(world: &mut World) {
    let mut query = world.query::<(Entity, &ConveyorItem, &ConveyorTransfer)>();
    let marked: Vec<(Entity, ConveyorItem, ConveyorTransfer)> = query
        .iter(world)
        .map(|(entity, item, transfer)| (entity, *item, *transfer))
        .collect();

    for (entity, item, transfer) in marked {
        let accepted = world
            .get::<Conveyor>(transfer.next_conveyor)
            .map(|c| c.can_accept(transfer.target_lane))
            .unwrap_or(false);
        if !accepted {
            debug!(
                "transfer of {entity:?} to {:?} abandoned, retrying next tick",
                transfer.next_conveyor
            );
            if let Ok(mut entry) = world.get_entity_mut(entity) {
                entry.remove::<ConveyorTransfer>();
            }
            continue;
        }

        if let Some(mut source) = world.get_mut::<Conveyor>(item.conveyor) {
            source.remove_item(item.lane, entity);
        }
        if let Some(mut dest) = world.get_mut::<Conveyor>(transfer.next_conveyor) {
            dest.lane_mut(transfer.target_lane).insert(0, entity);
        }
        if let Some(mut item_mut) = world.get_mut::<ConveyorItem>(entity) {
            item_mut.conveyor = transfer.next_conveyor;
            item_mut.lane = transfer.target_lane;
            item_mut.progress = 0.0;
        }
        if let Ok(mut entry) = world.get_entity_mut(entity) {
            entry.remove::<ConveyorTransfer>();
        }
    }
}
