//! Conveyor belt and item components.
//!
//! A belt is one tile of the transport network: an 8-way [`Facing`], two
//! bounded lane queues, and a corner flag. Items are their own entities; a
//! belt's lane queues only hold [`Entity`] ids, with transfers entering at
//! index 0 as the newest item on the tile. Item entities carry a [`ConveyorItem`]
//! with a weak back-reference to the belt — liveness is checked every tick,
//! never assumed.
//!
//! # Related
//!
//! - [`crate::systems::conveyor::conveyor_step`] – advances item progress
//! - [`crate::systems::conveyor::conveyor_transfer`] – resolves marked items
//! - [`crate::resources::gridindex::GridIndex`] – tile lookup for adjacency

use arrayvec::ArrayVec;
use bevy_ecs::prelude::{Component, Entity};

use crate::components::direction::Facing;

pub const CONVEYOR_LANES: usize = 2;
pub const CONVEYOR_SPEED: f32 = 0.5;
/// Minimum progress distance between two items on the same lane.
pub const ITEM_SPACING: f32 = 0.5;
pub const MAX_CONVEYOR_ITEMS: usize = 4;

/// One of the two parallel tracks on a belt tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Left = 0,
    Right = 1,
}

impl Lane {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Bounded item queue for one lane; arriving transfers enter at index 0.
pub type LaneQueue = ArrayVec<Entity, MAX_CONVEYOR_ITEMS>;

/// A single conveyor tile.
#[derive(Component, Debug, Clone)]
pub struct Conveyor {
    pub facing: Facing,
    pub lanes: [LaneQueue; CONVEYOR_LANES],
    pub is_corner: bool,
}

impl Conveyor {
    pub fn new(facing: Facing) -> Self {
        Self {
            facing,
            lanes: [LaneQueue::new(), LaneQueue::new()],
            is_corner: false,
        }
    }

    pub fn lane(&self, lane: Lane) -> &LaneQueue {
        &self.lanes[lane.index()]
    }

    pub fn lane_mut(&mut self, lane: Lane) -> &mut LaneQueue {
        &mut self.lanes[lane.index()]
    }

    pub fn can_accept(&self, lane: Lane) -> bool {
        !self.lane(lane).is_full()
    }

    /// Remove an item from a lane by identity, preserving queue order.
    /// Returns false if the item was not present.
    pub fn remove_item(&mut self, lane: Lane, item: Entity) -> bool {
        let queue = self.lane_mut(lane);
        if let Some(index) = queue.iter().position(|&e| e == item) {
            queue.remove(index);
            true
        } else {
            false
        }
    }
}

/// Item riding a belt. `progress` is the normalized [0,1] position along the
/// current tile; `conveyor` is a lookup-only reference.
#[derive(Component, Debug, Clone, Copy)]
pub struct ConveyorItem {
    pub conveyor: Entity,
    pub lane: Lane,
    pub progress: f32,
}

/// Marks an item ready to move to an adjacent belt. Present only while
/// `progress == 1.0`; cleared the same tick by the transfer pass, or left off
/// for a retry when the destination lane is full.
#[derive(Component, Debug, Clone, Copy)]
pub struct ConveyorTransfer {
    pub next_conveyor: Entity,
    pub target_lane: Lane,
}

/// Destination lane for an item crossing from one belt to the next.
///
/// Straight-through transfers preserve the lane. Turns remap by the sign of
/// the 2D cross product of the two exit directions in screen space (Y down):
/// clockwise (for example RIGHT into DOWN) lands on [`Lane::Left`],
/// counter-clockwise on [`Lane::Right`]. Antiparallel belts preserve the lane.
pub fn target_lane(from: Facing, to: Facing, lane: Lane) -> Lane {
    let a = from.exit_dir().unit();
    let b = to.exit_dir().unit();
    let cross = a.x * b.y - a.y * b.x;
    if cross > 0.0 {
        Lane::Left
    } else if cross < 0.0 {
        Lane::Right
    } else {
        lane
    }
}
