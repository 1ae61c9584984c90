//! Eight-way facing for entities and belts.
//!
//! [`Facing`] discriminants double as sprite-sheet row indices, so a
//! direction-driven animation clip can use the facing directly to select its
//! row. The four diagonal values are the corner-belt composites: a corner is
//! named entry-then-exit, so [`Facing::DownRight`] is a belt entered moving
//! down that exits moving right.
//!
//! # Related
//!
//! - [`crate::systems::direction::update_direction`] – velocity quantization system
//! - [`crate::components::conveyor::Conveyor`] – belts store a `Facing`

use bevy_ecs::prelude::Component;
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// One of eight discrete facings. Discriminants are sprite-sheet rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    UpLeft = 0,
    Left = 1,
    DownLeft = 2,
    Down = 3,
    DownRight = 4,
    Right = 5,
    UpRight = 6,
    Up = 7,
}

/// Quantization table indexed by `round(angle / 45°) mod 8`, angle in
/// `[0, 2π)` with screen-space Y pointing down. Index 0 is east.
const ANGLE_TO_FACING: [Facing; 8] = [
    Facing::Right,
    Facing::DownRight,
    Facing::Down,
    Facing::DownLeft,
    Facing::Left,
    Facing::UpLeft,
    Facing::Up,
    Facing::UpRight,
];

impl Facing {
    /// Quantize a velocity into a facing. Returns `None` for zero velocity,
    /// in which case the caller keeps its previous facing.
    pub fn from_velocity(velocity: Vec2) -> Option<Facing> {
        if velocity.x == 0.0 && velocity.y == 0.0 {
            return None;
        }
        let mut angle = velocity.y.atan2(velocity.x);
        if angle < 0.0 {
            angle += 2.0 * std::f32::consts::PI;
        }
        let index = (angle / std::f32::consts::FRAC_PI_4).round() as usize % 8;
        Some(ANGLE_TO_FACING[index])
    }

    /// Sprite-sheet row for this facing.
    pub fn row(self) -> usize {
        self as usize
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Facing::UpLeft | Facing::DownLeft | Facing::DownRight | Facing::UpRight
        )
    }

    /// Direction items travel when leaving a belt with this facing.
    ///
    /// Cardinals exit along themselves; corner composites exit along their
    /// horizontal component (a `DownRight` corner was entered moving down and
    /// exits moving right).
    pub fn exit_dir(self) -> Facing {
        match self {
            Facing::UpLeft | Facing::DownLeft => Facing::Left,
            Facing::DownRight | Facing::UpRight => Facing::Right,
            cardinal => cardinal,
        }
    }

    /// Unit tile step along the exit direction, screen-space Y down.
    pub fn forward_offset(self) -> IVec2 {
        match self.exit_dir() {
            Facing::Left => IVec2::new(-1, 0),
            Facing::Right => IVec2::new(1, 0),
            Facing::Up => IVec2::new(0, -1),
            Facing::Down => IVec2::new(0, 1),
            // exit_dir only returns cardinals
            _ => IVec2::ZERO,
        }
    }

    /// Unit direction vector of the exit, screen-space Y down.
    pub fn unit(self) -> Vec2 {
        let o = self.forward_offset();
        Vec2::new(o.x as f32, o.y as f32)
    }

    /// Compose a corner facing from a belt entered moving `entry` whose
    /// original (exit) facing was `exit`.
    ///
    /// Only vertical-entry corners are representable: the composite is named
    /// entry-then-exit and its exit is derived from the horizontal component,
    /// so `Down` meeting `Right` yields `DownRight`. Horizontal-entry turns
    /// return `None` and the neighbor is left untouched.
    pub fn compose(entry: Facing, exit: Facing) -> Option<Facing> {
        match (entry, exit) {
            (Facing::Down, Facing::Right) => Some(Facing::DownRight),
            (Facing::Down, Facing::Left) => Some(Facing::DownLeft),
            (Facing::Up, Facing::Right) => Some(Facing::UpRight),
            (Facing::Up, Facing::Left) => Some(Facing::UpLeft),
            _ => None,
        }
    }

    /// Animation clip name used for belt sprites of this facing.
    pub fn clip_name(self) -> &'static str {
        match self {
            Facing::UpLeft => "belt_up_left",
            Facing::Left => "belt_left",
            Facing::DownLeft => "belt_down_left",
            Facing::Down => "belt_down",
            Facing::DownRight => "belt_down_right",
            Facing::Right => "belt_right",
            Facing::UpRight => "belt_up_right",
            Facing::Up => "belt_up",
        }
    }
}

/// Persisted quantized facing of an entity. Unchanged while velocity is zero.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub facing: Facing,
}

impl Direction {
    pub fn new(facing: Facing) -> Self {
        Self { facing }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self {
            facing: Facing::Down,
        }
    }
}
