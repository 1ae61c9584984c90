//! Simulation systems.
//!
//! This module groups all ECS systems that advance the fixed-interval
//! simulation tick. The tick order is fixed and sequential:
//! direction resolution, then animation graph evaluation and playback, then
//! the conveyor step, then transfer resolution — each collection is mutated
//! by exactly one system per tick.
//!
//! Submodules overview
//! - [`animation`] – evaluate transition graphs and advance sprite playback
//! - [`conveyor`] – advance item progress and resolve inter-belt transfers
//! - [`direction`] – quantize velocities into 8-way facings
//! - [`movement`] – integrate positions from rigid body velocities and time
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod conveyor;
pub mod direction;
pub mod movement;
pub mod time;
