//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: the spatial grid index, simulation
//! timing and configuration, and the animation asset stores. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `animationstore` – clip-set definitions reused across entities
//! - `graphstore` – shared animation graphs and the condition registry
//! - `gridindex` – tile-coordinate to occupying-entity lookup
//! - `simconfig` – tile size, tick interval, and belt speed from config.ini
//! - `worldtime` – simulation time, delta, and the fixed-tick accumulator
pub mod animationstore;
pub mod graphstore;
pub mod gridindex;
pub mod simconfig;
pub mod worldtime;
