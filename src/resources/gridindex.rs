//! Tile-coordinate spatial index.
//!
//! Maps each occupied tile to the entity placed there. Belt placement
//! registers tiles here and the conveyor step uses it to discover the
//! forward neighbor when an item reaches the end of its tile.
//!
//! Keys are 64-bit packs of the two tile coordinates, so lookup is a single
//! hash probe. There is no collision resolution: the caller guarantees
//! non-overlapping placement, and an insert over an occupied tile logs a
//! warning and replaces the previous entry.

use bevy_ecs::prelude::{Entity, Resource};
use glam::IVec2;
use log::warn;
use rustc_hash::FxHashMap;

/// Tile-coordinate to occupying-entity lookup.
#[derive(Resource, Debug)]
pub struct GridIndex {
    tile_size: f32,
    cells: FxHashMap<u64, Entity>,
}

fn grid_key(tile: IVec2) -> u64 {
    ((tile.x as u32 as u64) << 32) | (tile.y as u32 as u64)
}

impl GridIndex {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            cells: FxHashMap::default(),
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Floor-divide a world coordinate into a tile coordinate.
    pub fn world_to_tile(&self, pos: f32) -> i32 {
        (pos / self.tile_size).floor() as i32
    }

    /// Both axes at once.
    pub fn tile_of(&self, x: f32, y: f32) -> IVec2 {
        IVec2::new(self.world_to_tile(x), self.world_to_tile(y))
    }

    /// World-space centre of a tile.
    pub fn tile_center(&self, tile: IVec2) -> glam::Vec2 {
        glam::Vec2::new(
            (tile.x as f32 + 0.5) * self.tile_size,
            (tile.y as f32 + 0.5) * self.tile_size,
        )
    }

    pub fn insert(&mut self, tile: IVec2, entity: Entity) {
        if let Some(previous) = self.cells.insert(grid_key(tile), entity) {
            warn!(
                "grid tile ({}, {}) was already occupied by {:?}, replaced with {:?}",
                tile.x, tile.y, previous, entity
            );
        }
    }

    pub fn get(&self, tile: IVec2) -> Option<Entity> {
        self.cells.get(&grid_key(tile)).copied()
    }

    pub fn remove(&mut self, tile: IVec2) -> Option<Entity> {
        self.cells.remove(&grid_key(tile))
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        self.cells.contains_key(&grid_key(tile))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::World;

    #[test]
    fn test_world_to_tile_floor_division() {
        let grid = GridIndex::new(32.0);
        assert_eq!(grid.world_to_tile(0.0), 0);
        assert_eq!(grid.world_to_tile(31.9), 0);
        assert_eq!(grid.world_to_tile(32.0), 1);
        assert_eq!(grid.world_to_tile(-0.1), -1);
        assert_eq!(grid.world_to_tile(-32.0), -1);
        assert_eq!(grid.world_to_tile(-32.1), -2);
    }

    #[test]
    fn test_insert_get_remove() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut grid = GridIndex::new(32.0);
        let tile = IVec2::new(3, -7);

        assert!(!grid.contains(tile));
        grid.insert(tile, e);
        assert_eq!(grid.get(tile), Some(e));
        assert_eq!(grid.remove(tile), Some(e));
        assert_eq!(grid.get(tile), None);
    }

    #[test]
    fn test_negative_coordinates_do_not_collide() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut grid = GridIndex::new(32.0);
        grid.insert(IVec2::new(-1, 0), a);
        grid.insert(IVec2::new(0, -1), b);
        assert_eq!(grid.get(IVec2::new(-1, 0)), Some(a));
        assert_eq!(grid.get(IVec2::new(0, -1)), Some(b));
    }

    #[test]
    fn test_insert_replaces_on_occupied_tile() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut grid = GridIndex::new(32.0);
        let tile = IVec2::new(2, 2);
        grid.insert(tile, a);
        grid.insert(tile, b);
        assert_eq!(grid.get(tile), Some(b));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_tile_center() {
        let grid = GridIndex::new(32.0);
        let c = grid.tile_center(IVec2::new(1, 0));
        assert_eq!(c, glam::Vec2::new(48.0, 16.0));
    }
}
