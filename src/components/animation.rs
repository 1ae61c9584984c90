//! Animation playback components.
//!
//! An entity that animates carries three components: an [`AnimationSet`]
//! (its named clips, bounded to [`MAX_ANIMATION_CLIPS`]), an
//! [`AnimationState`] (which clip, which frame, elapsed accumulator), and
//! optionally an [`AnimationGraphRef`] pointing at a shared transition graph.
//!
//! Clips are either direction-driven (`direction_count == 8`, the sprite row
//! comes from the entity's [`Direction`](crate::components::direction::Direction))
//! or fixed-row (`row: Some(_)`).
//!
//! # Related
//!
//! - [`crate::systems::animation::animation`] – frame advance
//! - [`crate::systems::animation::animation_graph`] – transition evaluation
//! - [`crate::resources::graphstore::AnimationGraph`] – the shared graph

use std::sync::Arc;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;

use crate::resources::graphstore::AnimationGraph;

/// Maximum number of clips a single entity archetype can hold.
pub const MAX_ANIMATION_CLIPS: usize = 8;

/// Immutable description of one animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Name the graph and [`set_animation`](crate::game::set_animation) refer to.
    pub name: String,
    /// Texture key for the renderer's texture store.
    pub tex_key: Arc<str>,
    pub frame_count: usize,
    /// 1 for fixed-row clips, 8 for direction-driven clips.
    pub direction_count: usize,
    /// Seconds per frame.
    pub frame_time: f32,
    pub looped: bool,
    /// Explicit sprite-sheet row; `None` when the row is direction-driven.
    pub row: Option<usize>,
}

/// Named clips shared by one entity archetype. All clips use the same frame
/// dimensions, so the sprite source rect is `(frame * width, row * height)`.
#[derive(Component, Debug, Clone)]
pub struct AnimationSet {
    pub clips: ArrayVec<AnimationClip, MAX_ANIMATION_CLIPS>,
    pub frame_width: f32,
    pub frame_height: f32,
}

impl AnimationSet {
    pub fn new(frame_width: f32, frame_height: f32) -> Self {
        Self {
            clips: ArrayVec::new(),
            frame_width,
            frame_height,
        }
    }

    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name == name)
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }
}

/// Current playback state: an index into the entity's [`AnimationSet`],
/// the visible frame, and the elapsed-time accumulator.
#[derive(Component, Debug, Clone, Copy)]
pub struct AnimationState {
    pub current_clip: usize,
    pub current_frame: usize,
    pub elapsed: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            current_clip: 0,
            current_frame: 0,
            elapsed: 0.0,
        }
    }
}

/// Shared, immutable transition graph. Many entities of one archetype point
/// at the same graph.
#[derive(Component, Debug, Clone)]
pub struct AnimationGraphRef {
    pub graph: Arc<AnimationGraph>,
}

impl AnimationGraphRef {
    pub fn new(graph: Arc<AnimationGraph>) -> Self {
        Self { graph }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str) -> AnimationClip {
        AnimationClip {
            name: name.to_string(),
            tex_key: Arc::from("sheet"),
            frame_count: 4,
            direction_count: 1,
            frame_time: 0.1,
            looped: true,
            row: Some(0),
        }
    }

    #[test]
    fn test_clip_index_by_name() {
        let mut set = AnimationSet::new(32.0, 32.0);
        set.clips.push(clip("idle"));
        set.clips.push(clip("walk"));
        assert_eq!(set.clip_index("walk"), Some(1));
        assert_eq!(set.clip_index("attack"), None);
    }

    #[test]
    fn test_set_is_bounded() {
        let mut set = AnimationSet::new(32.0, 32.0);
        for i in 0..MAX_ANIMATION_CLIPS {
            set.clips.push(clip(&format!("clip{i}")));
        }
        assert!(set.clips.try_push(clip("overflow")).is_err());
    }
}
