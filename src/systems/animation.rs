//! Animation systems.
//!
//! - [`animation_graph`] evaluates prioritized conditional transitions
//!   between named clips and switches the active clip when one fires.
//! - [`animation`] advances frame playback based on elapsed time and writes
//!   the visible sprite source rect.
//!
//! # Animation Flow
//!
//! 1. Clip sets and graphs are defined in
//!    [`AnimationStore`](crate::resources::animationstore::AnimationStore) and
//!    [`AnimationGraphStore`](crate::resources::graphstore::AnimationGraphStore)
//! 2. Entities carry [`AnimationSet`], [`AnimationState`], and an
//!    [`AnimationGraphRef`] pointing at a shared graph
//! 3. `animation_graph` picks the winning transition each tick and calls
//!    [`set_sprite_animation`] when the target clip differs
//! 4. `animation` advances frames independently of transitions and updates
//!    the [`Sprite`] offset from the current frame and row
//!
//! `animation_graph` is an exclusive system: registered condition predicates
//! receive `&World` and may inspect any component of the entity.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::warn;

use crate::components::animation::{AnimationClip, AnimationGraphRef, AnimationSet, AnimationState};
use crate::components::direction::{Direction, Facing};
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

/// Sprite-sheet row for a clip: direction-driven clips use the entity's
/// facing, fixed-row clips their stored row.
fn clip_row(clip: &AnimationClip, facing: Option<Facing>) -> usize {
    if clip.direction_count > 1 {
        facing.unwrap_or(Facing::Down).row()
    } else {
        clip.row.unwrap_or(0)
    }
}

/// Switch an entity to the named clip: new clip index, frame 0, elapsed 0,
/// and an immediately recomputed sprite row.
///
/// Unknown clip names and entities missing animation components are logged
/// diagnostics; the entity retains its prior state.
pub fn set_sprite_animation(world: &mut World, entity: Entity, name: &str) {
    let facing = world.get::<Direction>(entity).map(|d| d.facing);
    let Some(set) = world.get::<AnimationSet>(entity) else {
        warn!("entity {entity:?} has no AnimationSet, cannot set '{name}'");
        return;
    };
    let Some(index) = set.clip_index(name) else {
        warn!("animation '{name}' not found in entity {entity:?}'s AnimationSet");
        return;
    };
    let clip = &set.clips[index];
    let row = clip_row(clip, facing);
    let tex_key = clip.tex_key.to_string();
    let frame_height = set.frame_height;

    if let Some(mut state) = world.get_mut::<AnimationState>(entity) {
        state.current_clip = index;
        state.current_frame = 0;
        state.elapsed = 0.0;
    } else {
        warn!("entity {entity:?} has no AnimationState, cannot set '{name}'");
        return;
    }
    if let Some(mut sprite) = world.get_mut::<Sprite>(entity) {
        sprite.tex_key = tex_key;
        sprite.offset = Vec2::new(0.0, row as f32 * frame_height);
    }
}

/// Evaluate each entity's animation graph and switch clips where a
/// transition fires.
///
/// A transition is eligible when `from` equals the current clip name or is
/// `"*"`. Transitions without a condition fire when the current clip is
/// non-looping and on its last frame; others invoke their registered
/// predicate. Among firing transitions the highest priority wins, and equal
/// priorities resolve to the first-declared transition.
pub fn animation_graph(world: &mut World) {
    let mut query = world.query::<(Entity, &AnimationSet, &AnimationState, &AnimationGraphRef)>();
    let mut switches: Vec<(Entity, String)> = Vec::new();

    for (entity, set, state, graph_ref) in query.iter(world) {
        let Some(current_clip) = set.clip(state.current_clip) else {
            warn!(
                "entity {entity:?} animation state points at missing clip {}",
                state.current_clip
            );
            continue;
        };
        let current = current_clip.name.as_str();

        let mut best_to: Option<&str> = None;
        let mut best_priority = i32::MIN;
        for transition in &graph_ref.graph.transitions {
            if transition.from != "*" && transition.from != current {
                continue;
            }
            let fires = match transition.condition {
                None => {
                    !current_clip.looped
                        && state.current_frame == current_clip.frame_count.saturating_sub(1)
                }
                Some(condition) => condition(world, entity),
            };
            // Strict comparison keeps the first-declared transition on ties.
            if fires && transition.priority > best_priority {
                best_to = Some(transition.to.as_str());
                best_priority = transition.priority;
            }
        }

        if let Some(to) = best_to
            && to != current
        {
            switches.push((entity, to.to_string()));
        }
    }

    for (entity, to) in switches {
        set_sprite_animation(world, entity, &to);
    }
}

/// Advance animation playback and update the sprite frame.
///
/// Contract
/// - Reads [`WorldTime`] for the tick delta.
/// - Mutates [`AnimationState`] and the [`Sprite`] source-rect offset.
/// - Looping clips wrap to frame 0; non-looping clips clamp on the last
///   frame and stay there until a transition switches away.
pub fn animation(
    mut query: Query<(
        &AnimationSet,
        &mut AnimationState,
        &mut Sprite,
        Option<&Direction>,
    )>,
    time: Res<WorldTime>,
) {
    for (set, mut state, mut sprite, direction) in query.iter_mut() {
        let Some(clip) = set.clip(state.current_clip) else {
            continue;
        };
        if clip.frame_time <= 0.0 || clip.frame_count == 0 {
            continue;
        }

        state.elapsed += time.delta;
        while state.elapsed >= clip.frame_time {
            state.elapsed -= clip.frame_time;
            state.current_frame += 1;
            if state.current_frame >= clip.frame_count {
                state.current_frame = if clip.looped { 0 } else { clip.frame_count - 1 };
            }
        }

        let row = clip_row(clip, direction.map(|d| d.facing));
        sprite.offset = Vec2::new(
            state.current_frame as f32 * set.frame_width,
            row as f32 * set.frame_height,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn clip(name: &str, frame_count: usize, looped: bool, direction_count: usize) -> AnimationClip {
        AnimationClip {
            name: name.to_string(),
            tex_key: Arc::from("sheet"),
            frame_count,
            direction_count,
            frame_time: 0.1,
            looped,
            row: if direction_count > 1 { None } else { Some(1) },
        }
    }

    #[test]
    fn test_clip_row_direction_driven() {
        let c = clip("walk", 4, true, 8);
        assert_eq!(clip_row(&c, Some(Facing::Right)), 5);
        assert_eq!(clip_row(&c, None), Facing::Down.row());
    }

    #[test]
    fn test_clip_row_fixed() {
        let c = clip("glow", 4, true, 1);
        assert_eq!(clip_row(&c, Some(Facing::Right)), 1);
    }

    fn spawn_animated(world: &mut World, clips: Vec<AnimationClip>) -> Entity {
        let mut set = AnimationSet::new(32.0, 32.0);
        for c in clips {
            set.clips.push(c);
        }
        world
            .spawn((set, AnimationState::default(), Sprite::new("sheet", 32.0, 32.0)))
            .id()
    }

    fn tick_animation(world: &mut World, dt: f32) {
        crate::systems::time::update_world_time(world, dt);
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        schedule.run(world);
    }

    #[test]
    fn test_looping_clip_wraps() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = spawn_animated(&mut world, vec![clip("walk", 3, true, 1)]);

        for _ in 0..4 {
            tick_animation(&mut world, 0.1);
        }
        let state = world.get::<AnimationState>(entity).unwrap();
        assert_eq!(state.current_frame, 1); // 4 advances over 3 frames
    }

    #[test]
    fn test_non_looping_clip_clamps_on_last_frame() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = spawn_animated(&mut world, vec![clip("attack", 4, false, 1)]);

        for _ in 0..10 {
            tick_animation(&mut world, 0.1);
        }
        let state = world.get::<AnimationState>(entity).unwrap();
        assert_eq!(state.current_frame, 3);
    }

    #[test]
    fn test_large_delta_advances_multiple_frames() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = spawn_animated(&mut world, vec![clip("walk", 8, true, 1)]);

        tick_animation(&mut world, 0.35);
        let state = world.get::<AnimationState>(entity).unwrap();
        assert_eq!(state.current_frame, 3);
        assert!(state.elapsed < 0.1);
    }

    #[test]
    fn test_sprite_offset_tracks_frame_and_row() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = spawn_animated(&mut world, vec![clip("walk", 4, true, 8)]);
        world
            .entity_mut(entity)
            .insert(Direction::new(Facing::Right));

        tick_animation(&mut world, 0.1);
        let sprite = world.get::<Sprite>(entity).unwrap();
        assert_eq!(sprite.offset, Vec2::new(32.0, 5.0 * 32.0));
    }

    #[test]
    fn test_set_sprite_animation_unknown_clip_is_noop() {
        let mut world = World::new();
        let entity = spawn_animated(&mut world, vec![clip("idle", 2, true, 1)]);
        set_sprite_animation(&mut world, entity, "missing");
        let state = world.get::<AnimationState>(entity).unwrap();
        assert_eq!(state.current_clip, 0);
    }

    #[test]
    fn test_set_sprite_animation_switches_and_resets() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = spawn_animated(
            &mut world,
            vec![clip("idle", 2, true, 1), clip("walk", 4, true, 1)],
        );
        tick_animation(&mut world, 0.1);

        set_sprite_animation(&mut world, entity, "walk");
        let state = world.get::<AnimationState>(entity).unwrap();
        assert_eq!(state.current_clip, 1);
        assert_eq!(state.current_frame, 0);
        assert_eq!(state.elapsed, 0.0);
        // Row recomputed immediately.
        let sprite = world.get::<Sprite>(entity).unwrap();
        assert_eq!(sprite.offset, Vec2::new(0.0, 32.0));
    }
}
