//! Animation clip-set registry.
//!
//! Stores reusable clip-set definitions keyed by archetype name. The asset
//! side ships plain serde records; [`AnimationStore::build_set`] turns a
//! definition into the bounded [`AnimationSet`] component attached to
//! entities. Definitions beyond the per-entity clip limit are truncated with
//! a logged diagnostic rather than rejected.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "frame_width": 32,
//!   "frame_height": 32,
//!   "clips": [
//!     { "name": "walk", "tex_key": "walker", "frame_count": 6,
//!       "direction_count": 8, "frame_time": 0.12, "looped": true },
//!     { "name": "attack", "tex_key": "walker", "frame_count": 4,
//!       "direction_count": 1, "frame_time": 0.1, "looped": false, "row": 3 }
//!   ]
//! }
//! ```

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::animation::{AnimationClip, AnimationSet, MAX_ANIMATION_CLIPS};

/// Serialized form of one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClipDef {
    pub name: String,
    pub tex_key: String,
    pub frame_count: usize,
    #[serde(default = "default_direction_count")]
    pub direction_count: usize,
    pub frame_time: f32,
    #[serde(default)]
    pub looped: bool,
    /// Explicit sprite-sheet row; omitted when the row is direction-driven.
    #[serde(default)]
    pub row: Option<usize>,
}

fn default_direction_count() -> usize {
    1
}

/// Serialized form of a whole clip set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSetDef {
    pub frame_width: f32,
    pub frame_height: f32,
    pub clips: Vec<AnimationClipDef>,
}

/// Central registry of clip-set definitions keyed by archetype name.
#[derive(Resource, Default)]
pub struct AnimationStore {
    pub sets: FxHashMap<String, AnimationSetDef>,
}

impl AnimationStore {
    pub fn insert(&mut self, key: impl Into<String>, def: AnimationSetDef) {
        self.sets.insert(key.into(), def);
    }

    /// Load a clip-set definition from a JSON file.
    pub fn load_from_file(&mut self, key: impl Into<String>, path: &str) -> Result<(), String> {
        let key = key.into();
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read animation file {path}: {e}"))?;
        let def: AnimationSetDef = serde_json::from_str(&data)
            .map_err(|e| format!("failed to parse animation file {path}: {e}"))?;
        info!(
            "loaded animation set '{}' ({} clips) from {}",
            key,
            def.clips.len(),
            path
        );
        self.sets.insert(key, def);
        Ok(())
    }

    /// Build the component form of a stored definition.
    pub fn build_set(&self, key: &str) -> Option<AnimationSet> {
        let def = self.sets.get(key)?;
        let mut set = AnimationSet::new(def.frame_width, def.frame_height);
        for clip in &def.clips {
            if set
                .clips
                .try_push(AnimationClip {
                    name: clip.name.clone(),
                    tex_key: Arc::from(clip.tex_key.as_str()),
                    frame_count: clip.frame_count,
                    direction_count: clip.direction_count,
                    frame_time: clip.frame_time,
                    looped: clip.looped,
                    row: clip.row,
                })
                .is_err()
            {
                warn!(
                    "animation set '{}': more than {} clips, '{}' and later dropped",
                    key, MAX_ANIMATION_CLIPS, clip.name
                );
                break;
            }
        }
        Some(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_def(name: &str) -> AnimationClipDef {
        AnimationClipDef {
            name: name.to_string(),
            tex_key: "sheet".to_string(),
            frame_count: 4,
            direction_count: 1,
            frame_time: 0.1,
            looped: true,
            row: Some(0),
        }
    }

    #[test]
    fn test_build_set_from_def() {
        let mut store = AnimationStore::default();
        store.insert(
            "walker",
            AnimationSetDef {
                frame_width: 32.0,
                frame_height: 48.0,
                clips: vec![clip_def("idle"), clip_def("walk")],
            },
        );
        let set = store.build_set("walker").unwrap();
        assert_eq!(set.clips.len(), 2);
        assert_eq!(set.frame_height, 48.0);
        assert_eq!(set.clip_index("walk"), Some(1));
    }

    #[test]
    fn test_build_set_unknown_key() {
        let store = AnimationStore::default();
        assert!(store.build_set("missing").is_none());
    }

    #[test]
    fn test_oversized_def_is_truncated() {
        let mut store = AnimationStore::default();
        let clips = (0..MAX_ANIMATION_CLIPS + 2)
            .map(|i| clip_def(&format!("clip{i}")))
            .collect();
        store.insert(
            "bloated",
            AnimationSetDef {
                frame_width: 16.0,
                frame_height: 16.0,
                clips,
            },
        );
        let set = store.build_set("bloated").unwrap();
        assert_eq!(set.clips.len(), MAX_ANIMATION_CLIPS);
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let path = std::env::temp_dir().join("beltworks_animset_load.json");
        let def = AnimationSetDef {
            frame_width: 16.0,
            frame_height: 16.0,
            clips: vec![clip_def("spin")],
        };
        std::fs::write(&path, serde_json::to_string(&def).unwrap()).unwrap();

        let mut store = AnimationStore::default();
        store
            .load_from_file("spinner", path.to_str().unwrap())
            .unwrap();
        let set = store.build_set("spinner").unwrap();
        assert_eq!(set.clips[0].name, "spin");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_file_missing_path_errors() {
        let mut store = AnimationStore::default();
        assert!(store.load_from_file("x", "/no/such/set.json").is_err());
    }

    #[test]
    fn test_clip_def_defaults() {
        let json = r#"{
            "frame_width": 32, "frame_height": 32,
            "clips": [
                { "name": "walk", "tex_key": "walker",
                  "frame_count": 6, "frame_time": 0.12 }
            ]
        }"#;
        let def: AnimationSetDef = serde_json::from_str(json).unwrap();
        let clip = &def.clips[0];
        assert_eq!(clip.direction_count, 1);
        assert!(!clip.looped);
        assert!(clip.row.is_none());
    }
}
