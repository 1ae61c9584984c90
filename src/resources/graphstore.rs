//! Animation graph definitions and the condition registry.
//!
//! A graph is a flat, ordered list of prioritized transitions between named
//! clips. Graphs are data: the asset side ships `{from, to, condition,
//! priority}` records, and condition *names* are resolved here — once, at
//! load time — through a registered-handler map instead of raw function
//! pointers in the data files.
//!
//! A transition without a condition means "animation complete": it fires when
//! the current clip is non-looping and sitting on its last frame.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "transitions": [
//!     { "from": "*", "to": "walk", "condition": "is_moving", "priority": 1 },
//!     { "from": "walk", "to": "idle", "condition": "is_idle", "priority": 1 },
//!     { "from": "attack", "to": "idle", "priority": 0 }
//!   ]
//! }
//! ```
//!
//! # Related
//!
//! - [`crate::systems::animation::animation_graph`] – evaluates these graphs
//! - [`crate::components::animation::AnimationGraphRef`] – per-entity handle

use std::sync::Arc;

use bevy_ecs::prelude::{Entity, Resource, World};
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::rigidbody::RigidBody;

/// A predicate over the world and one entity, resolved from a condition name.
pub type ConditionFn = fn(&World, Entity) -> bool;

/// Name reserved for the implicit no-predicate transition condition.
pub const ANIMATION_COMPLETE: &str = "animation_complete";

fn is_moving(world: &World, entity: Entity) -> bool {
    world
        .get::<RigidBody>(entity)
        .map(|rb| rb.is_moving())
        .unwrap_or(false)
}

fn is_idle(world: &World, entity: Entity) -> bool {
    world
        .get::<RigidBody>(entity)
        .map(|rb| !rb.is_moving())
        .unwrap_or(false)
}

/// Registered-handler map from condition names to predicate functions.
///
/// The asset loader resolves names through this registry when graphs are
/// loaded; systems never look conditions up by name at tick time.
#[derive(Resource)]
pub struct ConditionRegistry {
    conditions: FxHashMap<String, ConditionFn>,
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        let mut registry = Self {
            conditions: FxHashMap::default(),
        };
        registry.register("is_moving", is_moving);
        registry.register("is_idle", is_idle);
        registry
    }
}

impl ConditionRegistry {
    pub fn register(&mut self, name: impl Into<String>, condition: ConditionFn) {
        self.conditions.insert(name.into(), condition);
    }

    pub fn get(&self, name: &str) -> Option<ConditionFn> {
        self.conditions.get(name).copied()
    }
}

/// One edge of the graph. `from` is a clip name or `"*"`; `condition == None`
/// is the implicit animation-complete predicate.
#[derive(Debug, Clone)]
pub struct AnimationTransition {
    pub from: String,
    pub to: String,
    pub condition: Option<ConditionFn>,
    pub priority: i32,
}

/// Immutable, shared transition graph for one entity archetype.
///
/// Declaration order matters: transitions with equal priority resolve to the
/// first-declared one.
#[derive(Debug, Default)]
pub struct AnimationGraph {
    pub transitions: SmallVec<[AnimationTransition; 8]>,
}

impl AnimationGraph {
    pub fn new(transitions: impl IntoIterator<Item = AnimationTransition>) -> Self {
        Self {
            transitions: transitions.into_iter().collect(),
        }
    }
}

/// Serialized form of a transition as shipped by the asset files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

/// Serialized form of a whole graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationGraphDef {
    pub transitions: Vec<TransitionDef>,
}

/// Central registry of shared animation graphs keyed by archetype name.
#[derive(Resource, Default)]
pub struct AnimationGraphStore {
    pub graphs: FxHashMap<String, Arc<AnimationGraph>>,
}

impl AnimationGraphStore {
    pub fn get(&self, key: &str) -> Option<Arc<AnimationGraph>> {
        self.graphs.get(key).cloned()
    }

    /// Resolve a graph definition against the condition registry and store it.
    ///
    /// Transitions naming an unknown condition are logged and dropped; the
    /// rest of the graph loads normally.
    pub fn insert_def(
        &mut self,
        key: impl Into<String>,
        def: &AnimationGraphDef,
        registry: &ConditionRegistry,
    ) -> Arc<AnimationGraph> {
        let key = key.into();
        let mut transitions: SmallVec<[AnimationTransition; 8]> = SmallVec::new();
        for t in &def.transitions {
            let condition = match t.condition.as_deref() {
                None | Some(ANIMATION_COMPLETE) => None,
                Some(name) => match registry.get(name) {
                    Some(f) => Some(f),
                    None => {
                        warn!(
                            "graph '{}': unknown condition '{}' on {} -> {}, transition dropped",
                            key, name, t.from, t.to
                        );
                        continue;
                    }
                },
            };
            transitions.push(AnimationTransition {
                from: t.from.clone(),
                to: t.to.clone(),
                condition,
                priority: t.priority,
            });
        }
        let graph = Arc::new(AnimationGraph::new(transitions));
        self.graphs.insert(key, Arc::clone(&graph));
        graph
    }

    /// Load a graph from a JSON file.
    pub fn load_from_file(
        &mut self,
        key: impl Into<String>,
        path: &str,
        registry: &ConditionRegistry,
    ) -> Result<Arc<AnimationGraph>, String> {
        let key = key.into();
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read graph file {path}: {e}"))?;
        let def: AnimationGraphDef = serde_json::from_str(&data)
            .map_err(|e| format!("failed to parse graph file {path}: {e}"))?;
        let graph = self.insert_def(key.clone(), &def, registry);
        info!(
            "loaded animation graph '{}' ({} transitions) from {}",
            key,
            graph.transitions.len(),
            path
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(entries: &[(&str, &str, Option<&str>, i32)]) -> AnimationGraphDef {
        AnimationGraphDef {
            transitions: entries
                .iter()
                .map(|(from, to, condition, priority)| TransitionDef {
                    from: from.to_string(),
                    to: to.to_string(),
                    condition: condition.map(str::to_string),
                    priority: *priority,
                })
                .collect(),
        }
    }

    #[test]
    fn test_known_conditions_resolve() {
        let registry = ConditionRegistry::default();
        let mut store = AnimationGraphStore::default();
        let graph = store.insert_def(
            "walker",
            &def(&[("*", "walk", Some("is_moving"), 1)]),
            &registry,
        );
        assert_eq!(graph.transitions.len(), 1);
        assert!(graph.transitions[0].condition.is_some());
    }

    #[test]
    fn test_animation_complete_maps_to_no_condition() {
        let registry = ConditionRegistry::default();
        let mut store = AnimationGraphStore::default();
        let graph = store.insert_def(
            "walker",
            &def(&[
                ("attack", "idle", Some("animation_complete"), 0),
                ("attack", "walk", None, 0),
            ]),
            &registry,
        );
        assert_eq!(graph.transitions.len(), 2);
        assert!(graph.transitions.iter().all(|t| t.condition.is_none()));
    }

    #[test]
    fn test_unknown_condition_drops_transition() {
        let registry = ConditionRegistry::default();
        let mut store = AnimationGraphStore::default();
        let graph = store.insert_def(
            "walker",
            &def(&[
                ("*", "walk", Some("does_not_exist"), 5),
                ("walk", "idle", Some("is_idle"), 1),
            ]),
            &registry,
        );
        assert_eq!(graph.transitions.len(), 1);
        assert_eq!(graph.transitions[0].to, "idle");
    }

    #[test]
    fn test_custom_condition_registration() {
        fn always(_: &World, _: Entity) -> bool {
            true
        }
        let mut registry = ConditionRegistry::default();
        registry.register("always", always);
        assert!(registry.get("always").is_some());
        assert!(registry.get("never").is_none());
    }

    #[test]
    fn test_load_from_file_resolves_and_stores() {
        let path = std::env::temp_dir().join("beltworks_graph_load.json");
        let json = serde_json::to_string(&def(&[("*", "walk", Some("is_moving"), 1)])).unwrap();
        std::fs::write(&path, json).unwrap();

        let registry = ConditionRegistry::default();
        let mut store = AnimationGraphStore::default();
        let graph = store
            .load_from_file("walker", path.to_str().unwrap(), &registry)
            .unwrap();
        assert_eq!(graph.transitions.len(), 1);
        assert!(store.get("walker").is_some());
        assert!(store.get("missing").is_none());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_file_missing_path_errors() {
        let registry = ConditionRegistry::default();
        let mut store = AnimationGraphStore::default();
        assert!(
            store
                .load_from_file("walker", "/no/such/graph.json", &registry)
                .is_err()
        );
        assert!(store.get("walker").is_none());
    }

    #[test]
    fn test_graph_def_json_round_trip() {
        let json = r#"{
            "transitions": [
                { "from": "*", "to": "walk", "condition": "is_moving", "priority": 1 },
                { "from": "attack", "to": "idle", "priority": 0 }
            ]
        }"#;
        let parsed: AnimationGraphDef = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.transitions.len(), 2);
        assert_eq!(parsed.transitions[0].condition.as_deref(), Some("is_moving"));
        assert!(parsed.transitions[1].condition.is_none());
        assert_eq!(parsed.transitions[1].priority, 0);
    }
}
