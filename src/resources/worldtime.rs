use bevy_ecs::prelude::Resource;

/// Simulation time and delta. `delta` is the scaled step for the current
/// tick; `elapsed` accumulates across ticks.
#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}

/// Fixed-interval tick accumulator. Rendering runs every frame; the
/// simulation runs whenever the accumulator crosses `interval`.
#[derive(Resource, Clone, Copy)]
pub struct SimulationClock {
    pub interval: f32,
    pub accumulator: f32,
    pub tick_count: u64,
}

impl SimulationClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
            tick_count: 0,
        }
    }
}
