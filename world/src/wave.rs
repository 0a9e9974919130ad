//! Wave progression state.

use serde::Serialize;
use spire_siege_core::WavePhase;

/// Enemy scheduled for release by the current wave.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpawnQueueEntry {
    /// Enemy definition id.
    pub enemy_def: String,
    /// Lane position the enemy appears at.
    pub position: f64,
    /// Absolute simulation time of release.
    pub spawn_time: f64,
    /// Whether the entry has been released.
    pub spawned: bool,
}

/// Progress through the waves of the current floor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaveState {
    /// Wave number within the floor, starting at 1.
    pub current: u32,
    /// Waves on this floor.
    pub total: u32,
    /// Lifecycle phase.
    pub phase: WavePhase,
    /// Countdown used by the clearing phase.
    pub phase_timer: f64,
    /// Floor number, starting at 1.
    pub floor: u32,
    /// Spawn schedule of the current wave.
    pub spawn_queue: Vec<SpawnQueueEntry>,
}

impl WaveState {
    /// Waiting state at the start of a run.
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            current: 1,
            total,
            phase: WavePhase::Completed,
            phase_timer: 0.0,
            floor: 1,
            spawn_queue: Vec::new(),
        }
    }

    /// Reports whether every queued enemy has been released.
    #[must_use]
    pub fn all_spawned(&self) -> bool {
        self.spawn_queue.iter().all(|entry| entry.spawned)
    }
}
