#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation clock: the fixed per-tick system order and a fixed-step driver.

use std::time::Duration;

use spire_siege_core::ContentError;
use spire_siege_world::World;
use thiserror::Error;

/// Default simulation step: 20 ticks per second.
pub const DEFAULT_STEP: f64 = 0.05;
/// Default cap on the wall-clock time consumed by a single frame.
pub const DEFAULT_MAX_FRAME: f64 = 0.25;

/// What a call to [`advance_tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The world is not running; nothing was touched.
    Paused,
    /// Every system ran once.
    Advanced,
    /// The tower fell during this tick and the run stopped.
    Lost,
}

/// Unrecoverable failures raised while ticking.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Wave content could not be resolved.
    #[error("wave content lookup failed: {0}")]
    Content(#[from] ContentError),
    /// A driver step must be a positive, finite number of seconds.
    #[error("simulation step must be positive and finite, got {0}")]
    InvalidStep(f64),
}

/// Advances the world by `dt` seconds.
///
/// Systems run in a fixed order: mana regeneration, the draw timer, the
/// clock, the AI, status effects, melee, projectiles, waves, the loss check
/// and finally the purge of dead entities. Entities created mid-tick are
/// only visited by systems that run after their creation.
pub fn advance_tick(world: &mut World, dt: f64) -> Result<TickOutcome, SimulationError> {
    if !world.is_running {
        return Ok(TickOutcome::Paused);
    }

    if world.mana < world.max_mana {
        world.mana = (world.mana + world.mana_regen * dt).min(world.max_mana);
    }
    spire_siege_system_cards::advance_draw_timer(world, dt);

    world.time += dt;
    world.tick_count += 1;

    if world.config().ai.enabled {
        let _ = spire_siege_system_ai::update_ai(world, dt);
    }
    spire_siege_system_status_effects::update(world, dt);
    spire_siege_system_combat::update_enemies(world, dt);
    spire_siege_system_combat::update_summons(world, dt);
    spire_siege_system_projectiles::update(world, dt);
    spire_siege_system_waves::update(world, dt)?;
    spire_siege_system_waves::update_auto_continue(world, dt)?;
    let lost = spire_siege_system_waves::check_loss_condition(world);
    spire_siege_system_combat::cleanup_dead_entities(world);

    if lost {
        return Ok(TickOutcome::Lost);
    }
    Ok(TickOutcome::Advanced)
}

/// Converts variable wall-clock frames into fixed simulation steps.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepDriver {
    step: f64,
    max_frame: f64,
    accumulator: f64,
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            max_frame: DEFAULT_MAX_FRAME,
            accumulator: 0.0,
        }
    }
}

impl FixedStepDriver {
    /// Creates a driver ticking every `step` seconds that consumes at most
    /// `max_frame` seconds per call.
    pub fn new(step: f64, max_frame: f64) -> Result<Self, SimulationError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SimulationError::InvalidStep(step));
        }
        Ok(Self {
            step,
            max_frame,
            accumulator: 0.0,
        })
    }

    /// Seconds simulated per tick.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Wall-clock time banked toward the next tick.
    #[must_use]
    pub const fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Banks `elapsed` and runs as many fixed ticks as it pays for.
    ///
    /// Returns the number of ticks executed. A paused or lost world drops
    /// whatever time was banked.
    pub fn advance(&mut self, world: &mut World, elapsed: Duration) -> Result<u32, SimulationError> {
        if !world.is_running {
            self.accumulator = 0.0;
            return Ok(0);
        }

        let elapsed = elapsed.as_secs_f64();
        if elapsed > self.max_frame {
            tracing::debug!(elapsed, max_frame = self.max_frame, "frame clamped");
        }
        self.accumulator += elapsed.min(self.max_frame);
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            match advance_tick(world, self.step)? {
                TickOutcome::Advanced => ticks += 1,
                TickOutcome::Lost => {
                    ticks += 1;
                    self.accumulator = 0.0;
                }
                TickOutcome::Paused => self.accumulator = 0.0,
            }
        }
        Ok(ticks)
    }
}
