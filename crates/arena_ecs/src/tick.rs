//! Fixed-timestep tick loop.
//!
//! Each tick advances the world by `1 / tick_rate` seconds of simulated time.
//! In realtime mode the loop sleeps out the rest of each tick's budget; in
//! headless mode it runs as fast as the systems allow.

use std::time::{Duration, Instant};

use arena_component::EcsError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::world::World;

/// Configuration for the tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Pace ticks against the wall clock.
    pub realtime: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            realtime: false,
        }
    }
}

impl TickConfig {
    /// Simulated seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

/// Why [`TickLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `max_ticks` was reached.
    TickLimit,
    /// Something called [`World::request_stop`].
    Stopped,
}

/// Owns the world and drives it tick by tick.
#[derive(Debug)]
pub struct TickLoop {
    tick_id: u64,
    config: TickConfig,
    world: World,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, world: World) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Give the world back to the caller.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// Run one tick of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Propagates the first system error from [`World::update`].
    pub fn tick(&mut self, dt: f64) -> Result<(), EcsError> {
        self.tick_id += 1;
        debug!(tick_id = self.tick_id, dt, "tick start");
        self.world.update(dt as f32)
    }

    /// Run until the tick limit is reached or the world requests a stop.
    ///
    /// # Errors
    ///
    /// Propagates the first system error; the loop stops at that tick.
    pub fn run(&mut self) -> Result<RunOutcome, EcsError> {
        let tick_duration = Duration::from_secs_f64(self.config.dt());
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realtime = self.config.realtime,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick(self.config.dt())?;

            tick_count += 1;
            if self.world.stop_requested() {
                info!(ticks = tick_count, "tick loop stopped by world");
                return Ok(RunOutcome::Stopped);
            }
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                return Ok(RunOutcome::TickLimit);
            }

            if !self.config.realtime {
                continue;
            }
            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
