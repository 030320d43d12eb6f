//! Two-clock simulation driver.
//!
//! Frames arrive at a variable rate. Each frame first runs as many fixed ticks
//! as the accumulated time allows (bounded, so a long stall cannot spiral),
//! then the frame pass.

use serde::{Deserialize, Serialize};

use crate::body::PhysicsBody;
use crate::character::Character;

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed ticks per second.
    pub tick_rate: u32,

    /// Upper bound on ticks run by a single frame. Backlog beyond it is dropped.
    pub max_ticks_per_frame: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            max_ticks_per_frame: 5,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// What a call to [`Simulation::advance`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed ticks run (including deferred ones).
    pub ticks: u32,
    /// Ticks deferred on an incomplete contact batch.
    pub deferred: u32,
    /// Seconds of backlog dropped by the tick cap.
    pub dropped: f32,
}

/// Drives one character and its body.
pub struct Simulation<B> {
    /// Frames run so far.
    pub frame: u64,

    /// Fixed ticks run so far.
    pub tick: u64,

    pub config: SimulationConfig,

    character: Character<B>,

    /// Unsimulated time carried to the next frame.
    accumulator: f32,
}

impl<B: PhysicsBody> Simulation<B> {
    /// Drive `character` with an empty accumulator.
    pub fn new(config: SimulationConfig, character: Character<B>) -> Self {
        Self {
            frame: 0,
            tick: 0,
            config,
            character,
            accumulator: 0.0,
        }
    }

    /// Advance by one frame of `frame_time` seconds.
    pub fn advance(&mut self, frame_time: f32) -> FrameReport {
        let tick_dt = self.config.delta_time();
        let frame_time = if frame_time.is_finite() {
            frame_time.max(0.0)
        } else {
            0.0
        };
        self.accumulator += frame_time;

        let mut report = FrameReport::default();
        while self.accumulator >= tick_dt && report.ticks < self.config.max_ticks_per_frame {
            self.accumulator -= tick_dt;
            if self.character.fixed_tick(tick_dt).is_none() {
                report.deferred += 1;
            }
            self.character.body_mut().integrate(tick_dt);
            report.ticks += 1;
            self.tick += 1;
        }

        if self.accumulator >= tick_dt {
            report.dropped = self.accumulator - self.accumulator % tick_dt;
            self.accumulator %= tick_dt;
            log::warn!(
                "frame {}: dropped {:.3}s of simulation backlog",
                self.frame,
                report.dropped
            );
        }

        self.character.frame(frame_time);
        self.frame += 1;
        report
    }

    /// Run `frames` frames of equal length.
    pub fn run(&mut self, frames: u32, frame_time: f32) -> FrameReport {
        let mut total = FrameReport::default();
        for _ in 0..frames {
            let report = self.advance(frame_time);
            total.ticks += report.ticks;
            total.deferred += report.deferred;
            total.dropped += report.dropped;
        }
        total
    }

    /// Driven character.
    pub fn character(&self) -> &Character<B> {
        &self.character
    }

    /// Driven character, mutably.
    pub fn character_mut(&mut self) -> &mut Character<B> {
        &mut self.character
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
