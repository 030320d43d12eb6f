//! A controllable character.
//!
//! Joins the locomotion controller (tick clock) with the input latch and the
//! action state machine (frame clock).

use glam::Vec3;
use ledgerun_physics::{
    ContactSample, LocomotionConfig, LocomotionController, TickFrame, TickOutput,
};
use thiserror::Error;

use crate::actions::{
    ActionTimings, FrameMillis, LocomotionSignals, LocomotionStateId, LocomotionStateMachine,
    LogicContext, NullSignals, PhysicsContext, Pose,
};
use crate::body::PhysicsBody;
use crate::input::{FrameInput, InputLatch, InputSource};

/// Missing wiring detected while building a [`Character`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("character has no physics body")]
    MissingPhysics,

    #[error("character has no input source")]
    MissingInput,
}

/// Builder for [`Character`].
pub struct CharacterBuilder<B> {
    config: LocomotionConfig,
    body: Option<B>,
    input: Option<Box<dyn InputSource>>,
    signals: Option<Box<dyn LocomotionSignals>>,
}

impl<B: PhysicsBody> CharacterBuilder<B> {
    /// Start with the default configuration and nothing wired.
    pub fn new() -> Self {
        Self {
            config: LocomotionConfig::default(),
            body: None,
            input: None,
            signals: None,
        }
    }

    /// Locomotion configuration, including action durations.
    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    /// Physics body the character drives. Required.
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Source sampled once per frame. Required.
    pub fn input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Defaults to [`NullSignals`].
    pub fn signals(mut self, signals: impl LocomotionSignals + 'static) -> Self {
        self.signals = Some(Box::new(signals));
        self
    }

    /// Build the character and announce its initial state.
    pub fn build(self) -> Result<Character<B>, SetupError> {
        let body = self.body.ok_or(SetupError::MissingPhysics)?;
        let input = self.input.ok_or(SetupError::MissingInput)?;
        let mut signals = self.signals.unwrap_or_else(|| Box::new(NullSignals));

        let controller = LocomotionController::new(self.config);
        let mut machine = LocomotionStateMachine::new(ActionTimings::from_config(controller.config()));
        machine.start(signals.as_mut());

        Ok(Character {
            controller,
            machine,
            latch: InputLatch::new(),
            clock: FrameMillis::new(),
            body,
            input,
            signals,
            carried_contacts: Vec::new(),
            deferred_ticks: 0,
            last_output: None,
        })
    }
}

impl<B: PhysicsBody> Default for CharacterBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// A controllable character.
pub struct Character<B> {
    controller: LocomotionController,
    machine: LocomotionStateMachine,
    latch: InputLatch,
    clock: FrameMillis,
    body: B,
    input: Box<dyn InputSource>,
    signals: Box<dyn LocomotionSignals>,
    /// Contacts from deferred ticks, waiting for a complete batch.
    carried_contacts: Vec<ContactSample>,
    deferred_ticks: u32,
    last_output: Option<TickOutput>,
}

impl<B: PhysicsBody> Character<B> {
    /// Start wiring a character.
    pub fn builder() -> CharacterBuilder<B> {
        CharacterBuilder::new()
    }

    /// Frame pass: sample input and run the state machine logic.
    ///
    /// # Arguments
    ///
    /// * `delta_time` - Frame duration in seconds
    pub fn frame(&mut self, delta_time: f32) -> FrameInput {
        let raw = self.input.sample();
        let frame_input = self.latch.sample(&raw);

        let ctx = LogicContext {
            grounded: self.standing(),
            move_axis: frame_input.move_axis,
            guard_pressed: frame_input.guard_pressed,
            guard_held: frame_input.guard_held,
            jump_requested: frame_input.jump_requested,
            delta_time_ms: self.clock.advance(delta_time),
        };
        self.machine.logic_update(&ctx, self.signals.as_mut());

        frame_input
    }

    /// Tick pass: classify, solve, jump and hand the velocity to the body.
    ///
    /// Returns `None` when the body's contact batch was incomplete; the tick
    /// is then deferred and its contacts carried into the next one.
    pub fn fixed_tick(&mut self, delta_time: f32) -> Option<TickOutput> {
        let batch = self.body.drain_contacts();
        self.carried_contacts.extend(batch.samples);

        if !batch.complete {
            self.deferred_ticks = self.deferred_ticks.saturating_add(1);
            log::trace!(
                "tick deferred: {} contacts carried",
                self.carried_contacts.len()
            );
            return None;
        }

        let contacts = std::mem::take(&mut self.carried_contacts);
        let input = self.latch.take_tick_input();
        let frame = TickFrame {
            gravity: self.body.gravity(),
            position: self.body.position(),
            velocity: self.body.velocity(),
            delta_time,
        };

        let output = self
            .controller
            .tick(&frame, &contacts, &input, self.body.ground_probe());
        self.body.set_velocity(output.velocity);

        let ctx = PhysicsContext {
            surface: output.surface,
            jump_consumed: input.jump_requested,
            jumped: output.jumped,
        };
        self.machine.physics_update(&ctx, self.signals.as_mut());

        self.last_output = Some(output);
        Some(output)
    }

    /// Respawn: forget locomotion history, input edges and pending actions.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.latch.reset();
        self.clock.reset();
        self.carried_contacts.clear();
        self.last_output = None;
        self.machine.reset(self.signals.as_mut());
    }

    /// Replace the locomotion configuration, including action durations.
    pub fn set_config(&mut self, config: LocomotionConfig) {
        self.controller.set_config(config);
        self.machine
            .set_timings(ActionTimings::from_config(self.controller.config()));
    }

    /// Active locomotion state.
    pub fn state(&self) -> LocomotionStateId {
        self.machine.current()
    }

    /// Current body pose.
    pub fn pose(&self) -> Pose {
        self.machine.pose()
    }

    /// Surface classification of the last tick.
    pub fn on_ground(&self) -> bool {
        self.controller.on_ground()
    }

    /// Grounded after the last tick and not launching off it.
    ///
    /// This is what the frame pass treats as grounded; a tick that jumps is
    /// classified grounded but leaves the ground.
    pub fn standing(&self) -> bool {
        self.last_output
            .map_or(false, |o| o.surface.is_grounded() && !o.jumped)
    }

    /// Body velocity after the last physics step.
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    /// Body position after the last physics step.
    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    /// Tick-clock controller.
    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    /// Frame-clock state machine.
    pub fn machine(&self) -> &LocomotionStateMachine {
        &self.machine
    }

    /// Driven physics body.
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Driven physics body, mutably.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Ticks skipped because contacts were still arriving.
    pub fn deferred_ticks(&self) -> u32 {
        self.deferred_ticks
    }

    /// Result of the last tick that ran.
    pub fn last_output(&self) -> Option<&TickOutput> {
        self.last_output.as_ref()
    }

    /// Check if a jump request is waiting for the next tick.
    pub fn jump_pending(&self) -> bool {
        self.latch.jump_requested()
    }
}

// ============================================================================
// Tests
// ============================================================================
