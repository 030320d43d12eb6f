//! Player input handling.
//!
//! Input is sampled once per frame and latched; fixed ticks read the latch.
//! A jump press between two ticks is remembered in a one-slot request that the
//! next tick consumes, so presses are never lost to a frame that runs no tick.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use ledgerun_physics::TickInput;
use serde::{Deserialize, Serialize};

/// Raw player input for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Move stick (-1.0 to 1.0 per axis).
    pub move_axis: Vec2,

    /// Jump button level.
    pub jump: bool,

    /// Guard trigger value. Anything above zero counts as pressed.
    pub guard: f32,

    /// Right direction of the input space (e.g. a camera), if any.
    pub input_right: Option<Vec3>,
}

impl RawInput {
    /// Input with only the move stick deflected.
    pub fn moving(x: f32) -> Self {
        Self {
            move_axis: Vec2::new(x, 0.0),
            ..Default::default()
        }
    }

    /// Check if the guard trigger is pressed.
    #[inline]
    pub fn guard_pressed(&self) -> bool {
        self.guard > 0.0
    }
}

/// Supplier of one [`RawInput`] per frame.
pub trait InputSource {
    fn sample(&mut self) -> RawInput;
}

impl<F: FnMut() -> RawInput> InputSource for F {
    fn sample(&mut self) -> RawInput {
        self()
    }
}

/// Shared input slot, written by the host and read by the character.
#[derive(Debug, Clone, Default)]
pub struct InputCell(Rc<RefCell<RawInput>>);

impl InputCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input returned from the next sample.
    pub fn set(&self, input: RawInput) {
        *self.0.borrow_mut() = input;
    }

    pub fn get(&self) -> RawInput {
        *self.0.borrow()
    }
}

impl InputSource for InputCell {
    fn sample(&mut self) -> RawInput {
        self.get()
    }
}

/// Edges and levels derived from one frame's sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Sanitized move vector.
    pub move_axis: Vec2,
    /// Jump went from released to pressed this frame.
    pub jump_pressed: bool,
    /// Guard went from released to pressed this frame.
    pub guard_pressed: bool,
    /// Guard is currently held.
    pub guard_held: bool,
    /// A jump request is waiting for the next tick.
    pub jump_requested: bool,
}

/// Latches frame-rate input for the fixed tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputLatch {
    move_axis: Vec2,
    input_right: Option<Vec3>,
    /// One-slot jump request, cleared by the next tick.
    jump_request: bool,
    /// Previous frame's jump state (for edge detection).
    prev_jump_pressed: bool,
    /// Previous frame's guard state (for edge detection).
    prev_guard_pressed: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch one frame of input.
    pub fn sample(&mut self, raw: &RawInput) -> FrameInput {
        let guard_held = raw.guard_pressed();

        // Detect button edges
        let jump_pressed = raw.jump && !self.prev_jump_pressed;
        let guard_pressed = guard_held && !self.prev_guard_pressed;

        // Update previous state for next frame
        self.prev_jump_pressed = raw.jump;
        self.prev_guard_pressed = guard_held;

        self.move_axis = sanitize_axis(raw.move_axis);
        self.input_right = raw.input_right.filter(|r| r.is_finite());
        self.jump_request |= jump_pressed;

        FrameInput {
            move_axis: self.move_axis,
            jump_pressed,
            guard_pressed,
            guard_held,
            jump_requested: self.jump_request,
        }
    }

    /// Check if a jump request is waiting.
    pub fn jump_requested(&self) -> bool {
        self.jump_request
    }

    /// Snapshot for a tick, consuming the jump request.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_axis: self.move_axis,
            jump_requested: self.jump_request,
            input_right: self.input_right,
        };
        self.jump_request = false;
        input
    }

    /// Forget latched input and button history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Clamp each axis to [-1, 1], dropping non-finite values.
fn sanitize_axis(axis: Vec2) -> Vec2 {
    let clean = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
    Vec2::new(clean(axis.x), clean(axis.y))
}
