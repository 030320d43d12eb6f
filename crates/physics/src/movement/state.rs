//! Kinematic state and the per-tick input/output structures.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Surface state decided for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceClassification {
    /// Standing on ground (directly, snapped, or wedged between steep contacts).
    Grounded,
    /// Touching only surfaces too steep to stand on.
    Steep,
    /// No usable contact.
    #[default]
    Airborne,
}

impl SurfaceClassification {
    /// Check if the character counts as grounded.
    #[inline]
    pub fn is_grounded(self) -> bool {
        self == Self::Grounded
    }

    /// Check if the character is against a steep surface without ground.
    #[inline]
    pub fn is_steep(self) -> bool {
        self == Self::Steep
    }
}

/// Persistent locomotion state of one character.
///
/// Owned by a single [`LocomotionController`](super::LocomotionController) and
/// mutated once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicState {
    /// Velocity after the last tick (world units/second).
    pub velocity: Vec3,

    /// Horizontal velocity requested by the latched input.
    pub desired_velocity: Vec2,

    /// Resolved ground normal of the last tick (`up_axis` when airborne).
    pub contact_normal: Vec3,

    /// Steep normal sum of the last tick (normalized when more than one).
    pub steep_normal: Vec3,

    /// Jumps taken since the character was last firmly grounded.
    pub jump_phase: u32,

    /// Ticks since the character was last grounded.
    pub steps_since_last_grounded: u32,

    /// Ticks since the last granted jump.
    pub steps_since_last_jump: u32,

    /// Unit vector opposite gravity for the last tick.
    pub up_axis: Vec3,

    /// Surface classification of the last tick.
    pub surface: SurfaceClassification,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            desired_velocity: Vec2::ZERO,
            contact_normal: Vec3::Y,
            steep_normal: Vec3::ZERO,
            jump_phase: 0,
            steps_since_last_grounded: 0,
            steps_since_last_jump: 0,
            up_axis: Vec3::Y,
            surface: SurfaceClassification::Airborne,
        }
    }
}

impl KinematicState {
    /// Check if the last tick left the character grounded.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.surface.is_grounded()
    }

    /// Current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Input latched for a single fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Move vector (-1.0 to 1.0 per axis). Only `x` drives horizontal motion.
    pub move_axis: Vec2,

    /// A jump was requested since the previous tick.
    pub jump_requested: bool,

    /// Right direction of the input space (e.g. a camera), if any.
    ///
    /// When `None` the world +X axis is used.
    pub input_right: Option<Vec3>,
}

/// World data for a tick, supplied by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickFrame {
    /// Gravity acting on the body this tick.
    pub gravity: Vec3,

    /// Body position (origin of the snap probe).
    pub position: Vec3,

    /// Body velocity after the previous integration step.
    pub velocity: Vec3,

    /// Fixed tick duration in seconds.
    pub delta_time: f32,
}

/// Result of a tick, to be handed back to the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Velocity the body should integrate.
    pub velocity: Vec3,

    /// Surface classification of this tick.
    pub surface: SurfaceClassification,

    /// Resolved ground normal (`up_axis` when not grounded).
    pub contact_normal: Vec3,

    /// Whether the snap probe reacquired ground this tick.
    pub snapped: bool,

    /// Whether a jump impulse was applied this tick.
    pub jumped: bool,
}
