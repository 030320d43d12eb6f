//! Jump impulses and the air-jump budget.
//!
//! A latched jump request is consumed by the next tick whether or not it is
//! granted. Grounded jumps push off the ground normal, wall jumps push off the
//! steep normal and restart the budget, and air jumps draw from
//! `max_air_jumps` until the character grounds again.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::LocomotionConfig;
use super::contact::ContactAccumulator;
use super::state::KinematicState;

/// Which surface a granted jump pushed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    /// Jump off ground along the contact normal.
    Ground,
    /// Jump off a steep surface along its normal.
    Wall,
    /// Jump in mid-air, drawn from the air-jump budget.
    Air,
}

/// Result of a jump attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpOutcome {
    /// Surface the jump pushed off.
    pub kind: JumpKind,
    /// Impulse direction after biasing towards up.
    pub direction: Vec3,
    /// Speed added along `direction`.
    pub speed: f32,
}

/// Launch speed reaching `jump_height` against the given gravity magnitude.
#[inline]
pub fn jump_speed(gravity_magnitude: f32, jump_height: f32) -> f32 {
    (2.0 * gravity_magnitude * jump_height).sqrt()
}

/// Try to jump, modifying the state's velocity on success.
///
/// Returns `None` when no surface or air jump is available; the request is
/// dropped in that case and never retried.
pub fn try_jump(
    state: &mut KinematicState,
    contacts: &ContactAccumulator,
    gravity: Vec3,
    config: &LocomotionConfig,
) -> Option<JumpOutcome> {
    let (kind, jump_direction) = if contacts.on_ground() {
        (JumpKind::Ground, contacts.contact_normal)
    } else if contacts.on_steep() {
        state.jump_phase = 0;
        (JumpKind::Wall, contacts.steep_normal)
    } else if config.max_air_jumps > 0 && state.jump_phase <= config.max_air_jumps {
        if state.jump_phase == 0 {
            state.jump_phase = 1;
        }
        (JumpKind::Air, contacts.contact_normal)
    } else {
        log::trace!(
            "jump dropped: phase={} max_air_jumps={}",
            state.jump_phase,
            config.max_air_jumps
        );
        return None;
    };

    state.steps_since_last_jump = 0;
    state.jump_phase += 1;

    let direction = (jump_direction + state.up_axis)
        .try_normalize()
        .unwrap_or(state.up_axis);
    let mut speed = jump_speed(gravity.length(), config.jump_height);
    let aligned_speed = state.velocity.dot(direction);
    if aligned_speed > 0.0 {
        speed = (speed - aligned_speed).max(0.0);
    }

    state.velocity += direction * speed;

    log::debug!(
        "jump {:?}: phase={} direction={:?} speed={:.3}",
        kind,
        state.jump_phase,
        direction,
        speed
    );

    Some(JumpOutcome {
        kind,
        direction,
        speed,
    })
}

// ============================================================================
// Tests
// ============================================================================
