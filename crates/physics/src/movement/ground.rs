//! Ground classification and snapping.
//!
//! After a tick's contacts are accumulated, the classifier decides whether the
//! character stands on ground. When contact was lost only this tick, a single
//! downward probe tries to reattach it so running over a small ledge or a
//! stair nosing doesn't launch the character into the air.

use glam::Vec3;

use crate::collision::{GroundProbe, LayerMask};

use super::config::LocomotionConfig;
use super::contact::ContactAccumulator;
use super::state::{KinematicState, SurfaceClassification};

/// Slope thresholds derived from the configuration.
///
/// Each threshold is the cosine of a maximum slope angle, compared against
/// `dot(up_axis, normal)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceThresholds {
    /// Cosine of `max_ground_angle`.
    pub min_ground_dot: f32,
    /// Cosine of `max_stairs_angle`.
    pub min_stairs_dot: f32,
    /// Layers using the stairs threshold.
    pub stairs_mask: LayerMask,
}

impl SurfaceThresholds {
    /// Derive thresholds from a configuration.
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            min_ground_dot: config.min_ground_dot(),
            min_stairs_dot: config.min_stairs_dot(),
            stairs_mask: config.stairs_mask,
        }
    }

    /// Minimum up-dot for a surface on the given layer to count as ground.
    #[inline]
    pub fn min_dot(&self, layer: u8) -> f32 {
        if self.stairs_mask.includes(layer) {
            self.min_stairs_dot
        } else {
            self.min_ground_dot
        }
    }
}

/// Outcome of ground classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundCheck {
    /// Surface state of the tick.
    pub surface: SurfaceClassification,
    /// Whether the snap probe provided the ground.
    pub snapped: bool,
}

/// Decide the surface state of a tick.
///
/// Advances the step counters, then tries, in order: direct ground contacts,
/// the snap probe, and promotion of several steep contacts that together form
/// a floor (e.g. the bottom of a V-shaped crevasse). On success the contact
/// normal is resolved; otherwise it defaults to the up axis.
pub fn classify<P: GroundProbe + ?Sized>(
    state: &mut KinematicState,
    contacts: &mut ContactAccumulator,
    position: Vec3,
    probe: &P,
    config: &LocomotionConfig,
    thresholds: &SurfaceThresholds,
) -> GroundCheck {
    state.steps_since_last_grounded = state.steps_since_last_grounded.saturating_add(1);
    state.steps_since_last_jump = state.steps_since_last_jump.saturating_add(1);

    let mut snapped = false;
    let grounded = contacts.on_ground()
        || {
            snapped = snap_to_ground(state, contacts, position, probe, config, thresholds);
            snapped
        }
        || check_steep_contacts(state.up_axis, contacts, thresholds);

    if grounded {
        state.steps_since_last_grounded = 0;
        if state.steps_since_last_jump > 1 {
            state.jump_phase = 0;
        }
        if contacts.ground_contact_count > 1 {
            contacts.contact_normal = contacts.contact_normal.normalize_or_zero();
        }
        GroundCheck {
            surface: SurfaceClassification::Grounded,
            snapped,
        }
    } else {
        contacts.contact_normal = state.up_axis;
        let surface = if contacts.on_steep() {
            SurfaceClassification::Steep
        } else {
            SurfaceClassification::Airborne
        };
        GroundCheck { surface, snapped }
    }
}

/// Try to reattach the character to ground it lost this tick.
///
/// Fires only when the character was grounded on the previous tick, has not
/// jumped in the last two ticks and moves no faster than `max_snap_speed`.
/// On success the velocity is turned onto the hit plane without changing its
/// magnitude.
pub fn snap_to_ground<P: GroundProbe + ?Sized>(
    state: &mut KinematicState,
    contacts: &mut ContactAccumulator,
    position: Vec3,
    probe: &P,
    config: &LocomotionConfig,
    thresholds: &SurfaceThresholds,
) -> bool {
    if state.steps_since_last_grounded > 1 || state.steps_since_last_jump <= 2 {
        return false;
    }

    let speed = state.velocity.length();
    if speed > config.max_snap_speed {
        return false;
    }

    let Some(hit) = probe.probe(
        position,
        -state.up_axis,
        config.probe_distance,
        config.ground_probe_mask,
    ) else {
        return false;
    };

    let up_dot = state.up_axis.dot(hit.normal);
    if up_dot < thresholds.min_dot(hit.layer) {
        return false;
    }

    contacts.ground_contact_count = 1;
    contacts.contact_normal = hit.normal;

    let dot = state.velocity.dot(hit.normal);
    state.velocity = (state.velocity - hit.normal * dot).normalize_or_zero() * speed;

    log::trace!(
        "snapped to ground: layer={} distance={:.3} speed={:.3}",
        hit.layer,
        hit.distance,
        speed
    );
    true
}

/// Promote several steep contacts to ground when their average is walkable.
fn check_steep_contacts(
    up_axis: Vec3,
    contacts: &mut ContactAccumulator,
    thresholds: &SurfaceThresholds,
) -> bool {
    if contacts.steep_contact_count > 1 {
        contacts.steep_normal = contacts.steep_normal.normalize_or_zero();
        let up_dot = up_axis.dot(contacts.steep_normal);
        if up_dot >= thresholds.min_ground_dot {
            contacts.ground_contact_count = 1;
            contacts.contact_normal = contacts.steep_normal;
            return true;
        }
    }
    false
}

// ============================================================================
// Tests
// ============================================================================
