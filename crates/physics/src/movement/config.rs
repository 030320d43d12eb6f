//! Locomotion configuration.
//!
//! All tuning values are grouped here. Values are validated once, when the
//! configuration is loaded or built, by clamping them into their declared
//! ranges; the tick pipeline never re-checks them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::LayerMask;

/// Errors that can occur while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed locomotion config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for character locomotion.
///
/// Distances are in world units, speeds in units/second, angles in degrees
/// and durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // ========================================================================
    // Horizontal Movement
    // ========================================================================
    /// Top horizontal speed requested by a full input deflection. Range 0-100.
    pub max_velocity: f32,

    /// Horizontal acceleration while grounded. Range 0-100.
    pub max_acceleration: f32,

    /// Horizontal acceleration while airborne. Range 0-100.
    pub max_air_acceleration: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    /// Height reached by a jump from rest. Range 0-10.
    pub jump_height: f32,

    /// Jumps allowed while airborne before the character grounds again. Range 0-10.
    pub max_air_jumps: u32,

    // ========================================================================
    // Slopes and Stairs
    // ========================================================================
    /// Steepest surface still counted as ground. Range 0-90.
    pub max_ground_angle: f32,

    /// Steepest surface counted as ground on stairs layers. Range 0-90.
    pub max_stairs_angle: f32,

    /// Layers that use `max_stairs_angle` instead of `max_ground_angle`.
    ///
    /// Defaults to no layers. With all layers selected every surface would
    /// take the stairs angle and `max_ground_angle` would never apply.
    pub stairs_mask: LayerMask,

    // ========================================================================
    // Ground Snapping
    // ========================================================================
    /// Speed above which the character is allowed to launch off ledges. Range 0-100.
    pub max_snap_speed: f32,

    /// Length of the downward snap probe. Must be >= 0.
    pub probe_distance: f32,

    /// Layers the snap probe may hit.
    pub ground_probe_mask: LayerMask,

    // ========================================================================
    // Timed Actions
    // ========================================================================
    /// Longest time a guard is held before it drops. Range 0-10.
    pub guard_duration: f32,

    /// Duration of the slide pose. Range 0-10.
    pub slide_duration: f32,

    /// Duration of the roll pose. Range 0-10.
    pub roll_duration: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Movement
            max_velocity: 10.0,
            max_acceleration: 10.0,
            max_air_acceleration: 1.0,

            // Jumping
            jump_height: 2.0,
            max_air_jumps: 0,

            // Slopes
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            stairs_mask: LayerMask::NONE,

            // Snapping
            max_snap_speed: 100.0,
            probe_distance: 2.0,
            ground_probe_mask: LayerMask::ALL,

            // Timed actions
            guard_duration: 5.0,
            slide_duration: 2.0,
            roll_duration: 2.0,
        }
    }
}

impl LocomotionConfig {
    /// Create a "platformer" config: snappy ground control and one air jump.
    pub fn platformer() -> Self {
        Self {
            max_velocity: 12.0,
            max_acceleration: 60.0,
            max_air_acceleration: 20.0,
            jump_height: 2.5,
            max_air_jumps: 1,
            max_snap_speed: 15.0,
            probe_distance: 1.0,
            slide_duration: 0.75,
            roll_duration: 0.5,
            ..Default::default()
        }
    }

    /// Create a "floaty" config (slow acceleration, high jumps, two air jumps).
    pub fn floaty() -> Self {
        Self {
            max_velocity: 6.0,
            max_acceleration: 8.0,
            max_air_acceleration: 6.0,
            jump_height: 4.0,
            max_air_jumps: 2,
            max_ground_angle: 35.0,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON document.
    ///
    /// Missing fields take their default value and out-of-range values are
    /// clamped, so only malformed documents are rejected.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Clamp every value into its declared range.
    ///
    /// Non-finite values are replaced by the default.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            max_velocity: clamp_field("max_velocity", self.max_velocity, 0.0, 100.0, defaults.max_velocity),
            max_acceleration: clamp_field(
                "max_acceleration",
                self.max_acceleration,
                0.0,
                100.0,
                defaults.max_acceleration,
            ),
            max_air_acceleration: clamp_field(
                "max_air_acceleration",
                self.max_air_acceleration,
                0.0,
                100.0,
                defaults.max_air_acceleration,
            ),
            jump_height: clamp_field("jump_height", self.jump_height, 0.0, 10.0, defaults.jump_height),
            max_air_jumps: {
                let clamped = self.max_air_jumps.min(10);
                if clamped != self.max_air_jumps {
                    log::warn!("max_air_jumps={} clamped to {}", self.max_air_jumps, clamped);
                }
                clamped
            },
            max_ground_angle: clamp_field(
                "max_ground_angle",
                self.max_ground_angle,
                0.0,
                90.0,
                defaults.max_ground_angle,
            ),
            max_stairs_angle: clamp_field(
                "max_stairs_angle",
                self.max_stairs_angle,
                0.0,
                90.0,
                defaults.max_stairs_angle,
            ),
            stairs_mask: self.stairs_mask,
            max_snap_speed: clamp_field("max_snap_speed", self.max_snap_speed, 0.0, 100.0, defaults.max_snap_speed),
            probe_distance: clamp_field(
                "probe_distance",
                self.probe_distance,
                0.0,
                f32::MAX,
                defaults.probe_distance,
            ),
            ground_probe_mask: self.ground_probe_mask,
            guard_duration: clamp_field("guard_duration", self.guard_duration, 0.0, 10.0, defaults.guard_duration),
            slide_duration: clamp_field("slide_duration", self.slide_duration, 0.0, 10.0, defaults.slide_duration),
            roll_duration: clamp_field("roll_duration", self.roll_duration, 0.0, 10.0, defaults.roll_duration),
        }
    }

    /// Minimum `dot(up, normal)` for ground (cosine of `max_ground_angle`).
    pub fn min_ground_dot(&self) -> f32 {
        self.max_ground_angle.to_radians().cos()
    }

    /// Minimum `dot(up, normal)` for ground on stairs layers.
    pub fn min_stairs_dot(&self) -> f32 {
        self.max_stairs_angle.to_radians().cos()
    }
}

fn clamp_field(name: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("{}={} is not finite, using {}", name, value, fallback);
        return fallback;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{}={} clamped to {}", name, value, clamped);
    }
    clamped
}
