//! Character locomotion controller.
//!
//! This is the main entry point for the fixed tick. It takes the contacts and
//! world data reported by the physics collaborator plus the latched input,
//! and returns the velocity the body should integrate.

use glam::Vec3;

use crate::collision::GroundProbe;

use super::config::LocomotionConfig;
use super::contact::{ContactAccumulator, ContactSample};
use super::ground::{classify, SurfaceThresholds};
use super::jump::try_jump;
use super::state::{KinematicState, SurfaceClassification, TickFrame, TickInput, TickOutput};
use super::velocity::{adjust_velocity, input_right_axis};

/// Character locomotion controller.
///
/// Owns the persistent [`KinematicState`] of exactly one character. Each tick:
/// - Accumulates contacts into a fresh [`ContactAccumulator`]
/// - Classifies the surface (with ground snapping)
/// - Accelerates along the slope-aware control axis
/// - Consumes the jump request
///
/// # Example
///
/// ```ignore
/// let mut controller = LocomotionController::new(LocomotionConfig::default());
///
/// // Each fixed tick:
/// let output = controller.tick(&frame, &contacts, &input, &world);
/// body.set_velocity(output.velocity);
/// ```
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    thresholds: SurfaceThresholds,
    state: KinematicState,
}

impl LocomotionController {
    /// Create a new controller. The configuration is clamped into range.
    pub fn new(config: LocomotionConfig) -> Self {
        let config = config.sanitized();
        let thresholds = SurfaceThresholds::from_config(&config);
        Self {
            config,
            thresholds,
            state: KinematicState::default(),
        }
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(LocomotionConfig::default())
    }

    /// Current (sanitized) configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Replace the configuration, re-deriving the slope thresholds.
    pub fn set_config(&mut self, config: LocomotionConfig) {
        self.config = config.sanitized();
        self.thresholds = SurfaceThresholds::from_config(&self.config);
    }

    /// Slope thresholds derived from the configuration.
    pub fn thresholds(&self) -> &SurfaceThresholds {
        &self.thresholds
    }

    /// Persistent locomotion state.
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Forget all locomotion history (respawn).
    pub fn reset(&mut self) {
        self.state = KinematicState::default();
    }

    /// Run one fixed tick.
    ///
    /// All contacts of the tick must be in `contacts`; classification never
    /// runs on a partial set.
    ///
    /// # Arguments
    ///
    /// * `frame` - Gravity, body position/velocity and tick duration
    /// * `contacts` - Every contact active during this tick
    /// * `input` - Input latched for this tick
    /// * `probe` - Ray query used for ground snapping
    pub fn tick<P: GroundProbe + ?Sized>(
        &mut self,
        frame: &TickFrame,
        contacts: &[ContactSample],
        input: &TickInput,
        probe: &P,
    ) -> TickOutput {
        let state = &mut self.state;

        // Gravity may change direction between ticks.
        state.up_axis = (-frame.gravity).try_normalize().unwrap_or(state.up_axis);
        state.velocity = frame.velocity;
        state.desired_velocity = input.move_axis * self.config.max_velocity;

        let mut accumulated = ContactAccumulator::begin();
        accumulated.extend(contacts, state.up_axis, &self.thresholds);

        let check = classify(
            state,
            &mut accumulated,
            frame.position,
            probe,
            &self.config,
            &self.thresholds,
        );

        // Horizontal control
        let acceleration = if accumulated.on_ground() {
            self.config.max_acceleration
        } else {
            self.config.max_air_acceleration
        };
        let right_axis = input_right_axis(input.input_right, state.up_axis);
        adjust_velocity(
            &mut state.velocity,
            right_axis,
            accumulated.contact_normal,
            state.desired_velocity.x,
            acceleration,
            frame.delta_time,
        );

        // The request is consumed whether or not it is granted.
        let jumped = input.jump_requested
            && try_jump(state, &accumulated, frame.gravity, &self.config).is_some();

        state.surface = check.surface;
        state.contact_normal = accumulated.contact_normal;
        state.steep_normal = accumulated.steep_normal;

        log::trace!(
            "tick: surface={:?} ground={} steep={} snapped={} jumped={} velocity={:?}",
            check.surface,
            accumulated.ground_contact_count,
            accumulated.steep_contact_count,
            check.snapped,
            jumped,
            state.velocity
        );

        TickOutput {
            velocity: state.velocity,
            surface: check.surface,
            contact_normal: accumulated.contact_normal,
            snapped: check.snapped,
            jumped,
        }
    }

    /// Check if the last tick left the character grounded.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.state.surface == SurfaceClassification::Grounded
    }

    /// Up axis of the last tick.
    #[inline]
    pub fn up_axis(&self) -> Vec3 {
        self.state.up_axis
    }
}

// ============================================================================
// Tests
// ============================================================================
