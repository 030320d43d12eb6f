//! Fixed-tick character locomotion.
//!
//! This module implements the per-tick pipeline:
//!
//! - Contact accumulation into ground and steep sums
//! - Ground classification with slope and stairs thresholds
//! - Snap-to-ground when contact was lost only this tick
//! - Slope-aware horizontal acceleration
//! - Jump impulses with an air-jump budget
//!
//! # Design
//!
//! [`LocomotionController`] owns the persistent [`KinematicState`] of one
//! character. Transient contact data lives in a [`ContactAccumulator`] that is
//! created at the start of each tick and dropped at its end.

mod config;
mod contact;
mod controller;
mod ground;
mod jump;
mod state;
mod velocity;

pub use config::{ConfigError, LocomotionConfig};
pub use contact::{ContactAccumulator, ContactKind, ContactSample, STEEP_MIN_UP_DOT};
pub use controller::LocomotionController;
pub use ground::{classify, snap_to_ground, GroundCheck, SurfaceThresholds};
pub use jump::{jump_speed, try_jump, JumpKind, JumpOutcome};
pub use state::{KinematicState, SurfaceClassification, TickFrame, TickInput, TickOutput};
pub use velocity::{adjust_velocity, input_right_axis, move_toward, project_direction_on_plane};
