//! Ledgerun Locomotion Physics
//!
//! A fixed-tick character locomotion controller. Every simulation tick the
//! controller classifies the contacts reported by the physics engine, snaps
//! the character back onto ground it only just lost, accelerates it along a
//! slope-aware control axis, and applies jump impulses (including a limited
//! budget of air jumps).
//!
//! # Architecture
//!
//! - **Collision**: layer masks, the [`GroundProbe`] ray query and a small
//!   static [`CollisionWorld`] that implements it
//! - **Movement**: contact accumulation, ground classification, snapping,
//!   velocity solving and jumping, driven by [`LocomotionController`]
//!
//! # Design Principles
//!
//! 1. **Order independence**: contacts are summed, so delivery order within a
//!    tick never changes the result
//! 2. **Arbitrary gravity**: every test is made against an up axis derived
//!    from the gravity vector of the current tick
//! 3. **Silent fallbacks**: failed snaps and ineligible jumps are no-ops, not
//!    errors

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{CollisionWorld, GroundProbe, LayerMask, NoGround, ProbeHit};
pub use movement::{
    ConfigError, ContactAccumulator, ContactSample, KinematicState, LocomotionConfig,
    LocomotionController, SurfaceClassification, SurfaceThresholds, TickFrame, TickInput,
    TickOutput,
};
