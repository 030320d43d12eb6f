//! Ledgerun Game Logic
//!
//! This crate layers the discrete action state machine over the physics
//! crate's locomotion controller and drives both on their own clocks:
//!
//! - Input sampling and latching (frame clock)
//! - Idle / Move / Jump / Guard / Slide / Roll actions with timed poses
//! - The fixed-tick locomotion pipeline and the physics body hand-off
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Character                            │
//! │  ┌──────────┐  frame   ┌───────────────┐   signals           │
//! │  │ Input    │─────────►│ State machine │──────────► animator │
//! │  │ latch    │          └───────────────┘                     │
//! │  └────┬─────┘                  ▲ surface                     │
//! │       │ tick input     ┌───────┴────────┐  velocity          │
//! │       └───────────────►│ Locomotion     │──────────► body    │
//! │            contacts ──►│ controller     │                    │
//! │                        └────────────────┘                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod body;
pub mod character;
pub mod input;
pub mod sandbox;
pub mod simulation;

// Re-export main types
pub use actions::{
    LocomotionSignals, LocomotionStateId, LocomotionStateMachine, LogSignals, NullSignals, Pose,
    RecordingSignals,
};
pub use body::{ContactBatch, PhysicsBody};
pub use character::{Character, CharacterBuilder, SetupError};
pub use input::{InputCell, InputLatch, InputSource, RawInput};
pub use sandbox::SandboxBody;
pub use simulation::{FrameReport, Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use ledgerun_physics::{
    CollisionWorld, ContactSample, LocomotionConfig, LocomotionController, SurfaceClassification,
};
