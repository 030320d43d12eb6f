//! Discrete locomotion actions.
//!
//! - [`LocomotionStateId`]: Idle, Move, Jump, Guard, Slide, Roll
//! - [`LocomotionStateMachine`]: transition rules on the frame and tick clocks
//! - [`PoseScheduler`]: timed pose changes for Slide and Roll
//! - [`LocomotionSignals`]: animation flags and overlay text

mod machine;
mod pose;
mod signals;
mod state;

pub use machine::{
    seconds_to_ms, ActionTimings, FrameMillis, LocomotionStateMachine, LogicContext,
    PhysicsContext, INPUT_DEADZONE,
};
pub use pose::{FiredRestore, Pose, PoseScheduler};
pub use signals::{
    grounded_text, state_text, LocomotionSignals, LogSignals, NullSignals, RecordingSignals,
    SignalEvent,
};
pub use state::LocomotionStateId;
