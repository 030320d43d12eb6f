//! Discrete locomotion states.

use serde::{Deserialize, Serialize};

/// Discrete action state layered on top of the continuous motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionStateId {
    #[default]
    Idle,
    Move,
    /// Jumping or otherwise airborne.
    Jump,
    Guard,
    /// Timed slide out of a run.
    Slide,
    /// Timed roll out of a guard.
    Roll,
}

impl LocomotionStateId {
    /// All states, in declaration order.
    pub const ALL: [LocomotionStateId; 6] = [
        Self::Idle,
        Self::Move,
        Self::Jump,
        Self::Guard,
        Self::Slide,
        Self::Roll,
    ];

    /// Display name, also used as the animation flag key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Move => "Move",
            Self::Jump => "Jump",
            Self::Guard => "Guard",
            Self::Slide => "Slide",
            Self::Roll => "Roll",
        }
    }

    /// Slide and roll end on their own timer, never on input.
    #[inline]
    pub fn is_timed(self) -> bool {
        matches!(self, Self::Slide | Self::Roll)
    }
}

impl std::fmt::Display for LocomotionStateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
