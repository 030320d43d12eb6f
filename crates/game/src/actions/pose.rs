//! Deferred pose restoration for timed actions.
//!
//! Entering Slide or Roll tips the character over and schedules the upright
//! pose to come back after a fixed duration. Restorations run on the frame
//! clock and fire exactly once. Whatever happened in between is reconciled at
//! fire time: a restoration only touches the pose if its entry still owns it.

use serde::{Deserialize, Serialize};

use super::state::LocomotionStateId;

/// Body pose (orientation and hitbox) of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pose {
    #[default]
    Upright,
    /// Lying along the move direction.
    Sliding,
    /// Tucked sideways.
    Rolling,
}

/// A scheduled restoration that has not fired yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRestore {
    entry: u64,
    epoch: u32,
    state: LocomotionStateId,
    remaining_ms: u32,
}

/// A restoration that fired during [`PoseScheduler::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredRestore {
    /// Entry id returned by [`PoseScheduler::begin`].
    pub entry: u64,
    /// State that scheduled the restoration.
    pub state: LocomotionStateId,
    /// Whether the pose was actually restored (the entry still owned it).
    pub pose_restored: bool,
}

/// Owns the current pose and the pending restorations.
#[derive(Debug, Clone, Default)]
pub struct PoseScheduler {
    pose: Pose,
    /// Entry that applied the current non-upright pose.
    owner: Option<u64>,
    next_entry: u64,
    epoch: u32,
    pending: Vec<PendingRestore>,
}

impl PoseScheduler {
    /// Upright, with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Entry owning the current pose, if it is not upright.
    pub fn owner(&self) -> Option<u64> {
        self.owner
    }

    /// Number of restorations still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply `pose` and schedule its restoration after `duration_ms`.
    ///
    /// Returns the entry id of this activation.
    pub fn begin(&mut self, pose: Pose, state: LocomotionStateId, duration_ms: u32) -> u64 {
        self.next_entry += 1;
        let entry = self.next_entry;

        self.pose = pose;
        self.owner = Some(entry);
        self.pending.push(PendingRestore {
            entry,
            epoch: self.epoch,
            state,
            remaining_ms: duration_ms,
        });

        log::debug!("pose {:?} applied by {} entry {} for {}ms", pose, state, entry, duration_ms);
        entry
    }

    /// Advance the pending timers by one frame.
    ///
    /// Returns the restorations that fired, oldest first.
    pub fn advance(&mut self, delta_time_ms: u32) -> Vec<FiredRestore> {
        let epoch = self.epoch;
        let mut fired = Vec::new();

        // Anything scheduled before the last reset is dropped unseen.
        self.pending.retain(|p| p.epoch == epoch);

        for pending in &mut self.pending {
            pending.remaining_ms = pending.remaining_ms.saturating_sub(delta_time_ms);
        }

        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].remaining_ms > 0 {
                i += 1;
                continue;
            }
            let done = self.pending.remove(i);
            let pose_restored = self.owner == Some(done.entry);
            if pose_restored {
                self.pose = Pose::Upright;
                self.owner = None;
            }
            log::debug!(
                "pose restoration for {} entry {} fired (restored={})",
                done.state,
                done.entry,
                pose_restored
            );
            fired.push(FiredRestore {
                entry: done.entry,
                state: done.state,
                pose_restored,
            });
        }

        fired
    }

    /// Tear down: stand upright and invalidate every pending restoration.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pose = Pose::Upright;
        self.owner = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
