//! Locomotion action state machine.
//!
//! Runs on both clocks:
//! - `logic_update` once per frame with the latched input and the surface of
//!   the previous tick
//! - `physics_update` once per fixed tick with that tick's result
//!
//! All transitions go through [`LocomotionStateMachine::change_state`], which
//! is the only place `exit` and `enter` are dispatched.

use glam::Vec2;
use ledgerun_physics::{LocomotionConfig, SurfaceClassification};
use serde::{Deserialize, Serialize};

use super::pose::{FiredRestore, Pose, PoseScheduler};
use super::signals::LocomotionSignals;
use super::state::LocomotionStateId;

/// Input magnitude below which the stick counts as released.
pub const INPUT_DEADZONE: f32 = 0.001;

/// Durations of the timed actions, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTimings {
    pub guard_ms: u32,
    pub slide_ms: u32,
    pub roll_ms: u32,
}

impl ActionTimings {
    /// Convert the second-based durations of a configuration.
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            guard_ms: seconds_to_ms(config.guard_duration),
            slide_ms: seconds_to_ms(config.slide_duration),
            roll_ms: seconds_to_ms(config.roll_duration),
        }
    }
}

impl Default for ActionTimings {
    fn default() -> Self {
        Self::from_config(&LocomotionConfig::default())
    }
}

/// Convert seconds to whole milliseconds, treating negatives and NaN as zero.
pub fn seconds_to_ms(seconds: f32) -> u32 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u32
    } else {
        0
    }
}

/// Frame clock in whole milliseconds.
///
/// Frame durations rarely land on a millisecond boundary. The fractional part
/// of each frame is carried into the next one, so short frames still add up
/// and long runs do not drift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMillis {
    carry_ms: f64,
}

impl FrameMillis {
    /// A clock with no carried fraction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds elapsed by a frame of `seconds`.
    ///
    /// Negative and non-finite durations count as zero.
    pub fn advance(&mut self, seconds: f32) -> u32 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        let total = self.carry_ms + f64::from(seconds) * 1000.0;
        let whole = total.floor();
        self.carry_ms = total - whole;
        whole.min(f64::from(u32::MAX)) as u32
    }

    /// Drop the carried fraction.
    pub fn reset(&mut self) {
        self.carry_ms = 0.0;
    }
}

/// What the frame pass sees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogicContext {
    /// The last completed tick left the character standing on ground.
    pub grounded: bool,
    /// Latched move vector.
    pub move_axis: Vec2,
    /// Guard went from released to pressed this frame.
    pub guard_pressed: bool,
    /// Guard is currently held.
    pub guard_held: bool,
    /// A jump request is waiting for the next tick.
    pub jump_requested: bool,
    /// Frame duration in milliseconds, from a [`FrameMillis`] clock.
    pub delta_time_ms: u32,
}

impl LogicContext {
    /// Only the horizontal axis drives locomotion.
    #[inline]
    fn has_move_input(&self) -> bool {
        self.move_axis.x.abs() > INPUT_DEADZONE
    }
}

/// What the tick pass sees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsContext {
    /// Surface classification decided by this tick.
    pub surface: SurfaceClassification,
    /// This tick consumed a jump request (granted or not).
    pub jump_consumed: bool,
    /// This tick applied a jump impulse.
    pub jumped: bool,
}

impl PhysicsContext {
    /// Grounded and not launching off the ground this tick.
    #[inline]
    pub fn standing(&self) -> bool {
        self.surface.is_grounded() && !self.jumped
    }
}

/// Discrete locomotion state machine.
#[derive(Debug, Clone)]
pub struct LocomotionStateMachine {
    current: LocomotionStateId,
    timings: ActionTimings,
    pose: PoseScheduler,
    /// Pose entry of the active Slide or Roll.
    active_entry: Option<u64>,
    guard_elapsed_ms: u32,
    frames_in_state: u32,
    shown_grounded: Option<bool>,
}

impl LocomotionStateMachine {
    /// Create a machine in `Idle`. Call [`start`](Self::start) before the
    /// first frame so the initial state is announced.
    pub fn new(timings: ActionTimings) -> Self {
        Self {
            current: LocomotionStateId::Idle,
            timings,
            pose: PoseScheduler::new(),
            active_entry: None,
            guard_elapsed_ms: 0,
            frames_in_state: 0,
            shown_grounded: None,
        }
    }

    /// Announce the initial state.
    pub fn start(&mut self, signals: &mut dyn LocomotionSignals) {
        self.enter(self.current, signals);
    }

    /// Active state.
    pub fn current(&self) -> LocomotionStateId {
        self.current
    }

    /// Current body pose.
    pub fn pose(&self) -> Pose {
        self.pose.pose()
    }

    /// Frames spent in the active state.
    pub fn frames_in_state(&self) -> u32 {
        self.frames_in_state
    }

    /// Durations used for new Guard, Slide and Roll entries.
    pub fn timings(&self) -> &ActionTimings {
        &self.timings
    }

    /// Replace the action durations. Already scheduled restorations keep theirs.
    pub fn set_timings(&mut self, timings: ActionTimings) {
        self.timings = timings;
    }

    /// Frame pass.
    pub fn logic_update(&mut self, ctx: &LogicContext, signals: &mut dyn LocomotionSignals) {
        for fired in self.pose.advance(ctx.delta_time_ms) {
            self.reconcile(fired, ctx, signals);
        }

        self.frames_in_state = self.frames_in_state.saturating_add(1);
        if self.current == LocomotionStateId::Guard {
            self.guard_elapsed_ms = self.guard_elapsed_ms.saturating_add(ctx.delta_time_ms);
        }

        let next = self.decide(ctx);
        if next != self.current {
            self.change_state(next, signals);
        }

        self.observe_grounded(ctx.grounded, signals);
    }

    /// Tick pass.
    pub fn physics_update(&mut self, ctx: &PhysicsContext, signals: &mut dyn LocomotionSignals) {
        if ctx.jump_consumed && self.current != LocomotionStateId::Jump {
            self.change_state(LocomotionStateId::Jump, signals);
        }
        self.observe_grounded(ctx.standing(), signals);
    }

    /// Back to `Idle`, upright, with every pending restoration invalidated.
    pub fn reset(&mut self, signals: &mut dyn LocomotionSignals) {
        self.pose.reset();
        self.active_entry = None;
        self.change_state(LocomotionStateId::Idle, signals);
        self.guard_elapsed_ms = 0;
    }

    /// Transition rules for the frame pass.
    fn decide(&self, ctx: &LogicContext) -> LocomotionStateId {
        use LocomotionStateId::*;

        let moving = ctx.has_move_input();
        let grounded = ctx.grounded;

        let mut next = match self.current {
            Idle if moving && grounded => Move,
            Move if !moving && grounded => Idle,
            Jump if grounded => {
                if moving {
                    Move
                } else {
                    Idle
                }
            }
            Guard if moving && grounded => Roll,
            Guard if !ctx.guard_held || self.guard_elapsed_ms >= self.timings.guard_ms => Idle,
            state => state,
        };

        if ctx.guard_pressed {
            next = match next {
                Move => Slide,
                Idle => Guard,
                other => other,
            };
        }

        // Sticky: airborne always reads as Jump, even mid-slide.
        if ctx.jump_requested || !grounded {
            next = Jump;
        }

        next
    }

    /// End a Slide or Roll whose restoration fired, if it is still the one
    /// running.
    fn reconcile(
        &mut self,
        fired: FiredRestore,
        ctx: &LogicContext,
        signals: &mut dyn LocomotionSignals,
    ) {
        if self.active_entry != Some(fired.entry) || self.current != fired.state {
            return;
        }
        let next = if ctx.has_move_input() {
            LocomotionStateId::Move
        } else {
            LocomotionStateId::Idle
        };
        self.change_state(next, signals);
    }

    /// Single dispatch point for transitions.
    fn change_state(&mut self, next: LocomotionStateId, signals: &mut dyn LocomotionSignals) {
        let previous = self.current;
        self.exit(previous, signals);
        self.current = next;
        self.frames_in_state = 0;
        self.enter(next, signals);
        log::debug!("locomotion state {} -> {}", previous, next);
    }

    fn enter(&mut self, state: LocomotionStateId, signals: &mut dyn LocomotionSignals) {
        signals.set_animation_flag(state.name(), true);
        signals.show_state(state.name());

        match state {
            LocomotionStateId::Guard => {
                self.guard_elapsed_ms = 0;
            }
            LocomotionStateId::Slide => {
                self.active_entry =
                    Some(self.pose.begin(Pose::Sliding, state, self.timings.slide_ms));
            }
            LocomotionStateId::Roll => {
                self.active_entry =
                    Some(self.pose.begin(Pose::Rolling, state, self.timings.roll_ms));
            }
            LocomotionStateId::Idle | LocomotionStateId::Move | LocomotionStateId::Jump => {}
        }
    }

    fn exit(&mut self, state: LocomotionStateId, signals: &mut dyn LocomotionSignals) {
        signals.set_animation_flag(state.name(), false);

        // The pose stays until its own restoration fires.
        if state.is_timed() {
            self.active_entry = None;
        }
    }

    fn observe_grounded(&mut self, grounded: bool, signals: &mut dyn LocomotionSignals) {
        if self.shown_grounded != Some(grounded) {
            self.shown_grounded = Some(grounded);
            signals.show_grounded(grounded);
        }
    }
}

impl Default for LocomotionStateMachine {
    fn default() -> Self {
        Self::new(ActionTimings::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::signals::{NullSignals, RecordingSignals};
    use LocomotionStateId::*;

    const FRAME_MS: u32 = 16;

    fn timings() -> ActionTimings {
        ActionTimings {
            guard_ms: 100,
            slide_ms: 64,
            roll_ms: 48,
        }
    }

    fn grounded(move_x: f32) -> LogicContext {
        LogicContext {
            grounded: true,
            move_axis: Vec2::new(move_x, 0.0),
            delta_time_ms: FRAME_MS,
            ..Default::default()
        }
    }

    fn machine_in(state: LocomotionStateId) -> LocomotionStateMachine {
        let mut machine = LocomotionStateMachine::new(timings());
        machine.current = state;
        machine
    }

    #[test]
    fn test_seconds_to_ms() {
        assert_eq!(seconds_to_ms(2.0), 2000);
        assert_eq!(seconds_to_ms(0.0166), 17);
        assert_eq!(seconds_to_ms(-1.0), 0);
        assert_eq!(seconds_to_ms(f32::NAN), 0);
    }

    #[test]
    fn test_frame_millis_carries_fraction() {
        let mut clock = FrameMillis::new();
        let total: u32 = (0..2500).map(|_| clock.advance(0.0004)).sum();
        assert!((999..=1000).contains(&total), "total={}", total);

        let mut clock = FrameMillis::new();
        let frames: Vec<u32> = (0..60).map(|_| clock.advance(1.0 / 60.0)).collect();
        assert!(frames.iter().all(|&ms| ms == 16 || ms == 17));
        let total: u32 = frames.iter().sum();
        assert!((999..=1000).contains(&total), "total={}", total);

        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
    }

    #[test]
    fn test_vertical_stick_stays_idle() {
        let mut machine = machine_in(Idle);
        let ctx = LogicContext {
            move_axis: Vec2::new(0.0, 1.0),
            ..grounded(0.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Idle);

        let mut machine = machine_in(Guard);
        let ctx = LogicContext {
            guard_held: true,
            move_axis: Vec2::new(0.0, -1.0),
            ..grounded(0.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Guard);
    }

    #[test]
    fn test_roll_ends_idle_with_vertical_stick() {
        let mut machine = machine_in(Guard);
        let mut signals = NullSignals;
        machine.logic_update(&grounded(1.0), &mut signals);
        assert_eq!(machine.current(), Roll);

        let vertical = LogicContext {
            move_axis: Vec2::new(0.0, 1.0),
            ..grounded(0.0)
        };
        for _ in 0..3 {
            machine.logic_update(&vertical, &mut signals);
        }
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn test_idle_to_move_and_back() {
        let mut machine = machine_in(Idle);
        let mut signals = NullSignals;

        machine.logic_update(&grounded(1.0), &mut signals);
        assert_eq!(machine.current(), Move);

        machine.logic_update(&grounded(0.0), &mut signals);
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn test_deadzone_input_stays_idle() {
        let mut machine = machine_in(Idle);
        machine.logic_update(&grounded(0.0005), &mut NullSignals);
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn test_airborne_forces_jump_from_every_state() {
        for state in LocomotionStateId::ALL {
            let mut machine = machine_in(state);
            let ctx = LogicContext {
                grounded: false,
                delta_time_ms: FRAME_MS,
                ..Default::default()
            };
            machine.logic_update(&ctx, &mut NullSignals);
            assert_eq!(machine.current(), Jump, "from {}", state);
        }
    }

    #[test]
    fn test_jump_request_forces_jump_while_grounded() {
        let mut machine = machine_in(Move);
        let ctx = LogicContext {
            jump_requested: true,
            ..grounded(1.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Jump);
    }

    #[test]
    fn test_landing() {
        let mut machine = machine_in(Jump);
        machine.logic_update(&grounded(0.0), &mut NullSignals);
        assert_eq!(machine.current(), Idle);

        let mut machine = machine_in(Jump);
        machine.logic_update(&grounded(-1.0), &mut NullSignals);
        assert_eq!(machine.current(), Move);
    }

    #[test]
    fn test_guard_edge_from_idle_and_move() {
        let mut machine = machine_in(Idle);
        let ctx = LogicContext {
            guard_pressed: true,
            guard_held: true,
            ..grounded(0.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Guard);
        assert_eq!(machine.pose(), Pose::Upright);

        let mut machine = machine_in(Move);
        let ctx = LogicContext {
            guard_pressed: true,
            guard_held: true,
            ..grounded(1.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Slide);
        assert_eq!(machine.pose(), Pose::Sliding);
    }

    #[test]
    fn test_guard_released_returns_to_idle() {
        let mut machine = machine_in(Guard);
        machine.logic_update(&grounded(0.0), &mut NullSignals);
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn test_guard_times_out() {
        let mut machine = machine_in(Guard);
        let held = LogicContext {
            guard_held: true,
            ..grounded(0.0)
        };

        // 100ms budget: six 16ms frames stay, the seventh drops.
        for _ in 0..6 {
            machine.logic_update(&held, &mut NullSignals);
            assert_eq!(machine.current(), Guard);
        }
        machine.logic_update(&held, &mut NullSignals);
        assert_eq!(machine.current(), Idle);

        // Still held: no new edge, so no new guard.
        machine.logic_update(&held, &mut NullSignals);
        assert_eq!(machine.current(), Idle);
    }

    #[test]
    fn test_guard_to_roll_with_input() {
        let mut machine = machine_in(Guard);
        let ctx = LogicContext {
            guard_held: true,
            ..grounded(1.0)
        };
        machine.logic_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Roll);
        assert_eq!(machine.pose(), Pose::Rolling);
    }

    #[test]
    fn test_slide_ignores_input_until_timer() {
        let mut machine = machine_in(Move);
        let mut signals = NullSignals;
        let start = LogicContext {
            guard_pressed: true,
            guard_held: true,
            ..grounded(1.0)
        };
        machine.logic_update(&start, &mut signals);
        assert_eq!(machine.current(), Slide);

        // 64ms: frames at 16, 32, 48 keep sliding regardless of input.
        machine.logic_update(&grounded(0.0), &mut signals);
        machine.logic_update(&grounded(1.0), &mut signals);
        machine.logic_update(&grounded(0.0), &mut signals);
        assert_eq!(machine.current(), Slide);

        machine.logic_update(&grounded(0.0), &mut signals);
        assert_eq!(machine.current(), Idle);
        assert_eq!(machine.pose(), Pose::Upright);
    }

    #[test]
    fn test_roll_ends_in_move_when_input_held() {
        let mut machine = machine_in(Guard);
        let mut signals = NullSignals;
        machine.logic_update(&grounded(1.0), &mut signals);
        assert_eq!(machine.current(), Roll);

        for _ in 0..3 {
            machine.logic_update(&grounded(1.0), &mut signals);
        }
        assert_eq!(machine.current(), Move);
        assert_eq!(machine.pose(), Pose::Upright);
    }

    #[test]
    fn test_forced_jump_keeps_pose_until_timer() {
        let mut machine = machine_in(Move);
        let mut signals = NullSignals;
        let start = LogicContext {
            guard_pressed: true,
            guard_held: true,
            ..grounded(1.0)
        };
        machine.logic_update(&start, &mut signals);
        assert_eq!(machine.current(), Slide);

        let airborne = LogicContext {
            grounded: false,
            delta_time_ms: FRAME_MS,
            ..Default::default()
        };
        machine.logic_update(&airborne, &mut signals);
        assert_eq!(machine.current(), Jump);
        assert_eq!(machine.pose(), Pose::Sliding);

        for _ in 0..3 {
            machine.logic_update(&airborne, &mut signals);
        }
        // Restored, but the state was not pulled out of Jump.
        assert_eq!(machine.pose(), Pose::Upright);
        assert_eq!(machine.current(), Jump);
    }

    #[test]
    fn test_physics_pass_jump_consumed() {
        let mut machine = machine_in(Move);
        let ctx = PhysicsContext {
            surface: SurfaceClassification::Grounded,
            jump_consumed: true,
            jumped: true,
        };
        let mut signals = RecordingSignals::new();
        machine.physics_update(&ctx, &mut signals);
        assert_eq!(machine.current(), Jump);
        assert_eq!(signals.last_grounded(), Some(false));
    }

    #[test]
    fn test_dropped_jump_still_forces_jump_state() {
        let mut machine = machine_in(Idle);
        let ctx = PhysicsContext {
            surface: SurfaceClassification::Airborne,
            jump_consumed: true,
            jumped: false,
        };
        machine.physics_update(&ctx, &mut NullSignals);
        assert_eq!(machine.current(), Jump);
    }

    #[test]
    fn test_enter_exit_flags() {
        let mut machine = LocomotionStateMachine::new(timings());
        let mut signals = RecordingSignals::new();
        machine.start(&mut signals);
        assert_eq!(signals.flag("Idle"), Some(true));

        machine.logic_update(&grounded(1.0), &mut signals);
        assert_eq!(signals.flag("Idle"), Some(false));
        assert_eq!(signals.flag("Move"), Some(true));
        assert_eq!(signals.shown_states(), vec!["Idle", "Move"]);
    }

    #[test]
    fn test_grounded_shown_on_change_only() {
        let mut machine = machine_in(Idle);
        let mut signals = RecordingSignals::new();

        machine.logic_update(&grounded(0.0), &mut signals);
        machine.logic_update(&grounded(0.0), &mut signals);
        let shown = signals
            .events
            .iter()
            .filter(|e| matches!(e, crate::actions::SignalEvent::Grounded(_)))
            .count();
        assert_eq!(shown, 1);
        assert_eq!(signals.last_grounded(), Some(true));
    }

    #[test]
    fn test_reset_invalidates_slide() {
        let mut machine = machine_in(Move);
        let mut signals = NullSignals;
        let start = LogicContext {
            guard_pressed: true,
            guard_held: true,
            ..grounded(1.0)
        };
        machine.logic_update(&start, &mut signals);
        machine.reset(&mut signals);

        assert_eq!(machine.current(), Idle);
        assert_eq!(machine.pose(), Pose::Upright);

        for _ in 0..10 {
            machine.logic_update(&grounded(0.0), &mut signals);
        }
        assert_eq!(machine.current(), Idle);
    }
}
