//! End-to-end locomotion through the simulation driver and the sandbox body.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use ledgerun_game::{
    Character, CollisionWorld, InputCell, LocomotionConfig, LocomotionSignals, LocomotionStateId,
    Pose, RawInput, RecordingSignals, SandboxBody, Simulation, SimulationConfig,
};

const FRAME: f32 = 0.02;

/// Recording sink the test keeps a handle to.
#[derive(Clone, Default)]
struct SharedSignals(Rc<RefCell<RecordingSignals>>);

impl LocomotionSignals for SharedSignals {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        self.0.borrow_mut().set_animation_flag(name, value);
    }

    fn show_state(&mut self, name: &str) {
        self.0.borrow_mut().show_state(name);
    }

    fn show_grounded(&mut self, grounded: bool) {
        self.0.borrow_mut().show_grounded(grounded);
    }
}

struct Harness {
    sim: Simulation<SandboxBody>,
    input: InputCell,
    signals: SharedSignals,
}

impl Harness {
    fn new(config: LocomotionConfig, world: CollisionWorld) -> Self {
        let input = InputCell::new();
        let signals = SharedSignals::default();
        let character = Character::builder()
            .config(config)
            .body(SandboxBody::new(world, Vec3::new(0.0, 0.5, 0.0)))
            .input(input.clone())
            .signals(signals.clone())
            .build()
            .expect("wired");
        let mut harness = Self {
            sim: Simulation::new(SimulationConfig::default(), character),
            input,
            signals,
        };
        harness.frames(10);
        harness
    }

    fn frames(&mut self, count: u32) {
        self.sim.run(count, FRAME);
    }

    /// Apply `input` for exactly one frame, then `after` from then on.
    fn tap(&mut self, input: RawInput, after: RawInput) {
        self.input.set(input);
        self.frames(1);
        self.input.set(after);
    }

    /// Run until `done` holds. Returns the number of frames run.
    fn run_until(&mut self, max_frames: u32, done: impl Fn(&Character<SandboxBody>) -> bool) -> u32 {
        for n in 1..=max_frames {
            self.frames(1);
            if done(self.sim.character()) {
                return n;
            }
        }
        panic!("condition not reached in {} frames", max_frames);
    }

    fn state(&self) -> LocomotionStateId {
        self.sim.character().state()
    }

    fn pose(&self) -> Pose {
        self.sim.character().pose()
    }
}

/// Floor long enough to run on for several seconds.
fn long_floor() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(500.0, 0.5, 5.0), 0);
    world
}

fn jump_press() -> RawInput {
    RawInput {
        jump: true,
        ..Default::default()
    }
}

fn guard_press(move_x: f32) -> RawInput {
    RawInput {
        guard: 1.0,
        ..RawInput::moving(move_x)
    }
}

#[test]
fn test_settles_into_idle() {
    let h = Harness::new(LocomotionConfig::default(), long_floor());
    assert_eq!(h.state(), LocomotionStateId::Idle);
    assert!(h.sim.character().on_ground());

    let signals = h.signals.0.borrow();
    assert_eq!(signals.last_grounded(), Some(true));
    assert_eq!(signals.flag("Idle"), Some(true));
}

#[test]
fn test_run_accelerates_within_bounds() {
    let mut h = Harness::new(LocomotionConfig::default(), long_floor());
    h.input.set(RawInput::moving(1.0));

    let mut previous = h.sim.character().velocity().x;
    for _ in 0..30 {
        let report = h.sim.advance(FRAME);
        let current = h.sim.character().velocity().x;
        let budget = 10.0 * FRAME * report.ticks as f32 + 1e-3;
        assert!(current - previous <= budget, "dv={}", current - previous);
        previous = current;
    }

    assert_eq!(h.state(), LocomotionStateId::Move);
    assert!(previous > 4.0, "vx={}", previous);

    h.input.set(RawInput::default());
    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Idle);
}

#[test]
fn test_jump_reaches_height_and_lands_idle() {
    let mut h = Harness::new(LocomotionConfig::default(), long_floor());
    h.signals.0.borrow_mut().clear();

    // Holding the button jumps exactly once.
    h.input.set(jump_press());
    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Jump);

    let mut peak: f32 = 0.0;
    let frames = h.run_until(200, |c| {
        c.on_ground() && c.velocity().y.abs() < 1e-3 && c.position().y < 0.6
    });
    assert!(frames > 40, "landed after {} frames", frames);

    // Re-run the arc with tracking.
    h.input.set(RawInput::default());
    h.frames(2);
    h.tap(jump_press(), RawInput::default());
    for _ in 0..100 {
        h.frames(1);
        peak = peak.max(h.sim.character().position().y);
    }
    assert!(peak > 2.2 && peak < 2.7, "peak={}", peak);

    assert_eq!(h.state(), LocomotionStateId::Idle);
    let signals = h.signals.0.borrow();
    assert_eq!(signals.flag("Jump"), Some(false));
    assert!(signals.shown_states().contains(&"Jump"));
}

#[test]
fn test_air_jump_budget() {
    let config = LocomotionConfig {
        max_air_jumps: 1,
        ..Default::default()
    };
    let mut h = Harness::new(config, long_floor());

    h.tap(jump_press(), RawInput::default());
    h.frames(10);
    assert_eq!(h.sim.character().controller().state().jump_phase, 1);

    h.tap(jump_press(), RawInput::default());
    h.frames(2);
    assert_eq!(h.sim.character().controller().state().jump_phase, 2);
    assert!(h.sim.character().velocity().y > 5.0);

    h.frames(10);
    let before = h.sim.character().velocity().y;
    h.tap(jump_press(), RawInput::default());
    h.frames(1);
    assert_eq!(h.sim.character().controller().state().jump_phase, 2);
    assert!(h.sim.character().velocity().y < before);
    assert_eq!(h.state(), LocomotionStateId::Jump);
}

#[test]
fn test_slide_ends_after_its_duration() {
    let config = LocomotionConfig {
        slide_duration: 0.2,
        ..Default::default()
    };
    let mut h = Harness::new(config, long_floor());
    h.input.set(RawInput::moving(1.0));
    h.frames(5);
    assert_eq!(h.state(), LocomotionStateId::Move);

    h.tap(guard_press(1.0), RawInput::default());
    assert_eq!(h.state(), LocomotionStateId::Slide);
    assert_eq!(h.pose(), Pose::Sliding);

    // Releasing the stick does not end the slide early.
    h.frames(9);
    assert_eq!(h.state(), LocomotionStateId::Slide);

    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Idle);
    assert_eq!(h.pose(), Pose::Upright);
}

#[test]
fn test_timed_actions_end_at_sub_millisecond_frames() {
    let config = LocomotionConfig {
        slide_duration: 0.2,
        guard_duration: 0.1,
        ..Default::default()
    };
    let mut h = Harness::new(config, long_floor());
    h.input.set(RawInput::moving(1.0));
    h.frames(5);

    h.tap(guard_press(1.0), RawInput::default());
    assert_eq!(h.state(), LocomotionStateId::Slide);

    // 2000 frames of 0.4ms cover 0.8s, four times the slide.
    for _ in 0..2000 {
        h.sim.advance(0.0004);
    }
    assert_ne!(h.state(), LocomotionStateId::Slide);
    assert_eq!(h.pose(), Pose::Upright);

    h.input.set(guard_press(0.0));
    h.sim.advance(0.0004);
    assert_eq!(h.state(), LocomotionStateId::Guard);

    for _ in 0..500 {
        h.sim.advance(0.0004);
    }
    assert_eq!(h.state(), LocomotionStateId::Idle);
}

#[test]
fn test_vertical_stick_does_not_move() {
    let mut h = Harness::new(LocomotionConfig::default(), long_floor());
    h.input.set(RawInput {
        move_axis: Vec2::new(0.0, 1.0),
        ..Default::default()
    });
    h.frames(10);

    assert_eq!(h.state(), LocomotionStateId::Idle);
    assert!(h.sim.character().velocity().x.abs() < 1e-3);
}

#[test]
fn test_stale_slide_restoration_leaves_new_slide_alone() {
    // Default slide lasts 2s (100 frames), longer than a jump arc.
    let mut h = Harness::new(LocomotionConfig::default(), long_floor());
    h.input.set(RawInput::moving(1.0));
    h.frames(5);

    h.tap(guard_press(1.0), RawInput::moving(1.0));
    assert_eq!(h.state(), LocomotionStateId::Slide);
    let first_entry = h.sim.frame;

    h.frames(2);
    h.tap(
        RawInput {
            jump: true,
            ..RawInput::moving(1.0)
        },
        RawInput::moving(1.0),
    );
    assert_eq!(h.state(), LocomotionStateId::Jump);
    assert_eq!(h.pose(), Pose::Sliding);

    h.run_until(90, |c| c.state() == LocomotionStateId::Move);
    assert!(h.sim.frame < first_entry + 99, "landed too late for this test");

    // Slide again before the first restoration fires.
    h.tap(guard_press(1.0), RawInput::moving(1.0));
    assert_eq!(h.state(), LocomotionStateId::Slide);
    let second_entry = h.sim.frame;

    while h.sim.frame < first_entry + 101 {
        h.frames(1);
    }
    assert_eq!(h.state(), LocomotionStateId::Slide);
    assert_eq!(h.pose(), Pose::Sliding);

    h.run_until(120, |c| c.state() != LocomotionStateId::Slide);
    assert_eq!(h.state(), LocomotionStateId::Move);
    assert_eq!(h.pose(), Pose::Upright);
    assert!(h.sim.frame >= second_entry + 99);
}

#[test]
fn test_guard_then_roll() {
    let config = LocomotionConfig {
        roll_duration: 0.1,
        ..Default::default()
    };
    let mut h = Harness::new(config, long_floor());

    h.input.set(guard_press(0.0));
    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Guard);
    assert_eq!(h.pose(), Pose::Upright);

    h.input.set(guard_press(1.0));
    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Roll);
    assert_eq!(h.pose(), Pose::Rolling);

    h.run_until(10, |c| c.state() != LocomotionStateId::Roll);
    assert_eq!(h.state(), LocomotionStateId::Move);
}

#[test]
fn test_guard_drops_after_duration() {
    let config = LocomotionConfig {
        guard_duration: 0.1,
        ..Default::default()
    };
    let mut h = Harness::new(config, long_floor());
    h.input.set(guard_press(0.0));
    h.frames(1);
    assert_eq!(h.state(), LocomotionStateId::Guard);

    h.run_until(10, |c| c.state() == LocomotionStateId::Idle);
}

#[test]
fn test_snap_keeps_runner_on_step_down() {
    let mut world = CollisionWorld::new();
    world.add_box(Vec3::new(-9.0, -0.5, 0.0), Vec3::new(11.0, 0.5, 5.0), 0);
    world.add_box(Vec3::new(21.0, -0.8, 0.0), Vec3::new(19.0, 0.5, 5.0), 0);
    let mut h = Harness::new(LocomotionConfig::default(), world);

    h.input.set(RawInput::moving(1.0));
    let mut snapped = false;
    for _ in 0..120 {
        h.frames(1);
        let character = h.sim.character();
        if character.position().x > 1.0 {
            assert!(character.on_ground(), "left ground at x={}", character.position().x);
            assert_ne!(character.state(), LocomotionStateId::Jump);
        }
        snapped |= character.last_output().map_or(false, |o| o.snapped);
    }
    assert!(snapped);
}

#[test]
fn test_deferred_tick_keeps_jump() {
    let mut h = Harness::new(LocomotionConfig::default(), long_floor());
    h.input.set(jump_press());
    h.frames(1);

    h.sim.character_mut().body_mut().withhold_completion();
    let report = h.sim.advance(FRAME);
    if report.ticks == 1 {
        assert_eq!(report.deferred, 1);
        assert!(h.sim.character().jump_pending());
    }

    h.input.set(RawInput::default());
    h.frames(3);
    assert!(!h.sim.character().jump_pending());
    assert!(h.sim.character().velocity().y > 0.0);
}
