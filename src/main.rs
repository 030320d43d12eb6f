//! Ledgerun - Headless Demo
//!
//! Runs a scripted input timeline through the locomotion controller on the
//! sandbox test course and logs every state change.
//!
//! ```text
//! ledgerun [config.json]
//! RUST_LOG=debug ledgerun
//! ```

use std::process::ExitCode;

use glam::{Vec2, Vec3};
use ledgerun_game::sandbox::test_course;
use ledgerun_game::{
    Character, InputCell, LocomotionConfig, LogSignals, RawInput, SandboxBody, Simulation,
    SimulationConfig,
};

/// Seconds per rendered frame (60 Hz).
const FRAME_TIME: f32 = 1.0 / 60.0;

/// One segment of the scripted timeline.
struct Segment {
    label: &'static str,
    seconds: f32,
    input: RawInput,
    /// Only the first frame of the segment sees the buttons.
    tap: bool,
}

fn script() -> Vec<Segment> {
    let run = RawInput::moving(1.0);
    vec![
        Segment { label: "settle", seconds: 0.5, input: RawInput::default(), tap: false },
        Segment { label: "run", seconds: 1.5, input: run, tap: false },
        Segment { label: "jump", seconds: 1.5, input: RawInput { jump: true, ..run }, tap: true },
        Segment { label: "slide", seconds: 2.5, input: RawInput { guard: 1.0, ..run }, tap: true },
        Segment { label: "stop", seconds: 0.5, input: RawInput::default(), tap: false },
        Segment {
            label: "guard",
            seconds: 0.5,
            input: RawInput { guard: 1.0, ..Default::default() },
            tap: false,
        },
        Segment {
            label: "roll",
            seconds: 2.5,
            input: RawInput { guard: 1.0, move_axis: Vec2::new(-1.0, 0.0), ..Default::default() },
            tap: false,
        },
        Segment { label: "rest", seconds: 1.0, input: RawInput::default(), tap: false },
    ]
}

fn load_config() -> Result<LocomotionConfig, String> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(LocomotionConfig::default());
    };
    let text = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    LocomotionConfig::from_json(&text).map_err(|e| format!("{}: {}", path, e))
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = InputCell::new();
    let character = match Character::builder()
        .config(config)
        .body(SandboxBody::new(test_course(), Vec3::new(0.0, 0.5, 0.0)))
        .input(input.clone())
        .signals(LogSignals)
        .build()
    {
        Ok(character) => character,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut simulation = Simulation::new(SimulationConfig::default(), character);
    let mut summary = Vec::new();

    for segment in script() {
        log::info!("--- {} ---", segment.label);
        let frames = (segment.seconds / FRAME_TIME).round() as u32;

        for i in 0..frames {
            let raw = if segment.tap && i > 0 {
                RawInput {
                    jump: false,
                    guard: 0.0,
                    ..segment.input
                }
            } else {
                segment.input
            };
            input.set(raw);
            simulation.advance(FRAME_TIME);
        }

        let character = simulation.character();
        summary.push(serde_json::json!({
            "segment": segment.label,
            "state": character.state().name(),
            "pose": format!("{:?}", character.pose()),
            "grounded": character.on_ground(),
            "position": [character.position().x, character.position().y, character.position().z],
            "velocity": [character.velocity().x, character.velocity().y, character.velocity().z],
        }));
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}", text),
        Err(e) => log::error!("failed to encode summary: {}", e),
    }

    log::info!(
        "{} frames, {} ticks, {} deferred",
        simulation.frame,
        simulation.tick,
        simulation.character().deferred_ticks()
    );
    ExitCode::SUCCESS
}
