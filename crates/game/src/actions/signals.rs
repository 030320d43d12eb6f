//! Outgoing animation and display signals.
//!
//! The state machine never reads anything back from these sinks; they are
//! fire-and-forget notifications for an animator and a debug overlay.

use serde::{Deserialize, Serialize};

/// Receiver of animation flags and display text.
///
/// Every method has an empty default so a sink only implements what it
/// displays.
pub trait LocomotionSignals {
    /// Set the boolean animation parameter keyed by a state name.
    fn set_animation_flag(&mut self, _name: &str, _value: bool) {}

    /// Show the name of the active state.
    fn show_state(&mut self, _name: &str) {}

    /// Show whether the character is grounded.
    fn show_grounded(&mut self, _grounded: bool) {}
}

/// Overlay text for the active state, e.g. `PlayerState: Move`.
pub fn state_text(name: &str) -> String {
    format!("PlayerState: {}", name)
}

/// Overlay text for the grounded flag, e.g. `Grounded: True`.
pub fn grounded_text(grounded: bool) -> String {
    format!("Grounded: {}", if grounded { "True" } else { "False" })
}

/// Discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSignals;

impl LocomotionSignals for NullSignals {}

/// Writes the overlay text to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSignals;

impl LocomotionSignals for LogSignals {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        log::trace!("animation flag {}={}", name, value);
    }

    fn show_state(&mut self, name: &str) {
        log::info!("{}", state_text(name));
    }

    fn show_grounded(&mut self, grounded: bool) {
        log::info!("{}", grounded_text(grounded));
    }
}

/// A signal as recorded by [`RecordingSignals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalEvent {
    AnimationFlag { name: String, value: bool },
    State(String),
    Grounded(bool),
}

/// Records every signal in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSignals {
    pub events: Vec<SignalEvent>,
}

impl RecordingSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to an animation flag.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            SignalEvent::AnimationFlag { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }

    /// State names in the order they were shown.
    pub fn shown_states(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SignalEvent::State(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Last grounded value shown.
    pub fn last_grounded(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            SignalEvent::Grounded(g) => Some(*g),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl LocomotionSignals for RecordingSignals {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        self.events.push(SignalEvent::AnimationFlag {
            name: name.to_string(),
            value,
        });
    }

    fn show_state(&mut self, name: &str) {
        self.events.push(SignalEvent::State(name.to_string()));
    }

    fn show_grounded(&mut self, grounded: bool) {
        self.events.push(SignalEvent::Grounded(grounded));
    }
}

impl<S: LocomotionSignals + ?Sized> LocomotionSignals for &mut S {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        (**self).set_animation_flag(name, value);
    }

    fn show_state(&mut self, name: &str) {
        (**self).show_state(name);
    }

    fn show_grounded(&mut self, grounded: bool) {
        (**self).show_grounded(grounded);
    }
}

impl<S: LocomotionSignals + ?Sized> LocomotionSignals for Box<S> {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        (**self).set_animation_flag(name, value);
    }

    fn show_state(&mut self, name: &str) {
        (**self).show_state(name);
    }

    fn show_grounded(&mut self, grounded: bool) {
        (**self).show_grounded(grounded);
    }
}
