//! Polled keyboard state and forklift control sampling.

use crate::event::{Action, Key};

/// A polled key-state table.
///
/// The frame loop feeds it with [`on_key`](Input::on_key) whenever the
/// platform reports a key transition; the simulation only ever reads it.
#[derive(Clone, Debug)]
pub struct Input {
    key_states: [Action; Key::COUNT],
}

impl Default for Input {
    fn default() -> Self {
        Input::new()
    }
}

impl Input {
    /// A table with every key released.
    pub fn new() -> Input {
        Input {
            key_states: [Action::Release; Key::COUNT],
        }
    }

    /// Records a key transition.
    #[inline]
    pub fn on_key(&mut self, key: Key, pressed: bool) {
        self.key_states[key as usize] = Action::from(pressed);
    }

    /// Whether `key` is currently down.
    #[inline]
    pub fn key(&self, key: Key) -> bool {
        self.key_states[key as usize].is_pressed()
    }

    /// The state of `key`.
    #[inline]
    pub fn get_key(&self, key: Key) -> Action {
        self.key_states[key as usize]
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.key_states = [Action::Release; Key::COUNT];
    }
}

bitflags::bitflags! {
    /// The forklift controls held during one frame.
    #[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Controls: u8 {
        /// Drive forward.
        const FORWARD    = 1 << 0;
        /// Drive backward.
        const BACKWARD   = 1 << 1;
        /// Turn left (counterclockwise seen from above).
        const TURN_LEFT  = 1 << 2;
        /// Turn right.
        const TURN_RIGHT = 1 << 3;
        /// Raise the fork.
        const LIFT_UP    = 1 << 4;
        /// Lower the fork.
        const LIFT_DOWN  = 1 << 5;
        /// Grab or drop.
        const INTERACT   = 1 << 6;
    }
}

impl Controls {
    /// `1`, `-1` or `0` depending on which of the two opposite controls is held.
    #[inline]
    pub fn axis(self, positive: Controls, negative: Controls) -> f32 {
        let p = if self.contains(positive) { 1.0 } else { 0.0 };
        let n = if self.contains(negative) { 1.0 } else { 0.0 };
        p - n
    }
}

/// Keys bound to each forklift control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyBindings {
    /// Drive forward.
    pub forward: Key,
    /// Drive backward.
    pub backward: Key,
    /// Turn left.
    pub turn_left: Key,
    /// Turn right.
    pub turn_right: Key,
    /// Raise the fork.
    pub lift_up: Key,
    /// Lower the fork.
    pub lift_down: Key,
    /// Pick up or drop a piece.
    pub interact: Key,
    /// Zoom the active orbit camera in.
    pub zoom_in: Key,
    /// Zoom the active orbit camera out.
    pub zoom_out: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            forward: Key::W,
            backward: Key::S,
            turn_left: Key::A,
            turn_right: Key::D,
            lift_up: Key::Q,
            lift_down: Key::E,
            interact: Key::G,
            zoom_in: Key::O,
            zoom_out: Key::P,
        }
    }
}

impl KeyBindings {
    /// Reads the forklift controls currently held.
    pub fn sample(&self, input: &Input) -> Controls {
        let mut res = Controls::empty();
        let pairs = [
            (self.forward, Controls::FORWARD),
            (self.backward, Controls::BACKWARD),
            (self.turn_left, Controls::TURN_LEFT),
            (self.turn_right, Controls::TURN_RIGHT),
            (self.lift_up, Controls::LIFT_UP),
            (self.lift_down, Controls::LIFT_DOWN),
            (self.interact, Controls::INTERACT),
        ];

        for (key, control) in pairs {
            if input.key(key) {
                res.insert(control);
            }
        }

        res
    }

    /// Rebinds the grab/drop key.
    pub fn with_interact(mut self, key: Key) -> Self {
        self.interact = key;
        self
    }
}

/// Turns a polled key into a press-edge signal.
#[derive(Copy, Clone, Debug, Default)]
pub struct EdgeTrigger {
    previous: bool,
}

impl EdgeTrigger {
    /// Feeds this frame's state; `true` only on the frame the key goes down.
    #[inline]
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.previous;
        self.previous = pressed;
        fired
    }
}
