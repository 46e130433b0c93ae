//! Keyboard key codes and their translation from platform key codes.
//!
//! The simulation polls keys, it never consumes events directly: whatever
//! drives the frame loop forwards key presses and releases to an
//! [`Input`](crate::input::Input) using one of the translation functions below.

use winit::keyboard::{KeyCode, PhysicalKey};

/// State of a key.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// The key is up.
    Release,
    /// The key is down.
    Press,
}

impl Action {
    /// Whether this is [`Action::Press`].
    #[inline]
    pub fn is_pressed(self) -> bool {
        self == Action::Press
    }
}

impl From<bool> for Action {
    fn from(pressed: bool) -> Self {
        if pressed {
            Action::Press
        } else {
            Action::Release
        }
    }
}

/// Key codes, named after the physical key position on a US layout.
///
/// `Unknown` must stay the last variant: it sizes the key-state table.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum Key {
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key0,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Escape,
    Space,
    Return,
    Tab,
    Back,
    Left,
    Up,
    Right,
    Down,
    LShift,
    RShift,
    LControl,
    RControl,
    LAlt,
    RAlt,
    Minus,
    Equals,
    Comma,
    Period,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Unknown,
}

impl Key {
    /// Number of distinct key codes, `Unknown` included.
    pub const COUNT: usize = Key::Unknown as usize + 1;

    /// The camera key for a digit in `1..=9`, if any.
    pub fn digit(n: u32) -> Option<Key> {
        const DIGITS: [Key; 9] = [
            Key::Key1,
            Key::Key2,
            Key::Key3,
            Key::Key4,
            Key::Key5,
            Key::Key6,
            Key::Key7,
            Key::Key8,
            Key::Key9,
        ];
        n.checked_sub(1)
            .and_then(|i| DIGITS.get(i as usize))
            .copied()
    }

    /// Translates a DOM `KeyboardEvent.code` string (e.g. `"KeyW"`, `"Digit3"`).
    pub fn from_code(code: &str) -> Key {
        match code {
            "Digit1" => Key::Key1,
            "Digit2" => Key::Key2,
            "Digit3" => Key::Key3,
            "Digit4" => Key::Key4,
            "Digit5" => Key::Key5,
            "Digit6" => Key::Key6,
            "Digit7" => Key::Key7,
            "Digit8" => Key::Key8,
            "Digit9" => Key::Key9,
            "Digit0" => Key::Key0,
            "KeyA" => Key::A,
            "KeyB" => Key::B,
            "KeyC" => Key::C,
            "KeyD" => Key::D,
            "KeyE" => Key::E,
            "KeyF" => Key::F,
            "KeyG" => Key::G,
            "KeyH" => Key::H,
            "KeyI" => Key::I,
            "KeyJ" => Key::J,
            "KeyK" => Key::K,
            "KeyL" => Key::L,
            "KeyM" => Key::M,
            "KeyN" => Key::N,
            "KeyO" => Key::O,
            "KeyP" => Key::P,
            "KeyQ" => Key::Q,
            "KeyR" => Key::R,
            "KeyS" => Key::S,
            "KeyT" => Key::T,
            "KeyU" => Key::U,
            "KeyV" => Key::V,
            "KeyW" => Key::W,
            "KeyX" => Key::X,
            "KeyY" => Key::Y,
            "KeyZ" => Key::Z,
            "Escape" => Key::Escape,
            "Space" => Key::Space,
            "Enter" => Key::Return,
            "Tab" => Key::Tab,
            "Backspace" => Key::Back,
            "ArrowLeft" => Key::Left,
            "ArrowUp" => Key::Up,
            "ArrowRight" => Key::Right,
            "ArrowDown" => Key::Down,
            "ShiftLeft" => Key::LShift,
            "ShiftRight" => Key::RShift,
            "ControlLeft" => Key::LControl,
            "ControlRight" => Key::RControl,
            "AltLeft" => Key::LAlt,
            "AltRight" => Key::RAlt,
            "Minus" => Key::Minus,
            "Equal" => Key::Equals,
            "Comma" => Key::Comma,
            "Period" => Key::Period,
            "F1" => Key::F1,
            "F2" => Key::F2,
            "F3" => Key::F3,
            "F4" => Key::F4,
            "F5" => Key::F5,
            "F6" => Key::F6,
            "F7" => Key::F7,
            "F8" => Key::F8,
            "F9" => Key::F9,
            "F10" => Key::F10,
            "F11" => Key::F11,
            "F12" => Key::F12,
            _ => Key::Unknown,
        }
    }
}

/// Translates a winit physical key.
pub fn translate_key(physical_key: PhysicalKey) -> Key {
    if let PhysicalKey::Code(key_code) = physical_key {
        match key_code {
            KeyCode::Digit1 => Key::Key1,
            KeyCode::Digit2 => Key::Key2,
            KeyCode::Digit3 => Key::Key3,
            KeyCode::Digit4 => Key::Key4,
            KeyCode::Digit5 => Key::Key5,
            KeyCode::Digit6 => Key::Key6,
            KeyCode::Digit7 => Key::Key7,
            KeyCode::Digit8 => Key::Key8,
            KeyCode::Digit9 => Key::Key9,
            KeyCode::Digit0 => Key::Key0,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyB => Key::B,
            KeyCode::KeyC => Key::C,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyE => Key::E,
            KeyCode::KeyF => Key::F,
            KeyCode::KeyG => Key::G,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyI => Key::I,
            KeyCode::KeyJ => Key::J,
            KeyCode::KeyK => Key::K,
            KeyCode::KeyL => Key::L,
            KeyCode::KeyM => Key::M,
            KeyCode::KeyN => Key::N,
            KeyCode::KeyO => Key::O,
            KeyCode::KeyP => Key::P,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyR => Key::R,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyT => Key::T,
            KeyCode::KeyU => Key::U,
            KeyCode::KeyV => Key::V,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyX => Key::X,
            KeyCode::KeyY => Key::Y,
            KeyCode::KeyZ => Key::Z,
            KeyCode::Escape => Key::Escape,
            KeyCode::Space => Key::Space,
            KeyCode::Enter => Key::Return,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Back,
            KeyCode::ArrowLeft => Key::Left,
            KeyCode::ArrowUp => Key::Up,
            KeyCode::ArrowRight => Key::Right,
            KeyCode::ArrowDown => Key::Down,
            KeyCode::ShiftLeft => Key::LShift,
            KeyCode::ShiftRight => Key::RShift,
            KeyCode::ControlLeft => Key::LControl,
            KeyCode::ControlRight => Key::RControl,
            KeyCode::AltLeft => Key::LAlt,
            KeyCode::AltRight => Key::RAlt,
            KeyCode::Minus => Key::Minus,
            KeyCode::Equal => Key::Equals,
            KeyCode::Comma => Key::Comma,
            KeyCode::Period => Key::Period,
            KeyCode::F1 => Key::F1,
            KeyCode::F2 => Key::F2,
            KeyCode::F3 => Key::F3,
            KeyCode::F4 => Key::F4,
            KeyCode::F5 => Key::F5,
            KeyCode::F6 => Key::F6,
            KeyCode::F7 => Key::F7,
            KeyCode::F8 => Key::F8,
            KeyCode::F9 => Key::F9,
            KeyCode::F10 => Key::F10,
            KeyCode::F11 => Key::F11,
            KeyCode::F12 => Key::F12,
            _ => Key::Unknown,
        }
    } else {
        Key::Unknown
    }
}

/// Translates a winit element state.
pub fn translate_action(state: winit::event::ElementState) -> Action {
    use winit::event::ElementState;
    match state {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}
