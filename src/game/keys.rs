//! Keyboard and mouse input snapshot for the game tick.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from physical keys,
//! [`KeyState`] for tracking pressed keys, and [`InputSnapshot`], the per-frame view of input
//! that [`GameState::tick`](crate::game::GameState::tick) consumes. The window layer owns the
//! real event loop; it only has to translate its key events with [`winit_key_to_game_key`] and
//! report where the cursor sits relative to the window centre.

use std::collections::HashSet;
use winit::keyboard;

/// Enum representing all in-game actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move player forward (W or Up Arrow).
    MoveForward,
    /// Move player backward (S or Down Arrow).
    MoveBackward,
    /// Strafe left (A or Left Arrow).
    MoveLeft,
    /// Strafe right (D or Right Arrow).
    MoveRight,
    /// Jump (Space).
    Jump,
    /// Toggle pause (Escape).
    Pause,
    /// Cycle the render style (Tab).
    CycleRenderStyle,
    /// Save now (F5).
    QuickSave,
}

/// Tracks the set of currently pressed game keys.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }
}

/// Input for one tick.
///
/// `cursor` is the pointer position in window pixels and `center` the point the
/// window layer warps it back to every frame; their difference drives mouse look.
#[derive(Debug, Default, Clone)]
pub struct InputSnapshot {
    /// Keys held this frame.
    pub keys: KeyState,
    /// Cursor position in pixels.
    pub cursor: (f64, f64),
    /// Window centre in pixels.
    pub center: (f64, f64),
}

impl InputSnapshot {
    /// Snapshot with the cursor resting at the window centre.
    pub fn centered(keys: KeyState, center: (f64, f64)) -> Self {
        Self {
            keys,
            cursor: center,
            center,
        }
    }

    /// Cursor offset from the window centre.
    pub fn cursor_delta(&self) -> (f64, f64) {
        (self.cursor.0 - self.center.0, self.cursor.1 - self.center.1)
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
///
/// Supports both named keys (arrows, space, escape, tab, F5) and character keys (WASD).
///
/// # Returns
/// * `Some(GameKey)` if the key maps to a game action.
/// * `None` otherwise.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
            Space => GameKey::Jump,
            Escape => GameKey::Pause,
            Tab => GameKey::CycleRenderStyle,
            F5 => GameKey::QuickSave,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey, SmolStr};

    /// Character keys map case-insensitively.
    #[test]
    fn test_character_keys() {
        let key = Key::Character(SmolStr::new("W"));
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::MoveForward));
        let key = Key::Character(SmolStr::new("d"));
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::MoveRight));
        let key = Key::Character(SmolStr::new("q"));
        assert_eq!(winit_key_to_game_key(&key), None);
    }

    /// Named keys cover arrows and actions.
    #[test]
    fn test_named_keys() {
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::ArrowLeft)),
            Some(GameKey::MoveLeft)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::Space)),
            Some(GameKey::Jump)
        );
        assert_eq!(winit_key_to_game_key(&Key::Named(NamedKey::Enter)), None);
    }

    /// Press and release round out the key set.
    #[test]
    fn test_key_state() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::Jump);
        assert!(keys.is_pressed(GameKey::Jump));
        keys.release_key(GameKey::Jump);
        assert!(!keys.is_pressed(GameKey::Jump));
    }

    #[test]
    fn test_cursor_delta() {
        let mut input = InputSnapshot::centered(KeyState::new(), (400.0, 300.0));
        assert_eq!(input.cursor_delta(), (0.0, 0.0));
        input.cursor = (410.0, 295.0);
        assert_eq!(input.cursor_delta(), (10.0, -5.0));
    }
}
