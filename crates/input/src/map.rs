//! Key bindings from terminal events to game commands.
//!
//! Bindings are written as key names (`"Left"`, `"Space"`, `"x"`) in the
//! config file and resolved once at startup into a [`KeyMap`]. Letters match
//! regardless of case.

use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::types::GameAction;

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(GameAction),
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub soft_drop: Vec<String>,
    pub hard_drop: Vec<String>,
    pub rotate_cw: Vec<String>,
    pub rotate_ccw: Vec<String>,
    pub hold: Vec<String>,
    pub pause: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: keys(&["Left", "a"]),
            move_right: keys(&["Right", "d"]),
            soft_drop: keys(&["Down", "s"]),
            hard_drop: keys(&["Space"]),
            rotate_cw: keys(&["Up", "x"]),
            rotate_ccw: keys(&["z"]),
            hold: keys(&["c"]),
            pause: keys(&["p", "Esc"]),
            restart: keys(&["r"]),
            quit: keys(&["q"]),
        }
    }
}

impl KeyBindings {
    fn entries(&self) -> [(&[String], Command); 10] {
        [
            (self.move_left.as_slice(), Command::Game(GameAction::MoveLeft)),
            (self.move_right.as_slice(), Command::Game(GameAction::MoveRight)),
            (self.soft_drop.as_slice(), Command::Game(GameAction::SoftDrop)),
            (self.hard_drop.as_slice(), Command::Game(GameAction::HardDrop)),
            (self.rotate_cw.as_slice(), Command::Game(GameAction::RotateCw)),
            (self.rotate_ccw.as_slice(), Command::Game(GameAction::RotateCcw)),
            (self.hold.as_slice(), Command::Game(GameAction::Hold)),
            (self.pause.as_slice(), Command::Game(GameAction::Pause)),
            (self.restart.as_slice(), Command::Restart),
            (self.quit.as_slice(), Command::Quit),
        ]
    }

    /// Parse every key name. Unknown names and keys bound twice are errors.
    pub fn resolve(&self) -> Result<KeyMap> {
        let mut bindings: Vec<(KeyCode, Command)> = Vec::new();

        for (names, command) in self.entries() {
            for name in names {
                let code = parse_key(name)?;
                if let Some((_, existing)) = bindings.iter().find(|(c, _)| *c == code) {
                    if *existing != command {
                        bail!("key {name:?} is bound to both {existing:?} and {command:?}");
                    }
                    continue;
                }
                bindings.push((code, command));
            }
        }

        Ok(KeyMap { bindings })
    }
}

/// Parse a key name such as `"Left"`, `"Space"` or `"x"`.
pub fn parse_key(name: &str) -> Result<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c.to_ascii_lowercase()));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        _ => bail!("unknown key name {name:?}"),
    };
    Ok(code)
}

/// Resolved bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, Command)>,
}

impl KeyMap {
    /// Command for a key event. Ctrl+C always quits.
    pub fn lookup(&self, key: &KeyEvent) -> Option<Command> {
        let code = match key.code {
            KeyCode::Char(c) => {
                if c == 'c' && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Some(Command::Quit);
                }
                KeyCode::Char(c.to_ascii_lowercase())
            }
            other => other,
        };

        self.bindings
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(_, command)| command)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        // The built-in bindings are always valid.
        KeyBindings::default()
            .resolve()
            .unwrap_or(KeyMap { bindings: Vec::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> KeyMap {
        KeyBindings::default().resolve().unwrap()
    }

    #[test]
    fn test_movement_keys() {
        let map = map();
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Left)),
            Some(Command::Game(GameAction::MoveLeft))
        );
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Right)),
            Some(Command::Game(GameAction::MoveRight))
        );
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Char('S'))),
            Some(Command::Game(GameAction::SoftDrop))
        );
    }

    #[test]
    fn test_action_keys() {
        let map = map();
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Char(' '))),
            Some(Command::Game(GameAction::HardDrop))
        );
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Esc)),
            Some(Command::Game(GameAction::Pause))
        );
        assert_eq!(map.lookup(&KeyEvent::from(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(map.lookup(&KeyEvent::from(KeyCode::Char('k'))), None);
    }

    #[test]
    fn test_quit_keys() {
        let map = map();
        assert_eq!(map.lookup(&KeyEvent::from(KeyCode::Char('Q'))), Some(Command::Quit));
        assert_eq!(
            map.lookup(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        // Plain c is hold.
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Char('c'))),
            Some(Command::Game(GameAction::Hold))
        );
    }

    #[test]
    fn test_custom_bindings_from_json() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{"hard_drop": ["Enter", "w"]}"#).unwrap();
        let map = bindings.resolve().unwrap();
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Enter)),
            Some(Command::Game(GameAction::HardDrop))
        );
        assert_eq!(map.lookup(&KeyEvent::from(KeyCode::Char(' '))), None);
        // Untouched actions keep their defaults.
        assert_eq!(
            map.lookup(&KeyEvent::from(KeyCode::Left)),
            Some(Command::Game(GameAction::MoveLeft))
        );
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let bindings = KeyBindings {
            hold: vec!["Hyper".to_string()],
            ..KeyBindings::default()
        };
        let err = bindings.resolve().unwrap_err();
        assert!(err.to_string().contains("Hyper"));
    }

    #[test]
    fn test_conflicting_binding_is_an_error() {
        let bindings = KeyBindings {
            hold: vec!["Space".to_string()],
            ..KeyBindings::default()
        };
        assert!(bindings.resolve().is_err());
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key("SPACE").unwrap(), KeyCode::Char(' '));
        assert_eq!(parse_key("X").unwrap(), KeyCode::Char('x'));
        assert_eq!(parse_key("escape").unwrap(), KeyCode::Esc);
        assert!(parse_key("").is_err());
    }
}
