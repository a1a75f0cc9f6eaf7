//! Press/release tracking for terminal environments.
//!
//! The session wants one press when a key goes down and one release when it
//! comes up. Terminals send repeated presses while a key is held, and many
//! never send releases at all. This handler collapses repeats and, until a
//! real release event shows up, releases held keys after a short silence.

use arrayvec::ArrayVec;

use crate::types::GameAction;

/// A logical key transition for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(GameAction),
    Release(GameAction),
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    action: GameAction,
    idle_ms: u32,
}

const MAX_HELD: usize = 3;

/// Tracks which holdable actions are down.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: ArrayVec<HeldKey, MAX_HELD>,
    key_release_timeout_ms: u32,
    release_events_seen: bool,
}

// Without key-release events, a short timeout keeps a single tap from turning
// into a sustained hold.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: ArrayVec::new(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            release_events_seen: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Whether the terminal has proven it reports key releases.
    pub fn has_release_events(&self) -> bool {
        self.release_events_seen
    }

    pub fn is_held(&self, action: GameAction) -> bool {
        self.held.iter().any(|k| k.action == action)
    }

    /// A key press or terminal auto-repeat.
    pub fn key_down(&mut self, action: GameAction) -> Option<InputEvent> {
        if !action.is_holdable() {
            return Some(InputEvent::Press(action));
        }

        if let Some(key) = self.held.iter_mut().find(|k| k.action == action) {
            key.idle_ms = 0;
            return None;
        }

        let _ = self.held.try_push(HeldKey { action, idle_ms: 0 });
        Some(InputEvent::Press(action))
    }

    /// A real key release. Disables the timeout from then on.
    pub fn key_up(&mut self, action: GameAction) -> Option<InputEvent> {
        self.release_events_seen = true;
        let index = self.held.iter().position(|k| k.action == action)?;
        self.held.remove(index);
        Some(InputEvent::Release(action))
    }

    /// Age held keys; returns releases for the ones gone quiet.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<InputEvent, MAX_HELD> {
        let mut events = ArrayVec::new();
        if self.release_events_seen {
            return events;
        }

        let timeout = self.key_release_timeout_ms;
        self.held.retain(|key| {
            key.idle_ms = key.idle_ms.saturating_add(elapsed_ms);
            if key.idle_ms > timeout {
                events.push(InputEvent::Release(key.action));
                false
            } else {
                true
            }
        });
        events
    }

    /// Release everything, e.g. when a new session starts.
    pub fn reset(&mut self) -> ArrayVec<InputEvent, MAX_HELD> {
        self.held
            .drain(..)
            .map(|key| InputEvent::Release(key.action))
            .collect()
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
