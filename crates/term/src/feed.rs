//! Short-lived callouts ("TETRIS", "LEVEL 5") fed by gameplay events.

use std::collections::VecDeque;

use crate::core::{EventListener, GameEvent};

const CALLOUT_TTL_MS: u32 = 1500;
const MAX_CALLOUTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callout {
    pub text: &'static str,
    pub value: Option<u32>,
    pub remaining_ms: u32,
}

/// Recent callouts, newest first.
#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    callouts: VecDeque<Callout>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: &'static str, value: Option<u32>) {
        if self.callouts.len() == MAX_CALLOUTS {
            self.callouts.pop_back();
        }
        self.callouts.push_front(Callout {
            text,
            value,
            remaining_ms: CALLOUT_TTL_MS,
        });
    }

    /// Age callouts and drop the expired ones.
    pub fn update(&mut self, dt_ms: u32) {
        for callout in &mut self.callouts {
            callout.remaining_ms = callout.remaining_ms.saturating_sub(dt_ms);
        }
        self.callouts.retain(|c| c.remaining_ms > 0);
    }

    pub fn callouts(&self) -> impl Iterator<Item = &Callout> {
        self.callouts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.callouts.is_empty()
    }

    pub fn clear(&mut self) {
        self.callouts.clear();
    }
}

impl EventListener for EventFeed {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::LineClear { lines: 1 } => self.push("SINGLE", None),
            GameEvent::LineClear { lines: 2 } => self.push("DOUBLE", None),
            GameEvent::LineClear { lines: 3 } => self.push("TRIPLE", None),
            GameEvent::Tetris => self.push("TETRIS", None),
            GameEvent::TSpin => self.push("T-SPIN", None),
            GameEvent::LevelUp { level } => self.push("LEVEL", Some(level)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callouts_expire() {
        let mut feed = EventFeed::new();
        feed.on_event(GameEvent::TSpin);
        feed.on_event(GameEvent::Move);
        assert_eq!(feed.callouts().count(), 1);

        feed.update(CALLOUT_TTL_MS - 1);
        assert!(!feed.is_empty());
        feed.update(1);
        assert!(feed.is_empty());
    }

    #[test]
    fn newest_first_and_bounded() {
        let mut feed = EventFeed::new();
        for level in 2..8 {
            feed.on_event(GameEvent::LevelUp { level });
        }
        let values: Vec<_> = feed.callouts().map(|c| c.value).collect();
        assert_eq!(values, vec![Some(7), Some(6), Some(5), Some(4)]);
    }

    #[test]
    fn tetris_clear_reads_tetris() {
        let mut feed = EventFeed::new();
        feed.on_event(GameEvent::LineClear { lines: 4 });
        feed.on_event(GameEvent::Tetris);
        let texts: Vec<_> = feed.callouts().map(|c| c.text).collect();
        assert_eq!(texts, vec!["TETRIS"]);
    }
}
