//! Session module - the gameplay state machine.
//!
//! A [`Session`] owns the board, the active piece, the randomizer and every
//! counter and timer. The host feeds it logical key presses and releases and
//! calls [`Session::update`] once per fixed tick; everything else is derived.
//!
//! ```text
//! Playing ──lock with full rows──▶ LineClearing ──rows removed──▶ Playing
//! Playing ◀──────────pause───────▶ Paused
//! Playing / LineClearing ──lock above board──▶ GameOver
//! LineClearing ──victory level reached──▶ Victory
//! ```

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::board::Board;
use crate::config::{GameConfig, GameMode};
use crate::events::{EventListener, GameEvent};
use crate::piece::Piece;
use crate::rng::Randomizer;
use crate::scoring::{
    calculate_clear_score, calculate_drop_score, get_drop_interval_ms, get_soft_drop_interval_ms,
    level_after_clear, qualifies_for_b2b, t_spin_bonus,
};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::summary::{GameSummary, SessionStats, SummarySink};
use crate::types::{GameAction, PieceKind, SPAWN_BUFFER_ROWS, VICTORY_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Playing,
    LineClearing,
    Paused,
    GameOver,
    Victory,
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::GameOver | SessionState::Victory)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Playing => "playing",
            SessionState::LineClearing => "line_clearing",
            SessionState::Paused => "paused",
            SessionState::GameOver => "game_over",
            SessionState::Victory => "victory",
        }
    }
}

/// Keys currently held down.
#[derive(Debug, Clone, Copy, Default)]
struct HeldInputs {
    left: bool,
    right: bool,
    soft_drop: bool,
}

impl HeldInputs {
    fn horizontal(&self) -> Option<i8> {
        match (self.left, self.right) {
            (true, false) => Some(-1),
            (false, true) => Some(1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    player: String,
    board: Board,
    active: Piece,
    next_queue: VecDeque<PieceKind>,
    hold: Option<PieceKind>,
    can_hold: bool,
    randomizer: Randomizer,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    back_to_back: u32,
    /// T-spin of the lock that started the pending clear.
    pending_t_spin: bool,
    drop_timer_ms: u32,
    lock_timer_ms: u32,
    lock_pending: bool,
    das_timer_ms: u32,
    arr_timer_ms: u32,
    held: HeldInputs,
    state: SessionState,
    elapsed_ms: u64,
    stats: SessionStats,
    events: Vec<GameEvent>,
    summary: Option<GameSummary>,
}

impl Session {
    /// Start a session. The config is clamped into range once, here.
    pub fn new(config: GameConfig, player: impl Into<String>, seed: u64) -> Self {
        let config = config.normalized();
        let board = Board::with_size(config.board_width, config.board_height)
            .with_clear_delay(config.line_clear_delay_ms);
        let mut randomizer = Randomizer::new(seed);
        let next_queue = (0..config.preview_count)
            .map(|_| randomizer.next())
            .collect();

        let mut session = Self {
            active: Piece::spawn(PieceKind::I, board.width()),
            level: config.start_level,
            config,
            player: player.into(),
            board,
            next_queue,
            hold: None,
            can_hold: true,
            randomizer,
            score: 0,
            lines: 0,
            combo: 0,
            back_to_back: 0,
            pending_t_spin: false,
            drop_timer_ms: 0,
            lock_timer_ms: 0,
            lock_pending: false,
            das_timer_ms: 0,
            arr_timer_ms: 0,
            held: HeldInputs::default(),
            state: SessionState::Playing,
            elapsed_ms: 0,
            stats: SessionStats::default(),
            events: Vec::new(),
            summary: None,
        };

        let first = session.deal();
        session.active = session.spawn(first);
        info!(
            seed,
            player = %session.player,
            level = session.level,
            mode = ?session.config.mode,
            "session started"
        );
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn seed(&self) -> u64 {
        self.randomizer.seed()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_queue.iter().copied()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> u32 {
        self.back_to_back
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_lock_pending(&self) -> bool {
        self.lock_pending
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// A key went down.
    ///
    /// Returns whether the action changed the game. Pressing a key that is
    /// already held does nothing.
    pub fn press(&mut self, action: GameAction) -> bool {
        if self.state.is_finished() {
            return false;
        }
        let playing = self.state == SessionState::Playing;

        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                let (held, dx) = match action {
                    GameAction::MoveLeft => (&mut self.held.left, -1),
                    _ => (&mut self.held.right, 1),
                };
                if *held {
                    return false;
                }
                *held = true;
                self.das_timer_ms = 0;
                self.arr_timer_ms = 0;
                playing && self.shift(dx)
            }
            GameAction::SoftDrop => {
                let was_held = self.held.soft_drop;
                self.held.soft_drop = true;
                !was_held
            }
            GameAction::HardDrop => playing && self.hard_drop(),
            GameAction::RotateCw => playing && self.rotate(true),
            GameAction::RotateCcw => playing && self.rotate(false),
            GameAction::Hold => playing && self.hold(),
            GameAction::Pause => self.toggle_pause(),
        }
    }

    /// A key came up. Releasing a key that isn't held does nothing.
    pub fn release(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                if action == GameAction::MoveLeft {
                    self.held.left = false;
                } else {
                    self.held.right = false;
                }
                self.das_timer_ms = 0;
                self.arr_timer_ms = 0;
            }
            GameAction::SoftDrop => self.held.soft_drop = false,
            _ => {}
        }
    }

    /// Flip between playing and paused. Other states refuse.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Playing => {
                self.state = SessionState::Paused;
                debug!(elapsed_ms = self.elapsed_ms, "paused");
                true
            }
            SessionState::Paused => {
                self.state = SessionState::Playing;
                debug!(elapsed_ms = self.elapsed_ms, "resumed");
                true
            }
            _ => false,
        }
    }

    /// Advance the session by one host tick.
    pub fn update(&mut self, dt_ms: u32) {
        match self.state {
            SessionState::Playing => {
                self.elapsed_ms += u64::from(dt_ms);
                self.update_horizontal(dt_ms);
                self.update_lock_delay(dt_ms);
                if self.state == SessionState::Playing {
                    self.update_gravity(dt_ms);
                }
            }
            SessionState::LineClearing => {
                self.elapsed_ms += u64::from(dt_ms);
                self.update_line_clear(dt_ms);
            }
            SessionState::Paused | SessionState::GameOver | SessionState::Victory => {}
        }
    }

    /// DAS then ARR for a held direction, carrying excess time over.
    fn update_horizontal(&mut self, dt_ms: u32) {
        let Some(dx) = self.held.horizontal() else {
            return;
        };

        let das = self.config.das_ms;
        let prev = self.das_timer_ms;
        self.das_timer_ms = self.das_timer_ms.saturating_add(dt_ms);
        if self.das_timer_ms < das {
            return;
        }

        let excess = if prev < das {
            self.das_timer_ms - das
        } else {
            dt_ms
        };

        let arr = self.config.arr_ms;
        if arr == 0 {
            if excess > 0 {
                while self.shift(dx) {}
            }
            return;
        }

        self.arr_timer_ms = self.arr_timer_ms.saturating_add(excess);
        while self.arr_timer_ms >= arr {
            self.arr_timer_ms -= arr;
            if !self.shift(dx) {
                self.arr_timer_ms = 0;
                break;
            }
        }
    }

    fn update_lock_delay(&mut self, dt_ms: u32) {
        if !self.lock_pending {
            return;
        }
        if !self.active.is_grounded(&self.board) {
            // Moved off the ledge; fall again.
            self.lock_pending = false;
            self.lock_timer_ms = 0;
            return;
        }

        self.lock_timer_ms = self.lock_timer_ms.saturating_add(dt_ms);
        if self.lock_timer_ms >= self.config.lock_delay_ms {
            self.lock_active();
        }
    }

    fn update_gravity(&mut self, dt_ms: u32) {
        let interval = self.drop_interval_ms();
        self.drop_timer_ms = self.drop_timer_ms.saturating_add(dt_ms);
        if self.drop_timer_ms < interval {
            return;
        }
        self.drop_timer_ms = 0;

        if self.active.translate(0, 1, &self.board) {
            self.lock_pending = false;
            self.lock_timer_ms = 0;
            if self.held.soft_drop {
                self.score += calculate_drop_score(1, false);
            }
        } else {
            self.lock_pending = true;
        }
    }

    /// Current gravity interval, soft drop included.
    pub fn drop_interval_ms(&self) -> u32 {
        let base = get_drop_interval_ms(self.level);
        if self.held.soft_drop {
            get_soft_drop_interval_ms(base)
        } else {
            base
        }
    }

    fn update_line_clear(&mut self, dt_ms: u32) {
        let outcome = self.board.tick(dt_ms);
        if !outcome.animation_done {
            return;
        }

        let t_spin = std::mem::take(&mut self.pending_t_spin);
        let qualifies = qualifies_for_b2b(outcome.is_tetris, t_spin);
        let b2b_applied = qualifies && self.back_to_back > 0;
        self.back_to_back = if qualifies { self.back_to_back + 1 } else { 0 };
        self.combo += 1;

        let result = calculate_clear_score(outcome.score_award, self.level, self.combo, b2b_applied);
        self.score += result.total;
        self.lines += outcome.lines_cleared;

        self.stats.max_combo = self.stats.max_combo.max(self.combo);
        if b2b_applied {
            self.stats.back_to_back_clears += 1;
        }
        self.events.push(GameEvent::LineClear {
            lines: outcome.lines_cleared,
        });
        if outcome.is_tetris {
            self.stats.tetrises += 1;
            self.events.push(GameEvent::Tetris);
        }
        debug!(
            lines = outcome.lines_cleared,
            points = result.total,
            combo = self.combo,
            back_to_back = self.back_to_back,
            "lines cleared"
        );

        let level = level_after_clear(
            self.level,
            self.lines,
            self.config.lines_per_level,
            self.config.max_level,
        );
        if level != self.level {
            self.level = level;
            self.events.push(GameEvent::LevelUp { level });
            info!(level, lines = self.lines, "level up");
        }

        if self.config.mode == GameMode::Victory && self.level >= self.victory_level() {
            self.finish(true);
            return;
        }

        self.state = SessionState::Playing;
        // The board changed under the piece dealt at lock time.
        self.active = self.spawn(self.active.kind);
    }

    fn victory_level(&self) -> u32 {
        VICTORY_LEVEL.min(self.config.max_level)
    }

    fn shift(&mut self, dx: i8) -> bool {
        if !self.active.translate(dx, 0, &self.board) {
            return false;
        }
        self.lock_timer_ms = 0;
        self.events.push(GameEvent::Move);
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.active.rotate(clockwise, &self.board) {
            return false;
        }
        self.lock_timer_ms = 0;
        self.events.push(GameEvent::Rotate);
        true
    }

    fn hard_drop(&mut self) -> bool {
        let rows = self.active.hard_drop(&self.board);
        self.score += calculate_drop_score(rows, true);
        self.events.push(GameEvent::Drop { rows });
        self.lock_active();
        true
    }

    /// Swap the active piece with the hold slot, once per lock.
    pub fn hold(&mut self) -> bool {
        if !self.config.hold_enabled || !self.can_hold || self.state != SessionState::Playing {
            return false;
        }

        let current = self.active.kind;
        let next = match self.hold.replace(current) {
            Some(kind) => kind,
            None => self.deal(),
        };
        self.active = self.spawn(next);
        self.can_hold = false;
        self.lock_pending = false;
        self.lock_timer_ms = 0;
        self.drop_timer_ms = 0;

        self.stats.holds += 1;
        self.events.push(GameEvent::Hold);
        true
    }

    /// Lock the active piece and deal the next one.
    fn lock_active(&mut self) {
        let t_spin = self.active.take_t_spin();
        if t_spin {
            self.score += t_spin_bonus(self.level);
            self.stats.t_spins += 1;
            self.events.push(GameEvent::TSpin);
        }

        if !self.board.lock(&self.active) {
            debug!(kind = self.active.kind.as_str(), y = self.active.y, "locked above board");
            self.finish(false);
            return;
        }

        self.stats.pieces_locked += 1;
        self.events.push(GameEvent::Lock);

        if self.board.is_clearing() {
            self.state = SessionState::LineClearing;
            self.pending_t_spin = t_spin;
        } else {
            self.combo = 0;
        }

        let kind = self.deal();
        self.active = self.spawn(kind);
        self.can_hold = true;
        self.lock_pending = false;
        self.lock_timer_ms = 0;
        self.drop_timer_ms = 0;
    }

    /// Pull the front of the preview and top it up from the bag.
    fn deal(&mut self) -> PieceKind {
        let drawn = self.randomizer.next();
        self.next_queue.push_back(drawn);
        self.next_queue.pop_front().unwrap_or(drawn)
    }

    /// Place `kind` at the spawn origin, raised into the hidden rows if needed.
    fn spawn(&self, kind: PieceKind) -> Piece {
        let mut piece = Piece::spawn(kind, self.board.width());
        while piece.y > -SPAWN_BUFFER_ROWS && self.board.check_collision(&piece, piece.x, piece.y) {
            piece.y -= 1;
        }
        if piece.y < 0 {
            debug!(kind = kind.as_str(), y = piece.y, "spawn raised above board");
        }
        piece
    }

    fn finish(&mut self, victory: bool) {
        self.state = if victory {
            SessionState::Victory
        } else {
            SessionState::GameOver
        };
        self.lock_pending = false;
        self.events.push(if victory {
            GameEvent::Victory
        } else {
            GameEvent::GameOver
        });

        info!(
            player = %self.player,
            score = self.score,
            level = self.level,
            lines = self.lines,
            elapsed_ms = self.elapsed_ms,
            victory,
            "session finished"
        );
        self.summary = Some(GameSummary {
            player: self.player.clone(),
            score: self.score,
            level: self.level,
            lines: self.lines,
            elapsed_ms: self.elapsed_ms,
            victory,
            seed: self.randomizer.seed(),
            stats: self.stats,
        });
    }

    /// Take the buffered events.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Hand buffered events to `listener`.
    pub fn dispatch_events(&mut self, listener: &mut impl EventListener) {
        for event in self.events.drain(..) {
            listener.on_event(event);
        }
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    pub fn take_summary(&mut self) -> Option<GameSummary> {
        self.summary.take()
    }

    /// Submit the final summary once, if the session has ended.
    pub fn report_summary(&mut self, sink: &mut impl SummarySink) -> bool {
        match self.summary.take() {
            Some(summary) => {
                sink.submit(&summary);
                true
            }
            None => false,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.clearing_rows.clear();
        out.clearing_rows.extend_from_slice(self.board.pending_rows());
        out.clear_progress = self.board.clear_progress();

        let show_active = matches!(self.state, SessionState::Playing | SessionState::Paused);
        out.active = show_active.then(|| ActiveSnapshot::from(&self.active));
        out.ghost_y = (show_active && self.config.ghost_enabled)
            .then(|| self.active.ghost_row(&self.board));

        out.hold = self.hold;
        out.can_hold = self.can_hold && self.config.hold_enabled;
        out.next_queue.clear();
        out.next_queue.extend(self.next_queue.iter().copied());
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.back_to_back = self.back_to_back;
        out.state = self.state;
        out.danger = self.board.is_topped_out();
        out.elapsed_ms = self.elapsed_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn session() -> Session {
        Session::new(GameConfig::default(), "tester", 12345)
    }

    fn place(session: &mut Session, kind: PieceKind, rotation: Rotation, x: i8, y: i8) {
        let mut piece = Piece::new(kind, x, y);
        piece.rotation = rotation;
        session.active = piece;
    }

    fn tap(session: &mut Session, action: GameAction) -> bool {
        let changed = session.press(action);
        session.release(action);
        changed
    }

    fn fill_rows_except(session: &mut Session, rows: std::ops::Range<i8>, hole: i8) {
        for y in rows {
            for x in 0..10 {
                if x != hole {
                    session.board_mut().set(x, y, Some(PieceKind::Z));
                }
            }
        }
    }

    #[test]
    fn test_new_session() {
        let s = session();
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.lines(), 0);
        assert_eq!(s.next_queue().count(), 5);
        assert!(s.hold_piece().is_none());
        assert!(s.can_hold());
        assert_eq!((s.active().x, s.active().y), (3, 0));
    }

    #[test]
    fn test_spawn_follows_preview() {
        let mut s = session();
        let first = s.active().kind;
        let next = s.next_queue().next().unwrap();
        assert!(tap(&mut s, GameAction::HardDrop));
        assert_eq!(s.active().kind, next);
        assert_ne!(s.active().kind, first);
        assert_eq!(s.next_queue().count(), 5);
    }

    #[test]
    fn test_single_line_clear_scores_by_level() {
        let mut s = session();
        fill_rows_except(&mut s, 19..20, 0);
        s.board_mut().set(0, 19, None);
        s.board_mut().set(1, 19, None);
        place(&mut s, PieceKind::O, Rotation::North, -1, 0);

        assert!(tap(&mut s, GameAction::HardDrop));
        assert_eq!(s.state(), SessionState::LineClearing);
        assert_eq!(s.board().pending_rows(), &[19]);
        let before = s.score();

        s.update(199);
        assert_eq!(s.state(), SessionState::LineClearing);
        s.update(1);
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.score() - before, 100);
        assert_eq!(s.combo(), 1);
        assert_eq!(s.lines(), 1);
        // The O's top half fell into the cleared row.
        assert_eq!(s.board().get(0, 19), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_back_to_back_tetris() {
        let mut s = session();

        fill_rows_except(&mut s, 16..20, 9);
        place(&mut s, PieceKind::I, Rotation::East, 7, 0);
        tap(&mut s, GameAction::HardDrop);
        s.update(200);
        assert_eq!(s.back_to_back(), 1);
        assert_eq!(s.stats().tetrises, 1);
        let after_first = s.score();

        fill_rows_except(&mut s, 16..20, 9);
        place(&mut s, PieceKind::I, Rotation::East, 7, 0);
        tap(&mut s, GameAction::HardDrop);
        let dropped = s.score();
        s.update(200);

        assert_eq!(dropped - after_first, 32);
        // 800 * 3/2 * level 1, plus combo 2 * 50.
        assert_eq!(s.score() - dropped, 1200 + 100);
        assert_eq!(s.back_to_back(), 2);
        assert_eq!(s.combo(), 2);
        assert_eq!(s.stats().back_to_back_clears, 1);
    }

    #[test]
    fn test_plain_clear_breaks_back_to_back_and_empty_lock_breaks_combo() {
        let mut s = session();
        fill_rows_except(&mut s, 16..20, 9);
        place(&mut s, PieceKind::I, Rotation::East, 7, 0);
        tap(&mut s, GameAction::HardDrop);
        s.update(200);
        assert_eq!(s.back_to_back(), 1);

        fill_rows_except(&mut s, 19..20, 9);
        place(&mut s, PieceKind::I, Rotation::East, 7, 0);
        tap(&mut s, GameAction::HardDrop);
        s.update(200);
        assert_eq!(s.back_to_back(), 0);
        assert_eq!(s.combo(), 2);

        place(&mut s, PieceKind::O, Rotation::North, 3, 0);
        tap(&mut s, GameAction::HardDrop);
        assert_eq!(s.combo(), 0);
    }

    #[test]
    fn test_t_spin_double() {
        let mut s = session();
        fill_rows_except(&mut s, 19..20, 4);
        for x in (0..3).chain(6..10) {
            s.board_mut().set(x, 18, Some(PieceKind::Z));
        }
        s.board_mut().set(3, 17, Some(PieceKind::Z));
        place(&mut s, PieceKind::T, Rotation::East, 3, 17);

        assert!(tap(&mut s, GameAction::RotateCw));
        assert!(s.active().is_t_spin());
        assert_eq!((s.active().x, s.active().y), (3, 17));

        tap(&mut s, GameAction::HardDrop);
        assert_eq!(s.score(), 400);
        assert_eq!(s.board().pending_rows(), &[19, 18]);
        s.update(200);

        assert_eq!(s.score(), 400 + 300);
        assert_eq!(s.back_to_back(), 1);
        assert_eq!(s.stats().t_spins, 1);
        let events: Vec<_> = s.drain_events().collect();
        assert!(events.contains(&GameEvent::TSpin));
        assert!(events.contains(&GameEvent::LineClear { lines: 2 }));
    }

    #[test]
    fn test_hold_once_per_lock() {
        let mut s = session();
        let first = s.active().kind;
        let next = s.next_queue().next().unwrap();

        assert!(tap(&mut s, GameAction::Hold));
        assert_eq!(s.hold_piece(), Some(first));
        assert_eq!(s.active().kind, next);
        assert!(!s.can_hold());

        assert!(!tap(&mut s, GameAction::Hold));
        assert_eq!(s.hold_piece(), Some(first));
        assert_eq!(s.active().kind, next);

        tap(&mut s, GameAction::HardDrop);
        assert!(s.can_hold());
        let current = s.active().kind;
        assert!(tap(&mut s, GameAction::Hold));
        assert_eq!(s.active().kind, first);
        assert_eq!(s.hold_piece(), Some(current));
        assert_eq!(s.active().rotation, Rotation::North);
    }

    #[test]
    fn test_hold_disabled() {
        let config = GameConfig {
            hold_enabled: false,
            ..GameConfig::default()
        };
        let mut s = Session::new(config, "tester", 1);
        assert!(!tap(&mut s, GameAction::Hold));
        assert!(s.hold_piece().is_none());
    }

    #[test]
    fn test_lock_above_board_is_game_over() {
        let mut s = session();
        fill_rows_except(&mut s, 1..2, 9);
        place(&mut s, PieceKind::T, Rotation::North, 3, -1);

        tap(&mut s, GameAction::HardDrop);
        assert_eq!(s.state(), SessionState::GameOver);
        let summary = s.summary().cloned().unwrap();
        assert_eq!(summary.player, "tester");
        assert!(!summary.victory);

        // Nothing moves once the session is over.
        let snap = s.snapshot();
        s.update(10_000);
        assert!(!tap(&mut s, GameAction::MoveLeft));
        assert_eq!(s.snapshot(), snap);
    }

    #[test]
    fn test_report_summary_only_once() {
        let mut s = session();
        fill_rows_except(&mut s, 1..2, 9);
        place(&mut s, PieceKind::T, Rotation::North, 3, -1);
        tap(&mut s, GameAction::HardDrop);

        let mut sink: Vec<GameSummary> = Vec::new();
        assert!(s.report_summary(&mut sink));
        assert!(!s.report_summary(&mut sink));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_lock_delay_after_failed_drop() {
        let mut s = session();
        place(&mut s, PieceKind::O, Rotation::North, 3, 18);

        s.update(1000);
        assert!(s.is_lock_pending());
        assert_eq!(s.stats().pieces_locked, 0);

        s.update(499);
        assert_eq!(s.stats().pieces_locked, 0);
        s.update(1);
        assert_eq!(s.stats().pieces_locked, 1);
        assert!(!s.is_lock_pending());
    }

    #[test]
    fn test_move_resets_lock_timer() {
        let mut s = session();
        place(&mut s, PieceKind::O, Rotation::North, 3, 18);
        s.update(1000);
        s.update(400);

        assert!(tap(&mut s, GameAction::MoveLeft));
        s.update(400);
        assert_eq!(s.stats().pieces_locked, 0);
        s.update(100);
        assert_eq!(s.stats().pieces_locked, 1);
    }

    #[test]
    fn test_sliding_off_ledge_cancels_lock() {
        let mut s = session();
        s.board_mut().set(4, 19, Some(PieceKind::Z));
        s.board_mut().set(5, 19, Some(PieceKind::Z));
        place(&mut s, PieceKind::O, Rotation::North, 3, 17);

        s.update(1000);
        assert!(s.is_lock_pending());
        // Clear of the ledge after three steps right.
        for _ in 0..3 {
            tap(&mut s, GameAction::MoveRight);
        }
        s.update(16);
        assert!(!s.is_lock_pending());
    }

    #[test]
    fn test_pause_freezes_timers() {
        let mut s = session();
        let y = s.active().y;
        s.update(900);

        assert!(tap(&mut s, GameAction::Pause));
        assert_eq!(s.state(), SessionState::Paused);
        s.update(5000);
        assert_eq!(s.active().y, y);
        assert_eq!(s.elapsed_ms(), 900);
        assert!(!tap(&mut s, GameAction::HardDrop));

        assert!(tap(&mut s, GameAction::Pause));
        s.update(100);
        assert_eq!(s.active().y, y + 1);
        assert_eq!(s.elapsed_ms(), 1000);
    }

    #[test]
    fn test_das_then_arr() {
        let mut s = session();
        place(&mut s, PieceKind::T, Rotation::North, 3, 0);

        assert!(s.press(GameAction::MoveRight));
        assert_eq!(s.active().x, 4);

        s.update(169);
        assert_eq!(s.active().x, 4);
        // Exactly at DAS: no excess yet.
        s.update(1);
        assert_eq!(s.active().x, 4);
        s.update(50);
        assert_eq!(s.active().x, 5);
        s.update(100);
        assert_eq!(s.active().x, 7);

        s.release(GameAction::MoveRight);
        place(&mut s, PieceKind::T, Rotation::North, 3, 0);
        s.update(500);
        assert_eq!(s.active().x, 3);
    }

    #[test]
    fn test_zero_arr_slides_to_wall() {
        let config = GameConfig {
            arr_ms: 0,
            ..GameConfig::default()
        };
        let mut s = Session::new(config, "tester", 1);
        place(&mut s, PieceKind::T, Rotation::North, 3, 0);

        s.press(GameAction::MoveLeft);
        assert_eq!(s.active().x, 2);
        s.update(171);
        assert_eq!(s.active().x, 0);
    }

    #[test]
    fn test_both_directions_held_do_not_repeat() {
        let mut s = session();
        place(&mut s, PieceKind::T, Rotation::North, 3, 0);
        s.press(GameAction::MoveLeft);
        s.press(GameAction::MoveRight);
        assert_eq!(s.active().x, 3);
        s.update(500);
        assert_eq!(s.active().x, 3);
    }

    #[test]
    fn test_repeated_press_is_idempotent() {
        let mut s = session();
        place(&mut s, PieceKind::T, Rotation::North, 3, 0);
        assert!(s.press(GameAction::MoveLeft));
        assert!(!s.press(GameAction::MoveLeft));
        assert_eq!(s.active().x, 2);
    }

    #[test]
    fn test_soft_drop_speeds_gravity_and_scores() {
        let mut s = session();
        let y = s.active().y;
        s.press(GameAction::SoftDrop);
        assert_eq!(s.drop_interval_ms(), 50);

        s.update(50);
        assert_eq!(s.active().y, y + 1);
        assert_eq!(s.score(), 1);

        s.release(GameAction::SoftDrop);
        assert_eq!(s.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_level_up_and_victory() {
        let config = GameConfig {
            lines_per_level: 1,
            max_level: 2,
            mode: GameMode::Victory,
            ..GameConfig::default()
        };
        let mut s = Session::new(config, "tester", 1);
        fill_rows_except(&mut s, 19..20, 9);
        place(&mut s, PieceKind::I, Rotation::East, 7, 0);
        tap(&mut s, GameAction::HardDrop);
        s.update(200);

        assert_eq!(s.level(), 2);
        assert_eq!(s.state(), SessionState::Victory);
        assert!(s.summary().unwrap().victory);
        let events: Vec<_> = s.drain_events().collect();
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(events.last(), Some(&GameEvent::Victory));
    }

    #[test]
    fn test_endless_mode_caps_level() {
        let config = GameConfig {
            lines_per_level: 1,
            max_level: 2,
            ..GameConfig::default()
        };
        let mut s = Session::new(config, "tester", 1);
        for _ in 0..3 {
            fill_rows_except(&mut s, 19..20, 9);
            place(&mut s, PieceKind::I, Rotation::East, 7, 0);
            tap(&mut s, GameAction::HardDrop);
            s.update(200);
        }
        assert_eq!(s.level(), 2);
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn test_spawn_raised_when_blocked() {
        let mut s = session();
        for x in 3..7 {
            s.board_mut().set(x, 1, Some(PieceKind::Z));
        }
        let piece = s.spawn(PieceKind::T);
        assert_eq!(piece.y, -1);
        assert!(!s.board().check_collision(&piece, piece.x, piece.y));
    }

    #[test]
    fn test_snapshot_hides_ghost_when_disabled() {
        let config = GameConfig {
            ghost_enabled: false,
            ..GameConfig::default()
        };
        let s = Session::new(config, "tester", 1);
        let snap = s.snapshot();
        assert!(snap.active.is_some());
        assert!(snap.ghost_y.is_none());

        let snap = session().snapshot();
        assert!(snap.ghost_y.is_some());
        assert_eq!(snap.board.len(), 200);
    }
}
