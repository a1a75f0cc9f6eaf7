//! GameView: draws a `GameSnapshot` into a framebuffer.
//!
//! Pure, no I/O. The board is drawn two columns per cell to make up for the
//! usual terminal glyph aspect ratio; the side panel sits to its right.

use crate::core::{get_shape, GameSnapshot, SessionState};
use crate::feed::EventFeed;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::PieceKind;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub player: String,
    pub score: u32,
}

/// Everything on screen that isn't part of the session itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud<'a> {
    pub player: &'a str,
    pub feed: Option<&'a EventFeed>,
    pub personal_best: Option<u32>,
    pub top_scores: &'a [ScoreLine],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const FLASH: Rgb = Rgb::new(255, 255, 255);
const PANEL_MIN_W: u16 = 12;

pub struct GameView {
    cell_w: u16,
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

/// Top-left of the board frame and its size.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into a reused framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_hud(snap, &Hud::default(), viewport, fb);
    }

    pub fn render_into_with_hud(
        &self,
        snap: &GameSnapshot,
        hud: &Hud<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = snap.width as u16 * self.cell_w;
        let board_h = snap.height as u16 * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(board_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: board_w + 2,
            h: board_h + 2,
        };

        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', CellStyle::new(PLAY_BG, PLAY_BG));

        let border_fg = if snap.danger {
            Rgb::new(220, 70, 70)
        } else {
            Rgb::new(200, 200, 200)
        };
        draw_border(fb, frame, CellStyle::new(border_fg, Rgb::new(0, 0, 0)));

        self.draw_board(fb, snap, frame);
        self.draw_pieces(fb, snap, frame);
        self.draw_side_panel(fb, snap, hud, viewport, frame);

        match snap.state {
            SessionState::Paused => draw_overlay(fb, frame, "PAUSED", None),
            SessionState::GameOver => draw_overlay(fb, frame, "GAME OVER", Some("R restart  Q quit")),
            SessionState::Victory => draw_overlay(fb, frame, "VICTORY", Some("R restart  Q quit")),
            SessionState::Playing | SessionState::LineClearing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();

        for y in 0..snap.height as i8 {
            let clearing = snap.clearing_rows.contains(&(y as usize));
            for x in 0..snap.width as i8 {
                match snap.cell(x, y) {
                    Some(kind) => {
                        let mut fg = piece_color(kind);
                        if clearing {
                            fg = fg.lerp(FLASH, snap.clear_progress);
                        }
                        let style = CellStyle::new(fg, PLAY_BG).bold();
                        self.fill_cell(fb, frame, x as u16, y as u16, '█', style);
                    }
                    None => self.fill_cell(fb, frame, x as u16, y as u16, '·', empty),
                }
            }
        }
    }

    fn draw_pieces(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
        let Some(active) = snap.active else {
            return;
        };
        let shape = get_shape(active.kind, active.rotation);
        let visible = |x: i8, y: i8| x >= 0 && y >= 0 && x < snap.width as i8 && y < snap.height as i8;

        if let Some(ghost_y) = snap.ghost_y {
            let style = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
            for &(dx, dy) in shape.iter() {
                let (x, y) = (active.x + dx, ghost_y + dy);
                if visible(x, y) {
                    self.fill_cell(fb, frame, x as u16, y as u16, '░', style);
                }
            }
        }

        let style = CellStyle::new(piece_color(active.kind), PLAY_BG).bold();
        for &(x, y) in active.cells.iter() {
            if visible(x, y) {
                self.fill_cell(fb, frame, x as u16, y as u16, '█', style);
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = frame.x + 1 + x * self.cell_w;
        let py = frame.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: &Hud<'_>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let x = frame.x.saturating_add(frame.w).saturating_add(2);
        if x >= viewport.width || viewport.width - x < PANEL_MIN_W {
            return;
        }

        let black = Rgb::new(0, 0, 0);
        let label = CellStyle::new(Rgb::new(220, 220, 220), black).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), black);
        let dim = value.dim();

        let mut y = frame.y;
        if !hud.player.is_empty() {
            fb.put_str(x, y, hud.player, label);
            y += 2;
        }

        for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, n, value);
            y += 3;
        }

        fb.put_str(x, y, "TIME", label);
        fb.put_clock(x, y + 1, snap.elapsed_ms, value);
        y += 3;

        let cx = fb.put_str(x, y, "COMBO ", label);
        fb.put_u32(cx, y, snap.combo, value);
        let cx = fb.put_str(x, y + 1, "B2B   ", label);
        fb.put_u32(cx, y + 1, snap.back_to_back, value);
        y += 3;

        fb.put_str(x, y, "HOLD", label);
        let hold_style = if snap.can_hold { value } else { dim };
        fb.put_str(x, y + 1, snap.hold.as_ref().map(PieceKind::as_str).unwrap_or("-"), hold_style);
        y += 3;

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        for kind in &snap.next_queue {
            fb.put_str(x, y, kind.as_str(), CellStyle::new(piece_color(*kind), black).bold());
            y += 1;
        }
        y += 1;

        if let Some(feed) = hud.feed {
            for callout in feed.callouts() {
                let style = CellStyle::new(Rgb::new(255, 220, 120), black).bold();
                let cx = fb.put_str(x, y, callout.text, style);
                if let Some(v) = callout.value {
                    fb.put_u32(cx + 1, y, v, style);
                }
                y += 1;
            }
            y += 1;
        }

        if let Some(best) = hud.personal_best {
            let cx = fb.put_str(x, y, "BEST ", label);
            fb.put_u32(cx, y, best, value);
            y += 2;
        }

        if !hud.top_scores.is_empty() {
            fb.put_str(x, y, "TOP", label);
            y += 1;
            for (rank, line) in hud.top_scores.iter().enumerate() {
                if y >= viewport.height {
                    break;
                }
                let cx = fb.put_u32(x, y, rank as u32 + 1, dim);
                let cx = fb.put_str(cx + 1, y, &line.player, value);
                fb.put_u32(cx + 1, y, line.score, value);
                y += 1;
            }
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, title: &str, hint: Option<&str>) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    let mid_y = frame.y.saturating_add(frame.h / 2);

    let centered = |text: &str| {
        let text_w = text.chars().count() as u16;
        frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2)
    };

    fb.put_str(centered(title), mid_y, title, style);
    if let Some(hint) = hint {
        fb.put_str(centered(hint), mid_y.saturating_add(2), hint, style.dim());
    }
}

pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            width: 10,
            height: 20,
            board: vec![None; 200],
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn frame_is_centered() {
        let fb = GameView::default().render(&snapshot(), Viewport::new(40, 24));
        // Board frame is 22 wide, 22 tall.
        assert_eq!(fb.get(9, 1).unwrap().ch, '┌');
        assert_eq!(fb.get(30, 22).unwrap().ch, '┘');
    }

    #[test]
    fn locked_cells_are_two_columns_wide() {
        let mut snap = snapshot();
        snap.set_cell(0, 19, Some(PieceKind::L));
        let fb = GameView::default()
            .with_anchor_y(AnchorY::Top)
            .render(&snap, Viewport::new(22, 22));

        let left = fb.get(1, 20).unwrap();
        let right = fb.get(2, 20).unwrap();
        assert_eq!((left.ch, right.ch), ('█', '█'));
        assert_eq!(left.style.fg, piece_color(PieceKind::L));
        assert_eq!(fb.get(3, 20).unwrap().ch, '·');
    }

    #[test]
    fn clearing_rows_flash_toward_white() {
        let mut snap = snapshot();
        snap.set_cell(0, 19, Some(PieceKind::J));
        snap.clearing_rows = vec![19];
        snap.clear_progress = 1.0;
        let fb = GameView::default()
            .with_anchor_y(AnchorY::Top)
            .render(&snap, Viewport::new(22, 22));
        assert_eq!(fb.get(1, 20).unwrap().style.fg, FLASH);
    }

    #[test]
    fn overlay_names_state() {
        let mut snap = snapshot();
        snap.state = SessionState::Victory;
        let fb = GameView::default().render(&snap, Viewport::new(60, 24));
        assert!(fb.contains_text("VICTORY"));
        assert!(fb.contains_text("R restart"));
    }
}
