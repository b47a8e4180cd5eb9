//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellView, PieceKind};

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(24, 24, 32);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const LOCKED_FG: Rgb = Rgb::new(150, 150, 160);

const CONTROLS: [(&str, &str); 7] = [
    ("←→ a d", "move"),
    ("↓ s", "soft drop"),
    ("↑ w x", "rotate"),
    ("space", "hard drop"),
    ("p esc", "pause"),
    ("r", "restart"),
    ("q", "quit"),
];

/// Terminal renderer for one game snapshot.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_controls: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
            show_controls: true,
        }
    }
}

/// Board frame placement inside the viewport
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
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let w = snap.width as u16 * self.cell_w + 2;
        let h = snap.height as u16 * self.cell_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w + 24) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            w - 2,
            h - 2,
            ' ',
            CellStyle::new(PLAY_BG, PLAY_BG),
        );
        fb.draw_box(
            frame.x,
            frame.y,
            w,
            h,
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        let active_kind = snap.active.map(|a| a.kind);
        for y in 0..snap.height as usize {
            for x in 0..snap.width as usize {
                let (ch, style) = match snap.cell(x, y) {
                    CellView::Empty => ('·', CellStyle::new(Rgb::new(70, 70, 80), PLAY_BG).dim()),
                    CellView::Locked => ('█', CellStyle::new(LOCKED_FG, PLAY_BG)),
                    CellView::Ghost => ('░', CellStyle::new(kind_rgb(active_kind), PLAY_BG).dim()),
                    CellView::Active => ('█', CellStyle::new(kind_rgb(active_kind), PLAY_BG).bold()),
                };
                self.fill_cell(fb, frame, x as u16, y as u16, ch, style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over() {
            self.draw_overlay(fb, frame, &["GAME OVER"], Some(snap.score), "r: restart");
        } else if snap.paused {
            self.draw_overlay(fb, frame, &["PAUSED"], None, "p: resume");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = frame.x + 1 + x * self.cell_w;
        let py = frame.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, v) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        if let Some(kind) = snap.next {
            let style = CellStyle::new(kind_rgb(Some(kind)), PANEL_BG);
            let shape = Shape::canonical(kind);
            for (c, r) in shape.offsets() {
                let px = panel_x + c as u16 * self.cell_w;
                fb.fill_rect(px, y + r as u16, self.cell_w, 1, '█', style);
            }
            y += shape.rows() as u16;
        } else {
            fb.put_str(panel_x, y, "-", value);
            y += 1;
        }

        if !self.show_controls {
            return;
        }
        y += 1;
        let dim = value.dim();
        for (keys, what) in CONTROLS {
            if y >= viewport.height {
                break;
            }
            let end = fb.put_str(panel_x, y, keys, value);
            fb.put_str(end.max(panel_x + 8), y, what, dim);
            y += 1;
        }
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        title: &[&str],
        score: Option<u32>,
        hint: &str,
    ) {
        let title_style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        let text_style = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let center = |text_w: u16| frame.x + frame.w.saturating_sub(text_w) / 2;

        let mut y = frame.y + frame.h / 2 - 1;
        for line in title {
            fb.put_str(center(line.chars().count() as u16), y, line, title_style);
            y += 1;
        }
        if let Some(points) = score {
            let digits = points.checked_ilog10().unwrap_or(0) as u16 + 1;
            let x = center(6 + digits);
            let end = fb.put_str(x, y, "SCORE ", text_style);
            fb.put_u32(end, y, points, text_style);
            y += 1;
        }
        fb.put_str(center(hint.chars().count() as u16), y, hint, text_style.dim());
    }
}

fn kind_rgb(kind: Option<PieceKind>) -> Rgb {
    kind.map(|k| Rgb::from(k.color()))
        .unwrap_or(Rgb::new(220, 220, 220))
}
