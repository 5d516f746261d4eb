/// Rendering layer: all terminal I/O lives here.
///
/// `Canvas` rasterises the core's draw calls onto a grid of terminal cells;
/// `render` then writes that grid plus the border, HUD and overlays.  No
/// game logic is performed here.

use std::io::Write;
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use invaders::entities::{GameStatus, Level, Rect, SessionState};
use invaders::scene::{self, lives_label, Paint, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BONUS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn style_of(paint: Paint) -> Option<(Color, &'static str)> {
    match paint {
        Paint::Background => None,
        Paint::Player => Some((C_PLAYER, "█")),
        Paint::Enemy => Some((C_ENEMY, "▓")),
        Paint::Bonus => Some((C_BONUS, "▒")),
        Paint::PlayerShot => Some((C_BULLET_PLAYER, "║")),
        Paint::EnemyShot => Some((C_BULLET_ENEMY, "↓")),
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A `cols × rows` cell grid covering the whole playfield.
pub struct Canvas {
    cols: usize,
    rows: usize,
    cell_w: f32,
    cell_h: f32,
    cells: Vec<Paint>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, playfield_w: f32, playfield_h: f32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell_w: playfield_w / cols as f32,
            cell_h: playfield_h / rows as f32,
            cells: vec![Paint::Background; cols * rows],
        }
    }

    /// Cells touched by the half-open interval `[lo, hi)`.
    fn span(lo: f32, hi: f32, cell: f32, n: usize) -> Range<usize> {
        let start = ((lo / cell).floor().max(0.0) as usize).min(n);
        let end = ((hi / cell).ceil().max(0.0) as usize).min(n);
        start..end.max(start)
    }

    fn paint(&mut self, col: usize, row: usize, paint: Paint) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = paint;
        }
    }

    fn cell_center(&self, col: usize, row: usize) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_w,
            (row as f32 + 0.5) * self.cell_h,
        )
    }

    /// Painted cells, row-major, skipping the background.
    fn painted(&self) -> impl Iterator<Item = (usize, usize, Paint)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, &p)| {
            (p != Paint::Background).then_some((i % cols, i / cols, p))
        })
    }
}

/// Even-odd rule.
fn contains(points: &[(f32, f32)], (px, py): (f32, f32)) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Surface for Canvas {
    fn clear(&mut self, paint: Paint) {
        self.cells.fill(paint);
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        for row in Self::span(rect.y, rect.bottom(), self.cell_h, self.rows) {
            for col in Self::span(rect.x, rect.right(), self.cell_w, self.cols) {
                self.paint(col, row, paint);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint) {
        if points.is_empty() {
            return;
        }
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
            |(lx, hx, ly, hy), &(x, y)| (lx.min(x), hx.max(x), ly.min(y), hy.max(y)),
        );

        let mut any = false;
        for row in Self::span(min_y, max_y, self.cell_h, self.rows) {
            for col in Self::span(min_x, max_x, self.cell_w, self.cols) {
                if contains(points, self.cell_center(col, row)) {
                    self.paint(col, row, paint);
                    any = true;
                }
            }
        }

        // Shapes smaller than a cell still get one cell
        if !any && min_x >= 0.0 && min_y >= 0.0 {
            let col = (((min_x + max_x) / 2.0) / self.cell_w) as usize;
            let row = (((min_y + max_y) / 2.0) / self.cell_h) as usize;
            self.paint(col, row, paint);
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `width × height` terminal.
pub fn render<W: Write>(
    out: &mut W,
    state: &SessionState,
    (width, height): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;
    draw_playfield(out, state, width, height)?;
    draw_controls_hint(out, height)?;

    if state.status.is_terminal() {
        draw_end_overlay(out, state, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &SessionState, width: u16) -> std::io::Result<()> {
    // Score: left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    // Level: centre
    let (level_str, level_color) = match state.level {
        Level::Easy => ("[ EASY ]", Color::Green),
        Level::Medium => ("[ MEDIUM ]", Color::Yellow),
        Level::Hard => ("[ HARD ]", Color::Red),
    };
    let lx = (width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(level_str))?;

    // Lives: right
    let lives_str = lives_label(state.lives);
    let rx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_playfield<W: Write>(
    out: &mut W,
    state: &SessionState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    // Inside the border: columns 1..w-1, rows 2..h-2
    let cols = width.saturating_sub(2) as usize;
    let rows = height.saturating_sub(4) as usize;
    let mut canvas = Canvas::new(cols, rows, state.rules.width, state.rules.height);
    scene::draw(&mut canvas, state);

    for (col, row, paint) in canvas.painted() {
        if let Some((color, glyph)) = style_of(paint) {
            out.queue(cursor::MoveTo(1 + col as u16, 2 + row as u16))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Win / loss overlay ────────────────────────────────────────────────────────

fn draw_end_overlay<W: Write>(
    out: &mut W,
    state: &SessionState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (banner, color) = match state.status {
        GameStatus::Won => ("║   EARTH IS SAFE    ║", Color::Green),
        _ => ("║    GAME  OVER      ║", Color::Red),
    };
    let score_line = format!("Final Score: {:>6}", state.score);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", color),
        (banner, color),
        ("╚════════════════════╝", color),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
