//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.  One tile is drawn as two columns by one
//! row so the grid keeps a roughly square aspect.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use tile_runner::entities::{Body, GameState, GameStatus};
use tile_runner::level::{Tile, TILE};
use tile_runner::scenery::Cloud;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_SKY_CLOUD: Color = Color::Grey;
const C_PLAYER: Color = Color::Red;
const C_PLAYER_FLICKER: Color = Color::Yellow;
const C_ENEMY: Color = Color::Green;
const C_COIN: Color = Color::Yellow;
const C_FLAG_POLE: Color = Color::White;
const C_FLAG: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// First terminal row of the playfield (row 0 is the HUD, row 1 the border).
const PLAY_TOP: u16 = 2;

/// Terminal columns per tile.
const CELL_COLS: f32 = 2.0;

/// Terminal area plus the camera position for this frame.
struct View {
    width: u16,
    height: u16,
    camera_x: f32,
}

impl View {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        let camera_x = state.camera_x(view_width_px(width));
        View {
            width,
            height,
            camera_x,
        }
    }

    /// Last playfield row (the bottom border sits just below it).
    fn play_bottom(&self) -> u16 {
        self.height.saturating_sub(3)
    }

    /// Terminal cell for a world-space point, if it falls inside the playfield.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = 1.0 + ((x - self.camera_x) / TILE * CELL_COLS).floor();
        let row = PLAY_TOP as f32 + (y / TILE).floor();
        if col < 1.0 || col > self.width.saturating_sub(2) as f32 {
            return None;
        }
        if row < PLAY_TOP as f32 || row > self.play_bottom() as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

/// World pixels visible across a terminal `width` columns wide.
fn view_width_px(width: u16) -> f32 {
    width.saturating_sub(2) as f32 / CELL_COLS * TILE
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    clouds: &[Cloud],
    best_score: u32,
    (width, height): (u16, u16),
) -> std::io::Result<()> {
    let view = View::new(state, width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state, &view)?;
    draw_clouds(out, clouds, &view)?;
    draw_tiles(out, state, &view)?;

    for coin in state.coins.iter().filter(|c| c.is_visible()) {
        let glyph = if coin.collected { "+1" } else { "()" };
        put(out, &view, coin.x, coin.y, glyph, C_COIN)?;
    }
    draw_flag(out, state, &view)?;
    for enemy in state.enemies.iter().filter(|e| e.body.alive) {
        draw_enemy(out, &view, &enemy.body)?;
    }
    draw_player(out, state, &view)?;
    draw_controls_hint(out, &view)?;

    if state.status != GameStatus::Playing {
        draw_overlay(out, state, best_score, &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    view: &View,
    x: f32,
    y: f32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(x, y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let w = view.width as usize;
    let bottom = view.play_bottom() + 1;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, PLAY_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in PLAY_TOP..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &View) -> std::io::Result<()> {
    let hud = state.hud();
    let text = format!(
        "MARIO {:06}   COINS x{:<3}  WORLD {:<10}  TIME {:>3}   LIVES {}",
        hud.score, hud.coins, hud.world, hud.time_left, hud.lives
    );
    let max = view.width.saturating_sub(2) as usize;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(text.chars().take(max).collect::<String>()))?;
    Ok(())
}

// ── Scenery & level ───────────────────────────────────────────────────────────

fn draw_clouds<W: Write>(out: &mut W, clouds: &[Cloud], view: &View) -> std::io::Result<()> {
    for cloud in clouds {
        let puff = "░".repeat(cloud.span as usize * CELL_COLS as usize);
        put(out, view, cloud.x, cloud.y, &puff, C_SKY_CLOUD)?;
    }
    Ok(())
}

fn tile_style(tile: Tile) -> Option<(&'static str, Color)> {
    match tile {
        Tile::Empty => None,
        Tile::Ground => Some(("▓▓", Color::DarkYellow)),
        Tile::Brick => Some(("▒▒", Color::DarkRed)),
        Tile::Stone => Some(("██", Color::DarkGrey)),
        Tile::Pipe => Some(("║║", Color::Green)),
        Tile::Question => Some(("??", Color::Yellow)),
        Tile::Used => Some(("[]", Color::Grey)),
    }
}

fn draw_tiles<W: Write>(out: &mut W, state: &GameState, view: &View) -> std::io::Result<()> {
    let grid = &state.level.grid;
    let first_col = (view.camera_x / TILE).floor() as usize;
    let visible = (view_width_px(view.width) / TILE).ceil() as usize + 1;

    for row in 0..grid.rows() {
        let tiles = grid.row(row);
        for col in first_col..(first_col + visible).min(grid.cols()) {
            if let Some((glyph, color)) = tile_style(tiles[col]) {
                let x = col as f32 * TILE;
                let y = row as f32 * TILE;
                put(out, view, x, y, glyph, color)?;
            }
        }
    }
    Ok(())
}

fn draw_flag<W: Write>(out: &mut W, state: &GameState, view: &View) -> std::io::Result<()> {
    let Some(flag) = &state.flag else {
        return Ok(());
    };
    let top = flag.y - flag.h;
    let mut y = top;
    while y < flag.y {
        put(out, view, flag.x, y, "|", C_FLAG_POLE)?;
        y += TILE;
    }
    put(out, view, flag.x - TILE / 2.0, top, "◀", C_FLAG)?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Tile rows covered by the body, top to bottom.
fn body_rows(body: &Body) -> std::ops::RangeInclusive<i32> {
    let first = (body.top() / TILE).floor() as i32;
    let last = ((body.bottom() - 1.0) / TILE).floor() as i32;
    first..=last
}

fn draw_enemy<W: Write>(out: &mut W, view: &View, body: &Body) -> std::io::Result<()> {
    for row in body_rows(body) {
        put(out, view, body.x, row as f32 * TILE, "▟▙", C_ENEMY)?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &View) -> std::io::Result<()> {
    let p = &state.player;
    let flicker = p.invincible_timer > 0 && (p.invincible_timer / 4) % 2 == 0;
    let color = if flicker { C_PLAYER_FLICKER } else { C_PLAYER };
    let rows = body_rows(&p.body);
    let head = *rows.start();
    for row in rows {
        let glyph = if row == head { "◓◓" } else { "██" };
        put(out, view, p.body.x, row as f32 * TILE, glyph, color)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE / Z : Jump   ENTER : Confirm   Q : Quit"))?;
    Ok(())
}

// ── State overlays ────────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    state: &GameState,
    best_score: u32,
    view: &View,
) -> std::io::Result<()> {
    let score = state.player.score;
    let lines: Vec<(String, Color)> = match state.status {
        GameStatus::Title => vec![
            ("╔════════════════════╗".into(), Color::Cyan),
            ("║   TILE  RUNNER     ║".into(), Color::Cyan),
            ("╚════════════════════╝".into(), Color::Cyan),
            (state.level.name.clone(), Color::White),
            (format!("Best Score: {best_score:>6}"), Color::Yellow),
            ("Press Enter to Start".into(), Color::White),
        ],
        GameStatus::LevelComplete => {
            let mut lines = vec![
                ("Course Clear!".to_string(), Color::Green),
                (state.level.name.clone(), Color::White),
            ];
            if let Some(next) = state.next_level_name() {
                lines.push((format!("Up Next: {next}"), Color::White));
            }
            lines
        }
        GameStatus::GameOver => vec![
            ("╔════════════════════╗".into(), Color::Red),
            ("║    GAME  OVER      ║".into(), Color::Red),
            ("╚════════════════════╝".into(), Color::Red),
            (format!("Final Score: {score:>6}"), Color::Yellow),
            ("Press Enter to try again".into(), Color::White),
        ],
        GameStatus::Victory => vec![
            ("Thank you for playing!".into(), Color::Green),
            (format!("Final Score: {score:>6}"), Color::Yellow),
            (best_line(score, best_score), Color::Yellow),
            ("Press Enter to return to the title screen".into(), Color::White),
        ],
        GameStatus::Playing => Vec::new(),
    };

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}

fn best_line(score: u32, best: u32) -> String {
    if score >= best && score > 0 {
        format!("★ NEW BEST: {score:>6} ★")
    } else {
        format!("Best Score:  {best:>6}")
    }
}
