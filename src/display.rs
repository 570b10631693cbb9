//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable `RenderSnapshot`.
//! No game logic is performed; this module only maps world pixels onto
//! terminal cells and translates the snapshot into terminal commands.

use std::io::Write;

use arena_brawler::config::Variant;
use arena_brawler::entities::ParticleColor;
use arena_brawler::geometry::{Facing, Rect, Vec2};
use arena_brawler::projectiles::Owner;
use arena_brawler::snapshot::{BodyView, Hud, RenderSnapshot, Tint};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLATFORM: Color = Color::DarkGrey;
const C_HAZARD: Color = Color::Yellow;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_ENERGY: Color = Color::Cyan;
const C_BEAM_PLAYER: Color = Color::Red;
const C_BEAM_ENEMY: Color = Color::Green;
const C_BOLT_PLAYER: Color = Color::Cyan;
const C_BOLT_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Player => Color::White,
        Tint::PlayerBlocking => Color::Blue,
        Tint::PlayerFlying => Color::Cyan,
        Tint::LightMelee => Color::Green,
        Tint::Ranged => Color::DarkYellow,
        Tint::HeavyMelee => Color::Magenta,
        Tint::Stunned => Color::Grey,
    }
}

fn particle_color(color: ParticleColor) -> Color {
    match color {
        ParticleColor::White => Color::White,
        ParticleColor::Yellow => Color::Yellow,
        ParticleColor::Orange => Color::DarkYellow,
        ParticleColor::Red => Color::Red,
        ParticleColor::Cyan => Color::Cyan,
    }
}

// ── World → cell mapping ──────────────────────────────────────────────────────

/// Play field: rows 2 ..= height-3, columns 1 ..= width-2.
struct Viewport {
    camera: Vec2,
    cell: Vec2,
    cols: i32,
    rows: i32,
}

impl Viewport {
    fn new(snap: &RenderSnapshot, width: u16, height: u16) -> Self {
        let cols = (width as i32 - 2).max(1);
        let rows = (height as i32 - 4).max(1);
        Viewport {
            camera: snap.camera,
            cell: Vec2::new(snap.viewport.x / cols as f32, snap.viewport.y / rows as f32),
            cols,
            rows,
        }
    }

    /// Terminal cell for a world point, if it is on screen.
    fn cell_of(&self, p: Vec2) -> Option<(u16, u16)> {
        let c = ((p.x - self.camera.x) / self.cell.x).floor() as i32;
        let r = ((p.y - self.camera.y) / self.cell.y).floor() as i32;
        if c < 0 || r < 0 || c >= self.cols || r >= self.rows {
            return None;
        }
        Some(((c + 1) as u16, (r + 2) as u16))
    }

    /// Every on-screen cell a world rectangle covers (at least one cell).
    fn cells_of(&self, rect: &Rect) -> Vec<(u16, u16)> {
        let c0 = ((rect.left() - self.camera.x) / self.cell.x).floor() as i32;
        let c1 = ((rect.right() - self.camera.x) / self.cell.x).ceil() as i32 - 1;
        let r0 = ((rect.top() - self.camera.y) / self.cell.y).floor() as i32;
        let r1 = ((rect.bottom() - self.camera.y) / self.cell.y).ceil() as i32 - 1;
        let mut cells = Vec::new();
        for r in r0.max(0)..=r1.max(r0).min(self.rows - 1) {
            for c in c0.max(0)..=c1.max(c0).min(self.cols - 1) {
                cells.push(((c + 1) as u16, (r + 2) as u16));
            }
        }
        cells
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(snap, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, &snap.hud, width)?;

    for rect in &snap.platforms {
        fill(out, &view, rect, "█", C_PLATFORM)?;
    }
    for rect in &snap.hazards {
        fill(out, &view, rect, "≈", C_HAZARD)?;
    }
    for particle in &snap.particles {
        if let Some((c, r)) = view.cell_of(particle.pos) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(style::SetForegroundColor(particle_color(particle.color)))?;
            out.queue(Print(if particle.radius > 2.5 { "•" } else { "·" }))?;
        }
    }
    // Player is first in `bodies`; draw enemies underneath it.
    for body in snap.bodies.iter().rev() {
        draw_body(out, &view, body)?;
    }
    for beam in &snap.beams {
        let color = match beam.owner {
            Owner::Player => C_BEAM_PLAYER,
            Owner::Enemy => C_BEAM_ENEMY,
        };
        draw_beam(out, &view, beam.start, beam.end, color)?;
    }
    for bolt in &snap.bolts {
        let color = match bolt.owner {
            Owner::Player => C_BOLT_PLAYER,
            Owner::Enemy => C_BOLT_ENEMY,
        };
        if let Some((c, r)) = view.cell_of(bolt.rect.center()) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print("●"))?;
        }
    }

    draw_controls_hint(out, &snap.hud, height)?;

    if snap.hud.game_over {
        draw_game_over(out, &snap.hud, width, height)?;
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

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn bar(value: f32, max: f32, cells: usize) -> String {
    let filled = ((value / max).clamp(0.0, 1.0) * cells as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("HP {} ", bar(hud.health, hud.max_health, 12))))?;
    out.queue(style::SetForegroundColor(C_HUD_ENERGY))?;
    out.queue(Print(format!("EN {} ", bar(hud.energy, hud.max_energy, 12))))?;
    if hud.combo > 0 {
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("x{} ", hud.combo)))?;
    }
    if hud.flying {
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print("[FLY]"))?;
    }

    let variant_str = match hud.variant {
        Variant::Platformer => "[ STREET ]",
        Variant::Arena => "[ ARENA ]",
    };
    let right_str = format!(
        "Wave {}/{}  Foes {:>2}  Score:{:>6}",
        hud.wave, hud.waves_total, hud.enemies_alive, hud.score
    );
    let rx = width.saturating_sub(right_str.chars().count() as u16 + variant_str.len() as u16 + 2);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(format!("{} ", variant_str)))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&right_str))?;

    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn fill<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for (c, r) in view.cells_of(rect) {
        out.queue(cursor::MoveTo(c, r))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

/// Body block with a facing marker, health bar on the row above.
fn draw_body<W: Write>(out: &mut W, view: &Viewport, body: &BodyView) -> std::io::Result<()> {
    let cells = view.cells_of(&body.rect);
    if cells.is_empty() {
        return Ok(());
    }
    fill(out, view, &body.rect, "▓", tint_color(body.tint))?;

    // Eye on the leading column of the top row
    let top = cells.iter().map(|&(_, r)| r).min().unwrap_or(0);
    let lead = match body.facing {
        Facing::Right => cells.iter().map(|&(c, _)| c).max(),
        Facing::Left => cells.iter().map(|&(c, _)| c).min(),
    };
    if let Some(col) = lead {
        out.queue(cursor::MoveTo(col, top))?;
        out.queue(style::SetForegroundColor(Color::Black))?;
        out.queue(style::SetBackgroundColor(tint_color(body.tint)))?;
        out.queue(Print("o"))?;
        out.queue(style::SetBackgroundColor(Color::Reset))?;
    }

    if top > 2 && body.health_ratio < 1.0 {
        let left = cells.iter().map(|&(c, _)| c).min().unwrap_or(1);
        let span = (cells.iter().map(|&(c, _)| c).max().unwrap_or(left) - left + 1) as usize;
        let filled = (body.health_ratio * span as f32).ceil() as usize;
        out.queue(cursor::MoveTo(left, top - 1))?;
        out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
        out.queue(Print(format!("{}{}", "▀".repeat(filled), " ".repeat(span - filled.min(span)))))?;
    }
    Ok(())
}

/// Sample the segment at half-cell steps.
fn draw_beam<W: Write>(
    out: &mut W,
    view: &Viewport,
    start: Vec2,
    end: Vec2,
    color: Color,
) -> std::io::Result<()> {
    let step = view.cell.min_element() * 0.5;
    let len = start.distance(end);
    let n = (len / step).ceil().max(1.0) as usize;
    out.queue(style::SetForegroundColor(color))?;
    for i in 0..=n {
        let p = start.lerp(end, i as f32 / n as f32);
        if let Some((c, r)) = view.cell_of(p) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(Print("─"))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, hud: &Hud, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let jump = if hud.flying { "W/S : Up/Down" } else { "W : Jump" };
    out.queue(Print(format!(
        "A D : Move  {}  J : Punch  K : Ray  L : Cone  B : Block  F : Fly  SPACE : Dash  Q : Quit",
        jump
    )))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, hud: &Hud, width: u16, height: u16) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", hud.score);
    let wave_line = format!("Reached wave {} of {}", hud.wave, hud.waves_total);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let cx = width / 2;
    let total_rows = lines.len() + 3;
    let start_row = (height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let rows: [(&str, Color); 3] = [
        (score_line.as_str(), Color::Yellow),
        (wave_line.as_str(), Color::DarkGrey),
        ("R - Play Again  M - Menu  Q - Quit", Color::White),
    ];
    for (i, (msg, color)) in rows.iter().enumerate() {
        let row = start_row + (lines.len() + i) as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
