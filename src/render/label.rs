//! Terminal layout for glitching text labels.
//!
//! Burst offsets are in CSS-like pixels; they are mapped to character cells
//! with a nominal cell size. Ghosts drawn under the label are emitted first;
//! on a dark background a screen-blended tint is just the tint scaled by its
//! alpha. Ghosts drawn over it come after the base label and screen their tint
//! into the label colour.

use crate::glitch::text::{Ghost, TextGlitch};
use fastrand::Rng;

pub const CELL_W_PX: f32 = 8.0;
pub const CELL_H_PX: f32 = 16.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    /// Zero-based terminal row.
    pub row: u16,
    /// Zero-based terminal column.
    pub col: u16,
    pub rgb: (u8, u8, u8),
    pub bold: bool,
    pub text: String,
}

/// Style of a label at rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle {
    pub rgb: (u8, u8, u8),
    pub bold: bool,
}

/// Lays out `text` centered on `row` across `cols` columns, with the ghosts
/// of `glitch` around it when it is bursting.
pub fn glitch_labels(
    text: &str,
    row: u16,
    cols: u16,
    rows: u16,
    style: LabelStyle,
    glitch: &TextGlitch,
    rng: &mut Rng,
) -> Vec<Label> {
    if cols == 0 || rows == 0 || text.trim().is_empty() {
        return Vec::new();
    }
    let gap = (glitch.letter_spacing() / CELL_W_PX).round().max(0.0) as usize;
    let chars: Vec<char> = spaced(text, gap).chars().take(cols as usize).collect();
    let width = chars.len() as i32;
    let origin = (cols as i32 - width) / 2;
    let state = glitch.state();
    let base_rgb = scale(style.rgb, state.opacity);
    let (over, under): (Vec<Ghost>, Vec<Ghost>) = glitch.ghosts(rng).into_iter().partition(|g| g.over);

    let mut out = Vec::new();
    for ghost in &under {
        out.extend(ghost_label(&chars, origin, row, cols, rows, ghost, None));
    }

    let col = origin + cells(state.offset_x, CELL_W_PX);
    let line = row as i32 + cells(state.offset_y, CELL_H_PX);
    out.extend(place(&chars, col, line, cols, rows, base_rgb, style.bold));

    for ghost in &over {
        out.extend(ghost_label(&chars, origin, row, cols, rows, ghost, Some((base_rgb, style.bold))));
    }
    out
}

fn ghost_label(
    chars: &[char],
    origin: i32,
    row: u16,
    cols: u16,
    rows: u16,
    ghost: &Ghost,
    over: Option<((u8, u8, u8), bool)>,
) -> Option<Label> {
    let n = chars.len();
    let start = ((ghost.clip.start.clamp(0.0, 1.0) * n as f32).floor() as usize).min(n);
    let end = ((ghost.clip.end.clamp(0.0, 1.0) * n as f32).ceil() as usize).min(n);
    if end <= start {
        return None;
    }
    let alpha = ghost.tint.a as f32 / 255.0;
    let tint = scale((ghost.tint.r, ghost.tint.g, ghost.tint.b), alpha);
    let (rgb, bold) = match over {
        Some((base, bold)) => (screen(base, tint), bold),
        None => (tint, false),
    };
    let col = origin + start as i32 + cells(ghost.dx, CELL_W_PX);
    let line = row as i32 + cells(ghost.dy, CELL_H_PX);
    place(&chars[start..end], col, line, cols, rows, rgb, bold)
}

/// Clips a run of characters to the screen. Returns `None` when nothing of it
/// is visible.
fn place(chars: &[char], col: i32, row: i32, cols: u16, rows: u16, rgb: (u8, u8, u8), bold: bool) -> Option<Label> {
    if row < 0 || row >= rows as i32 {
        return None;
    }
    let skip = (-col).max(0) as usize;
    let col = col.max(0);
    let room = (cols as i32 - col).max(0) as usize;
    let text: String = chars.iter().skip(skip).take(room).collect();
    if text.trim().is_empty() {
        return None;
    }
    Some(Label {
        row: row as u16,
        col: col as u16,
        rgb,
        bold,
        text,
    })
}

/// Pixel offset to whole cells. Any visible shift moves at least one cell so
/// small chroma splits still show up.
fn cells(px: f32, cell: f32) -> i32 {
    if px.abs() < 0.5 {
        return 0;
    }
    let n = (px.abs() / cell).round().max(1.0) as i32;
    if px < 0.0 { -n } else { n }
}

fn spaced(text: &str, gap: usize) -> String {
    if gap == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(gap);
    let mut out = String::with_capacity(text.len() * (gap + 1));
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            out.push_str(&pad);
        }
        out.push(ch);
    }
    out
}

fn screen(a: (u8, u8, u8), b: (u8, u8, u8)) -> (u8, u8, u8) {
    let f = |x: u8, y: u8| (255 - ((255 - x as u16) * (255 - y as u16) + 127) / 255) as u8;
    (f(a.0, b.0), f(a.1, b.1), f(a.2, b.2))
}

fn scale(rgb: (u8, u8, u8), k: f32) -> (u8, u8, u8) {
    let k = k.clamp(0.0, 1.0);
    let f = |c: u8| (c as f32 * k).round() as u8;
    (f(rgb.0), f(rgb.1), f(rgb.2))
}
