mod ascii;
mod halfblock;
mod kitty;
pub mod label;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;
pub use kitty::KittyRenderer;
pub use label::{Label, LabelStyle};

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub labels: &'a [Label],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Frame buffer pixels per terminal cell, as (columns, rows).
    fn cell_pixels(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Checks the frame against the renderer's cell geometry. A mismatch (usually
/// a resize racing the frame) skips the frame instead of indexing past the buffer.
pub(crate) fn frame_fits(frame: &Frame<'_>, px_w_mul: usize, px_h_mul: usize) -> bool {
    let cols = frame.term_cols as usize;
    let rows = frame.visual_rows as usize;
    if cols == 0 || rows == 0 || frame.pixel_width == 0 || frame.pixel_height == 0 {
        return false;
    }
    if frame.pixel_width != cols * px_w_mul || frame.pixel_height != rows * px_h_mul {
        return false;
    }
    frame.pixels_rgba.len() >= frame.pixel_width * frame.pixel_height * 4
}

pub(crate) fn frame_begin(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset, and no autowrap while full-width rows are painted; a write
    // into the last column would otherwise wrap and leave gaps.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
    Ok(())
}

/// Labels, HUD and overlay on top of the painted frame, then flush.
pub(crate) fn frame_end(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    write_labels(out, frame.labels, frame.visual_rows)?;

    let cols = frame.term_cols as usize;
    let mut hud_lines = frame.hud.lines();
    for i in 0..frame.hud_rows as usize {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", frame.visual_rows as usize + i + 1)?;
        if let Some(line) = hud_lines.next() {
            let line: String = line.chars().take(cols).collect();
            write!(out, "\x1b[38;2;200;200;200m{line}\x1b[0m")?;
        }
    }

    if let Some(text) = frame.overlay {
        draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

/// Writes each label as runs of non-space characters so the spaces between
/// words leave the background visible.
pub fn write_labels(out: &mut dyn Write, labels: &[Label], visual_rows: u16) -> anyhow::Result<()> {
    for label in labels.iter().filter(|l| l.row < visual_rows) {
        let (r, g, b) = label.rgb;
        let weight = if label.bold { "\x1b[1m" } else { "" };
        let mut col = label.col as usize;
        let mut run = String::new();
        let mut run_col = col;
        for ch in label.text.chars().chain(std::iter::once(' ')) {
            if ch == ' ' {
                if !run.is_empty() {
                    write!(
                        out,
                        "\x1b[{};{}H\x1b[0m{weight}\x1b[38;2;{r};{g};{b}m{run}",
                        label.row as usize + 1,
                        run_col + 1
                    )?;
                    run.clear();
                }
                run_col = col + 1;
            } else {
                if run.is_empty() {
                    run_col = col;
                }
                run.push(ch);
            }
            col += 1;
        }
    }
    out.write_all(b"\x1b[0m")?;
    Ok(())
}

pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.chars().take(max_inner_w).collect())
        .collect();
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));

    let box_w = inner_w + 4;
    let box_h = body_h + 2;
    let start_col = cols.saturating_sub(box_w) / 2 + 1;
    let start_row = rows.saturating_sub(box_h) / 2 + 1;
    let horiz = "-".repeat(box_w - 2);
    let blank = " ".repeat(inner_w);

    out.write_all(b"\x1b[0m\x1b[38;2;236;242;255m\x1b[48;2;10;10;14m")?;
    write!(out, "\x1b[{};{}H+{}+", start_row, start_col, horiz)?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = start_row + 1 + i;
        write!(out, "\x1b[{};{}H| {} |", row, start_col, blank)?;
        if i == 0 {
            write!(out, "\x1b[{};{}H\x1b[1m{}\x1b[22m", row, start_col + 2, line)?;
        } else {
            write!(out, "\x1b[{};{}H{}", row, start_col + 2, line)?;
        }
    }
    write!(out, "\x1b[{};{}H+{}+", start_row + box_h - 1, start_col, horiz)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}

pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}
