use crate::render::{frame_begin, frame_end, frame_fits, Frame, Renderer};
use std::io::Write;

const HALF_BLOCK: char = '\u{2580}';

/// Two pixels per cell: the upper one as foreground of `▀`, the lower one as
/// background.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_fits(frame, 1, 2) {
            return Ok(());
        }
        frame_begin(frame, out)?;
        self.last_fg = None;
        self.last_bg = None;

        let w = frame.pixel_width;
        let px = frame.pixels_rgba;
        for row in 0..frame.visual_rows as usize {
            let top = row * 2 * w * 4;
            let bot = top + w * 4;
            for x in 0..w {
                let (ti, bi) = (top + x * 4, bot + x * 4);
                let fg = (px[ti], px[ti + 1], px[ti + 2]);
                let bg = (px[bi], px[bi + 1], px[bi + 2]);
                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, out)
    }
}
