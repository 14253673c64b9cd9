use crate::render::{frame_begin, frame_end, frame_fits, luma_u8, Frame, Renderer};
use std::io::Write;

/// Dark to bright. Black cells stay blank so the noise reads as speckle.
const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

pub struct AsciiRenderer {
    last_fg: Option<(u8, u8, u8)>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 1)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_fits(frame, 1, 1) {
            return Ok(());
        }
        frame_begin(frame, out)?;
        self.last_fg = None;

        let w = frame.pixel_width;
        for y in 0..frame.visual_rows as usize {
            for x in 0..w {
                let i = (y * w + x) * 4;
                let (r, g, b) = (
                    frame.pixels_rgba[i],
                    frame.pixels_rgba[i + 1],
                    frame.pixels_rgba[i + 2],
                );
                let l = luma_u8(r, g, b) as usize;
                let ch = RAMP[l * (RAMP.len() - 1) / 255];
                if self.last_fg != Some((r, g, b)) {
                    write!(out, "\x1b[38;2;{r};{g};{b}m")?;
                    self.last_fg = Some((r, g, b));
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, out)
    }
}
