use crate::render::{frame_begin, frame_end, frame_fits, Frame, Renderer};
use anyhow::Context;
use base64::Engine;
use std::io::Write;

/// Raw bytes per escape chunk; 3072 raw bytes encode to 4096 base64 bytes.
const RAW_CHUNK: usize = 3 * 1024;

/// Sends the frame as a kitty graphics image (direct transmission, base64
/// chunks) placed under the text layer, so labels and the HUD print on top.
pub struct KittyRenderer {
    image_id: u32,
    placement_id: u32,
    b64_buf: Vec<u8>,
    last_label_rows: Vec<u16>,
}

impl KittyRenderer {
    pub fn new() -> Self {
        Self {
            image_id: 0x6c17,
            placement_id: 1,
            b64_buf: Vec::new(),
            last_label_rows: Vec::new(),
        }
    }
}

impl Default for KittyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for KittyRenderer {
    fn name(&self) -> &'static str {
        "kitty"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (2, 4)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_fits(frame, 2, 4) {
            return Ok(());
        }
        frame_begin(frame, out)?;

        // Labels move between frames and the image does not repaint text cells.
        for &row in &self.last_label_rows {
            if row < frame.visual_rows {
                write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", row as usize + 1)?;
            }
        }
        self.last_label_rows = frame.labels.iter().map(|l| l.row).collect();
        self.last_label_rows.sort_unstable();
        self.last_label_rows.dedup();

        out.write_all(b"\x1b[H")?;
        write_kitty_direct_rgba(
            out,
            frame.pixels_rgba,
            frame.pixel_width,
            frame.pixel_height,
            frame.term_cols as usize,
            frame.visual_rows as usize,
            self.image_id,
            self.placement_id,
            &mut self.b64_buf,
        )?;

        frame_end(frame, out)
    }
}

#[allow(clippy::too_many_arguments)]
fn write_kitty_direct_rgba(
    out: &mut dyn Write,
    rgba: &[u8],
    w: usize,
    h: usize,
    cols: usize,
    rows: usize,
    image_id: u32,
    placement_id: u32,
    b64_buf: &mut Vec<u8>,
) -> anyhow::Result<()> {
    let rgba = &rgba[..w * h * 4];
    let mut chunks = rgba.chunks(RAW_CHUNK).peekable();
    let mut first = true;
    while let Some(chunk) = chunks.next() {
        let b64_len = chunk.len().div_ceil(3) * 4;
        if b64_buf.len() < b64_len {
            b64_buf.resize(b64_len, 0);
        }
        let written = base64::engine::general_purpose::STANDARD
            .encode_slice(chunk, &mut b64_buf[..b64_len])
            .context("base64 encode frame")?;

        let more = u8::from(chunks.peek().is_some());
        if first {
            write!(
                out,
                "\x1b_Ga=T,f=32,s={w},v={h},t=d,i={image_id},p={placement_id},c={cols},r={rows},C=1,q=2,z=-1,m={more};"
            )?;
            first = false;
        } else {
            write!(out, "\x1b_Gm={more};")?;
        }
        out.write_all(&b64_buf[..written])?;
        out.write_all(b"\x1b\\")?;
    }
    Ok(())
}
