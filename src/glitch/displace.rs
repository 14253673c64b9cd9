//! Pixel-copy layers: the horizontal row shift and the block teleport. Both
//! go through [`PixelBuffer::copy`], which clips with `surface::clamp_copy`.

use super::rand_range;
use crate::surface::{CopyRect, CopyRequest, PixelBuffer};
use fastrand::Rng;

pub const MAX_BLOCKS: usize = 5;

/// Rolls the row glitch and, when it fires, picks the strip and shift.
///
/// The request covers the full surface width; the negative or overflowing
/// part of the shift is left for the clamp to cut away.
pub fn plan_row_shift(rng: &mut Rng, w: usize, h: usize, intensity: f32) -> Option<CopyRequest> {
    if rng.f32() >= 0.08 + intensity * 0.2 {
        return None;
    }
    let (wf, hf) = (w as f32, h as f32);
    let y = rng.f32() * hf;
    let strip = rand_range(rng, 2.0, 20.0) * (1.0 + intensity * 0.5);
    let offset = rand_range(rng, -wf * 0.5, wf * 0.5) * intensity;
    Some(row_shift_request(w, y, strip, offset))
}

/// Full-width strip at `y` moved sideways by `offset` px. The offset is
/// truncated toward zero, so a left shift of 3.7 px reads from column 3.
pub fn row_shift_request(w: usize, y: f32, strip: f32, offset: f32) -> CopyRequest {
    let y = y.floor() as i64;
    CopyRequest {
        src_x: 0,
        src_y: y,
        dst_x: offset.trunc() as i64,
        dst_y: y,
        width: w as i64,
        height: strip.floor() as i64,
    }
}

pub fn row_shift(rng: &mut Rng, intensity: f32, buf: &mut PixelBuffer) -> Option<CopyRect> {
    let req = plan_row_shift(rng, buf.width(), buf.height(), intensity)?;
    buf.copy(req)
}

/// `min(floor(rand * intensity * 2), 5)`
pub fn block_count(rng: &mut Rng, intensity: f32) -> usize {
    let n = (rng.f32() * intensity * 2.0).floor();
    if n <= 0.0 {
        return 0;
    }
    (n as usize).min(MAX_BLOCKS)
}

/// Rolls one block. Returns a request whose source and destination both lie
/// fully inside the surface, or `None` when the roll fails or the block would
/// be a sliver (clamped width or height of 1 px or less).
pub fn plan_block(rng: &mut Rng, w: usize, h: usize, intensity: f32) -> Option<CopyRequest> {
    if rng.f32() >= 0.05 * intensity {
        return None;
    }
    let (wf, hf) = (w as f32, h as f32);
    let src_x = rng.f32() * wf * 0.9;
    let src_y = rng.f32() * hf * 0.9;
    let block_w = rand_range(rng, 30.0, 150.0).min(wf - src_x);
    let block_h = rand_range(rng, 30.0, 150.0).min(hf - src_y);

    let jitter = intensity * 0.5;
    let dst_x = src_x + rand_range(rng, -100.0, 100.0) * jitter;
    let dst_y = src_y + rand_range(rng, -100.0, 100.0) * jitter;

    if block_w <= 1.0 || block_h <= 1.0 {
        return None;
    }
    let dst_x = dst_x.clamp(0.0, wf - block_w);
    let dst_y = dst_y.clamp(0.0, hf - block_h);

    Some(CopyRequest {
        src_x: src_x.floor() as i64,
        src_y: src_y.floor() as i64,
        dst_x: dst_x.floor() as i64,
        dst_y: dst_y.floor() as i64,
        width: block_w.floor() as i64,
        height: block_h.floor() as i64,
    })
}

/// Returns how many blocks were actually copied.
pub fn blocks(rng: &mut Rng, intensity: f32, buf: &mut PixelBuffer) -> usize {
    let count = block_count(rng, intensity);
    let mut copied = 0;
    for _ in 0..count {
        let Some(req) = plan_block(rng, buf.width(), buf.height(), intensity) else {
            continue;
        };
        if buf.copy(req).is_some() {
            copied += 1;
        }
    }
    copied
}
