//! RGBA8 frame buffer and the drawing primitives the glitch layers paint with.
//!
//! Every primitive is total: coordinates outside the buffer are clipped and a
//! fully clipped operation does nothing.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn grey(v: u8, a: u8) -> Self {
        Self { r: v, g: v, b: v, a }
    }

    /// Same color with the alpha taken from a float on the 0..=255 scale.
    pub fn alpha(self, a: f32) -> Self {
        Self {
            a: to_u8(a),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Screen,
}

/// A copy the caller would like to perform, in signed pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyRequest {
    pub src_x: i64,
    pub src_y: i64,
    pub dst_x: i64,
    pub dst_y: i64,
    pub width: i64,
    pub height: i64,
}

/// A copy that is guaranteed to stay inside the buffer on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyRect {
    pub src_x: usize,
    pub src_y: usize,
    pub dst_x: usize,
    pub dst_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Shrinks a copy request until both the source and destination rectangles fit
/// in a `surface_w` x `surface_h` buffer.
///
/// A negative destination moves the source origin forward by the same amount
/// and shortens the span (`dst_x = -5` reads from `src_x + 5` with `width - 5`).
/// Overflow past the right or bottom edge shortens the span. Returns `None`
/// when nothing is left to copy.
pub fn clamp_copy(req: CopyRequest, surface_w: usize, surface_h: usize) -> Option<CopyRect> {
    let (src_x, dst_x, width) = clamp_axis(req.src_x, req.dst_x, req.width, surface_w as i64)?;
    let (src_y, dst_y, height) = clamp_axis(req.src_y, req.dst_y, req.height, surface_h as i64)?;
    Some(CopyRect {
        src_x,
        src_y,
        dst_x,
        dst_y,
        width,
        height,
    })
}

fn clamp_axis(mut src: i64, mut dst: i64, mut len: i64, limit: i64) -> Option<(usize, usize, usize)> {
    if dst < 0 {
        src = src.saturating_sub(dst);
        len = len.saturating_add(dst);
        dst = 0;
    }
    if src < 0 {
        dst = dst.saturating_sub(src);
        len = len.saturating_add(src);
        src = 0;
    }
    len = len
        .min(limit.saturating_sub(src))
        .min(limit.saturating_sub(dst));
    if len <= 0 {
        return None;
    }
    Some((src as usize, dst as usize, len as usize))
}

pub struct PixelBuffer {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: opaque_black(w, h),
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = (y * self.w + x) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Reallocates to the new size. Contents are cleared; callers own any
    /// animation state that must survive.
    pub fn resize(&mut self, w: usize, h: usize) {
        if w == self.w && h == self.h {
            return;
        }
        self.w = w;
        self.h = h;
        self.data = opaque_black(w, h);
    }

    /// Paints black over the whole buffer at `alpha`, leaving a fading trail of
    /// the previous frame.
    pub fn fade(&mut self, alpha: u8) {
        let keep = 255 - alpha as u32;
        for px in self.data.chunks_exact_mut(4) {
            px[0] = ((px[0] as u32 * keep + 127) / 255) as u8;
            px[1] = ((px[1] as u32 * keep + 127) / 255) as u8;
            px[2] = ((px[2] as u32 * keep + 127) / 255) as u8;
            px[3] = 255;
        }
    }

    pub fn fill(&mut self, color: Rgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba8, mode: BlendMode) {
        if color.a == 0 {
            return;
        }
        let Some((x0, x1)) = span(x, w, self.w) else {
            return;
        };
        let Some((y0, y1)) = span(y, h, self.h) else {
            return;
        };
        for row in y0..y1 {
            let base = row * self.w;
            for col in x0..x1 {
                blend_at(&mut self.data, (base + col) * 4, color, mode);
            }
        }
    }

    pub fn set_pixel(&mut self, x: f32, y: f32, color: Rgba8, mode: BlendMode) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.w || y >= self.h || color.a == 0 {
            return;
        }
        blend_at(&mut self.data, (y * self.w + x) * 4, color, mode);
    }

    /// One pixel wide line. Axis-aligned lines go through `fill_rect`; others
    /// are stepped, sampling at most a few times the buffer perimeter.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba8, mode: BlendMode) {
        if y0.floor() == y1.floor() {
            let left = x0.min(x1);
            self.fill_rect(left, y0.floor(), (x1 - x0).abs() + 1.0, 1.0, color, mode);
            return;
        }
        if x0.floor() == x1.floor() {
            let top = y0.min(y1);
            self.fill_rect(x0.floor(), top, 1.0, (y1 - y0).abs() + 1.0, color, mode);
            return;
        }

        let (dx, dy) = (x1 - x0, y1 - y0);
        let max_steps = 2 * (self.w + self.h) + 1;
        let steps = (dx.abs().max(dy.abs()).ceil() as usize).clamp(1, max_steps);
        let inv = 1.0 / steps as f32;
        for i in 0..=steps {
            let t = i as f32 * inv;
            self.set_pixel(x0 + dx * t, y0 + dy * t, color, mode);
        }
    }

    /// Copies a rectangle of this buffer onto another place of the same buffer.
    /// The request is clipped with [`clamp_copy`]; returns what was copied.
    pub fn copy(&mut self, req: CopyRequest) -> Option<CopyRect> {
        let rect = clamp_copy(req, self.w, self.h)?;
        let stride = self.w * 4;
        let row_bytes = rect.width * 4;
        let mut copy_row = |i: usize| {
            let src = (rect.src_y + i) * stride + rect.src_x * 4;
            let dst = (rect.dst_y + i) * stride + rect.dst_x * 4;
            self.data.copy_within(src..src + row_bytes, dst);
        };
        // Walk rows away from the overlap so unread source rows are never clobbered.
        if rect.dst_y > rect.src_y {
            (0..rect.height).rev().for_each(&mut copy_row);
        } else {
            (0..rect.height).for_each(&mut copy_row);
        }
        Some(rect)
    }
}

fn opaque_black(w: usize, h: usize) -> Vec<u8> {
    let mut data = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
    for px in data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    data
}

fn span(start: f32, len: f32, limit: usize) -> Option<(usize, usize)> {
    if !(start.is_finite() && len.is_finite()) || len <= 0.0 {
        return None;
    }
    let a = start.round().max(0.0);
    let b = (start + len).round().min(limit as f32);
    if b <= a {
        return None;
    }
    Some((a as usize, b as usize))
}

fn blend_at(data: &mut [u8], i: usize, c: Rgba8, mode: BlendMode) {
    let a = c.a as u32;
    data[i] = blend_channel(data[i], c.r, a, mode);
    data[i + 1] = blend_channel(data[i + 1], c.g, a, mode);
    data[i + 2] = blend_channel(data[i + 2], c.b, a, mode);
    data[i + 3] = 255;
}

fn blend_channel(dst: u8, src: u8, a: u32, mode: BlendMode) -> u8 {
    let dst = dst as u32;
    let src = src as u32;
    match mode {
        BlendMode::Normal => ((dst * (255 - a) + src * a + 127) / 255) as u8,
        BlendMode::Add => (dst + (src * a + 127) / 255).min(255) as u8,
        BlendMode::Screen => {
            let s = (src * a + 127) / 255;
            (255 - ((255 - dst) * (255 - s) + 127) / 255) as u8
        }
    }
}

fn to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}
