use super::{AnimationState, rand_range};
use crate::surface::{BlendMode, PixelBuffer, Rgba8};
use fastrand::Rng;

const SCANLINE_STEP: f32 = 1.5;
const SCANLINE_PITCH: usize = 4;
const NOISE_DENSITY: f64 = 0.00015;
pub const MAX_NOISE_POINTS: usize = 4000;

/// Moves the bright scanline down by 1.5 px and lays the fixed-pitch dark
/// lines over the whole surface.
pub fn scanlines(state: &mut AnimationState, buf: &mut PixelBuffer) {
    let (w, h) = (buf.width(), buf.height());
    if h == 0 {
        state.scanline_y = 0.0;
        return;
    }
    state.scanline_y = (state.scanline_y + SCANLINE_STEP) % h as f32;

    let bright = Rgba8::grey(255, 0).alpha(20.0 + 10.0 * state.intensity);
    buf.line(0.0, state.scanline_y, w as f32, state.scanline_y, bright, BlendMode::Normal);

    let dark = Rgba8::grey(0, 0).alpha(100.0 + 40.0 * state.intensity);
    for y in (0..h).step_by(SCANLINE_PITCH) {
        buf.line(0.0, y as f32, w as f32, y as f32, dark, BlendMode::Normal);
    }
}

/// `min(floor(w * h * 0.00015 * (1 + intensity * 1.5)), 4000)`
pub fn noise_point_count(w: usize, h: usize, intensity: f32) -> usize {
    let area = w as f64 * h as f64;
    let n = (area * NOISE_DENSITY * (1.0 + intensity as f64 * 1.5)).floor();
    if n <= 0.0 {
        return 0;
    }
    (n as usize).min(MAX_NOISE_POINTS)
}

/// Grey speckle with the occasional vertical smear. Returns the point count.
pub fn noise(state: &AnimationState, rng: &mut Rng, buf: &mut PixelBuffer) -> usize {
    let (w, h) = (buf.width() as f32, buf.height() as f32);
    let count = noise_point_count(buf.width(), buf.height(), state.intensity);
    let smear_chance = 0.03 * state.intensity;

    for _ in 0..count {
        let x = rng.f32() * w;
        let y = rng.f32() * h;
        let brightness = rand_range(rng, 0.0, 100.0) as u8;
        let alpha = (rng.f32() * 120.0 * (1.0 + state.intensity * 0.8)).min(180.0);
        buf.set_pixel(x, y, Rgba8::grey(brightness, 0).alpha(alpha), BlendMode::Normal);

        if rng.f32() < smear_chance {
            let grey = rand_range(rng, 50.0, 180.0) as u8;
            let sw = rand_range(rng, 1.0, 5.0);
            let sh = rand_range(rng, 1.0, 25.0);
            buf.fill_rect(x, y, sw, sh, Rgba8::grey(grey, 60), BlendMode::Normal);
        }
    }
    count
}
