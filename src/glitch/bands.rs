use super::{AnimationState, rand_range};
use crate::surface::{BlendMode, PixelBuffer, Rgba8};
use fastrand::Rng;

/// Life value that maps to full band alpha.
const LIFE_SCALE: f32 = 60.0;
/// Horizontal split between the red, green and blue copies of a band.
const FRINGE_PX: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalBand {
    pub x: f32,
    pub width: f32,
    /// Frames left before the band is dropped.
    pub life: u32,
    pub opacity: f32,
}

impl VerticalBand {
    pub fn random(rng: &mut Rng, surface_w: usize) -> Self {
        Self {
            x: rng.f32() * surface_w as f32,
            width: rand_range(rng, 20.0, 200.0),
            life: rng.u32(30..=60),
            opacity: rand_range(rng, 30.0, 100.0),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / LIFE_SCALE * self.opacity
    }
}

/// Decrements every band and drops the ones that ran out, keeping draw order.
pub fn age(state: &mut AnimationState) {
    state.bands.retain_mut(|band| {
        band.life = band.life.saturating_sub(1);
        band.life > 0
    });
}

pub fn draw(state: &AnimationState, buf: &mut PixelBuffer) {
    let h = buf.height() as f32;
    for band in &state.bands {
        let a = band.alpha();
        let fringes = [
            (-FRINGE_PX, Rgba8::new(255, 0, 0, 0)),
            (0.0, Rgba8::new(0, 255, 0, 0)),
            (FRINGE_PX, Rgba8::new(0, 0, 255, 0)),
        ];
        for (dx, color) in fringes {
            buf.fill_rect(band.x + dx, 0.0, band.width, h, color.alpha(a), BlendMode::Add);
        }
    }
}

/// A single screen-blended flash that lives for one frame only.
pub fn draw_extra(rng: &mut Rng, buf: &mut PixelBuffer) -> bool {
    if rng.f32() >= 0.1 {
        return false;
    }
    let x = rng.f32() * buf.width() as f32;
    let width = rand_range(rng, 50.0, 300.0);
    let alpha = rand_range(rng, 20.0, 40.0);
    let h = buf.height() as f32;
    buf.fill_rect(x, 0.0, width, h, Rgba8::grey(255, 0).alpha(alpha), BlendMode::Screen);
    true
}

/// Appends a new band behind a 0.1 roll and then a coin flip.
pub fn maybe_spawn(state: &mut AnimationState, rng: &mut Rng, surface_w: usize) -> bool {
    if rng.f32() < 0.1 && rng.f32() < 0.5 {
        state.bands.push(VerticalBand::random(rng, surface_w));
        return true;
    }
    false
}
