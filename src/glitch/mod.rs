//! The procedural glitch background and the text distortion controller.
//!
//! [`GlitchBackground`] is the frame scheduler: it owns the animation state,
//! the random source and the frame buffer, and runs every layer once per
//! [`GlitchBackground::tick`] in a fixed order so frames composite the same way.

pub mod bands;
pub mod displace;
pub mod intensity;
pub mod layers;
pub mod text;
pub mod timer;

use crate::surface::{CopyRect, PixelBuffer};
use bands::VerticalBand;
use fastrand::Rng;
use std::time::Duration;

/// Alpha of the black wash painted at the start of every frame.
pub const FADE_ALPHA: u8 = 35;
pub const START_INTENSITY: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub phase: f32,
    pub intensity: f32,
    pub scanline_y: f32,
    /// Draw order is insertion order.
    pub bands: Vec<VerticalBand>,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            intensity: START_INTENSITY,
            scanline_y: 0.0,
            bands: Vec::new(),
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened during one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub spiked: bool,
    pub bands_drawn: usize,
    pub extra_band: bool,
    pub noise_points: usize,
    pub row_shift: Option<CopyRect>,
    pub blocks: usize,
    pub band_spawned: bool,
}

pub struct GlitchBackground {
    state: AnimationState,
    rng: Rng,
    buffer: PixelBuffer,
    frames: u64,
}

impl GlitchBackground {
    pub fn new(w: usize, h: usize) -> Self {
        Self::with_rng(w, h, Rng::new())
    }

    pub fn with_seed(w: usize, h: usize, seed: u64) -> Self {
        Self::with_rng(w, h, Rng::with_seed(seed))
    }

    fn with_rng(w: usize, h: usize, rng: Rng) -> Self {
        Self {
            state: AnimationState::new(),
            rng,
            buffer: PixelBuffer::new(w, h),
            frames: 0,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn pixels(&self) -> &[u8] {
        self.buffer.pixels()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// New buffer at the new size; intensity, bands and scanline position carry over.
    pub fn resize(&mut self, w: usize, h: usize) {
        if w == self.buffer.width() && h == self.buffer.height() {
            return;
        }
        tracing::debug!(w, h, "glitch surface resized");
        self.buffer.resize(w, h);
    }

    /// Forces an intensity spike outside the random schedule.
    pub fn spike(&mut self) {
        intensity::spike(&mut self.state, &mut self.rng);
    }

    pub fn tick(&mut self, dt: Duration) -> FrameReport {
        let Self {
            state, rng, buffer, ..
        } = self;
        let mut report = FrameReport::default();

        buffer.fade(FADE_ALPHA);
        state.phase += dt.as_secs_f32() * 2.0;

        report.spiked = intensity::step(state, rng);
        if report.spiked {
            tracing::trace!(intensity = state.intensity, "glitch spike");
        }

        bands::age(state);
        bands::draw(state, buffer);
        report.bands_drawn = state.bands.len();
        report.extra_band = bands::draw_extra(rng, buffer);
        layers::scanlines(state, buffer);
        report.noise_points = layers::noise(state, rng, buffer);
        report.row_shift = displace::row_shift(rng, state.intensity, buffer);
        report.blocks = displace::blocks(rng, state.intensity, buffer);

        report.band_spawned = bands::maybe_spawn(state, rng, buffer.width());
        self.frames += 1;
        report
    }
}

pub(crate) fn rand_range(rng: &mut Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}
