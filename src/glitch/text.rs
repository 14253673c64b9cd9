//! Per-label text distortion.
//!
//! Each [`TextGlitch`] runs its own interval and revert timeout, independent of
//! the frame scheduler and of every other label. On a tick it may enter a
//! short burst (random offset, chroma split, letter spacing and opacity) and
//! falls back to the identity state when the burst timeout fires.

use super::rand_range;
use super::timer::{Interval, Timeout};
use crate::surface::Rgba8;
use fastrand::Rng;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchTier {
    Low,
    Medium,
    High,
}

impl GlitchTier {
    pub fn probability(self) -> f32 {
        match self {
            Self::Low => 0.1,
            Self::Medium => 0.2,
            Self::High => 0.3,
        }
    }
}

/// How the ghost copies of a glitching label are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostStyle {
    /// Red left half, cyan right half, plus two randomly clipped fragments
    /// tinting the label itself.
    Halves,
    /// Red copy clipped from a random start, full cyan copy, nudged apart
    /// vertically as well.
    Sweep,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextGlitchProfile {
    pub tick: Duration,
    pub probability: f32,
    pub burst_min: Duration,
    pub burst_max: Duration,
    pub max_offset_x: f32,
    pub max_offset_y: f32,
    pub max_chroma: f32,
    pub max_distortion: f32,
    /// Letter spacing in px per unit of distortion.
    pub spacing_scale: f32,
    pub min_opacity: f32,
    /// Ghost displacement in px, on top of the burst offset.
    pub ghost_shift: f32,
    pub ghost_alpha: f32,
    /// Alpha of the red/cyan shadow pair split by the chroma offset.
    pub shadow_alpha: f32,
    pub style: GhostStyle,
}

impl TextGlitchProfile {
    pub fn text(tier: GlitchTier) -> Self {
        Self {
            tick: Duration::from_millis(150),
            probability: tier.probability(),
            burst_min: Duration::from_millis(50),
            burst_max: Duration::from_millis(150),
            max_offset_x: 1.5,
            max_offset_y: 1.0,
            max_chroma: 2.0,
            max_distortion: 0.5,
            spacing_scale: 1.0,
            min_opacity: 0.95,
            ghost_shift: 1.0,
            ghost_alpha: 0.5,
            shadow_alpha: 0.5,
            style: GhostStyle::Halves,
        }
    }

    pub fn title() -> Self {
        Self {
            tick: Duration::from_millis(100),
            probability: 0.3,
            burst_min: Duration::from_millis(50),
            burst_max: Duration::from_millis(200),
            max_offset_x: 5.0,
            max_offset_y: 3.0,
            max_chroma: 4.0,
            max_distortion: 1.0,
            spacing_scale: 4.0,
            min_opacity: 0.9,
            ghost_shift: 2.0,
            ghost_alpha: 0.5,
            shadow_alpha: 0.75,
            style: GhostStyle::Sweep,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextGlitchState {
    pub offset_x: f32,
    pub offset_y: f32,
    pub is_glitching: bool,
    pub chroma_offset: f32,
    pub text_distortion: f32,
    pub opacity: f32,
}

impl TextGlitchState {
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        is_glitching: false,
        chroma_offset: 0.0,
        text_distortion: 0.0,
        opacity: 1.0,
    };
}

impl Default for TextGlitchState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Horizontal slice of a label, as fractions of its width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    pub start: f32,
    pub end: f32,
}

impl Clip {
    pub const FULL: Self = Self { start: 0.0, end: 1.0 };
    pub const LEFT: Self = Self { start: 0.0, end: 0.5 };
    pub const RIGHT: Self = Self { start: 0.5, end: 1.0 };

    /// A random sub-span of a randomly chosen half.
    fn random_fragment(rng: &mut Rng) -> Self {
        let base = if rng.bool() { 0.0 } else { 0.5 };
        let a = rng.f32() * 0.5;
        let b = rng.f32() * 0.5;
        Self {
            start: base + a.min(b),
            end: base + a.max(b),
        }
    }
}

/// A tinted, clipped copy of a glitching label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ghost {
    pub tint: Rgba8,
    pub dx: f32,
    pub dy: f32,
    pub clip: Clip,
    /// Screen-blended over the label instead of drawn under it.
    pub over: bool,
}

pub struct TextGlitch {
    profile: TextGlitchProfile,
    state: TextGlitchState,
    interval: Interval,
    revert: Timeout,
    triggers: u64,
}

impl TextGlitch {
    pub fn new(profile: TextGlitchProfile, now: Duration) -> Self {
        Self {
            profile,
            state: TextGlitchState::IDENTITY,
            interval: Interval::new(profile.tick, now),
            revert: Timeout::default(),
            triggers: 0,
        }
    }

    pub fn profile(&self) -> &TextGlitchProfile {
        &self.profile
    }

    pub fn state(&self) -> &TextGlitchState {
        &self.state
    }

    pub fn triggers(&self) -> u64 {
        self.triggers
    }

    pub fn revert_deadline(&self) -> Option<Duration> {
        self.revert.deadline()
    }

    pub fn letter_spacing(&self) -> f32 {
        self.state.text_distortion * self.profile.spacing_scale
    }

    /// Runs whatever timers are due at `now`: the pending revert first, then
    /// the interval tick.
    pub fn advance(&mut self, now: Duration, rng: &mut Rng) {
        if self.revert.poll(now) {
            self.state = TextGlitchState::IDENTITY;
        }
        if self.interval.poll(now) {
            self.on_tick(now, rng);
        }
    }

    /// One interval tick: rolls the tier probability and starts a burst on
    /// success. Returns whether a burst was triggered.
    pub fn on_tick(&mut self, now: Duration, rng: &mut Rng) -> bool {
        if self.interval.is_cancelled() || rng.f32() >= self.profile.probability {
            return false;
        }
        let p = &self.profile;
        self.state = TextGlitchState {
            offset_x: (rng.f32() - 0.5) * 2.0 * p.max_offset_x,
            offset_y: (rng.f32() - 0.5) * 2.0 * p.max_offset_y,
            is_glitching: true,
            chroma_offset: rng.f32() * p.max_chroma,
            text_distortion: rng.f32() * p.max_distortion,
            opacity: p.min_opacity + rng.f32() * (1.0 - p.min_opacity),
        };
        let burst_ms = rand_range(
            rng,
            p.burst_min.as_secs_f32() * 1000.0,
            p.burst_max.as_secs_f32() * 1000.0,
        );
        self.revert.arm(now + Duration::from_secs_f32(burst_ms / 1000.0));
        self.triggers += 1;
        true
    }

    /// Stops both timers and settles on the identity state for good.
    pub fn cancel(&mut self) {
        self.interval.cancel();
        self.revert.cancel();
        self.state = TextGlitchState::IDENTITY;
    }

    pub fn is_cancelled(&self) -> bool {
        self.interval.is_cancelled()
    }

    /// Ghost copies for the current frame; empty while resting. The first two
    /// are the chroma shadow pair at `offset_x ∓ chroma_offset`. Fragment
    /// clips are re-rolled on every call.
    pub fn ghosts(&self, rng: &mut Rng) -> Vec<Ghost> {
        if !self.state.is_glitching {
            return Vec::new();
        }
        let s = &self.state;
        let p = &self.profile;
        let alpha = p.ghost_alpha * 255.0;
        let red = Rgba8::new(255, 0, 0, 0);
        let cyan = Rgba8::new(0, 255, 255, 0);
        let under = |tint: Rgba8, dx: f32, dy: f32, clip: Clip| Ghost {
            tint,
            dx,
            dy,
            clip,
            over: false,
        };

        let shadow = p.shadow_alpha * 255.0;
        let mut out = vec![
            under(red.alpha(shadow), s.offset_x - s.chroma_offset, s.offset_y, Clip::FULL),
            under(cyan.alpha(shadow), s.offset_x + s.chroma_offset, s.offset_y, Clip::FULL),
        ];

        match p.style {
            GhostStyle::Halves => {
                let fragment_alpha = alpha * 0.6;
                out.push(under(red.alpha(alpha), s.offset_x - p.ghost_shift, s.offset_y, Clip::LEFT));
                out.push(under(cyan.alpha(alpha), s.offset_x + p.ghost_shift, s.offset_y, Clip::RIGHT));
                for tint in [red, cyan] {
                    out.push(Ghost {
                        tint: tint.alpha(fragment_alpha),
                        dx: s.offset_x,
                        dy: s.offset_y,
                        clip: Clip::random_fragment(rng),
                        over: true,
                    });
                }
            }
            GhostStyle::Sweep => {
                let sweep = Clip {
                    start: rng.f32(),
                    end: 1.0,
                };
                out.push(under(
                    red.alpha(alpha),
                    s.offset_x + p.ghost_shift,
                    s.offset_y - p.ghost_shift * 0.5,
                    sweep,
                ));
                out.push(under(
                    cyan.alpha(alpha),
                    s.offset_x - p.ghost_shift,
                    s.offset_y + p.ghost_shift * 0.5,
                    Clip::FULL,
                ));
            }
        }
        out
    }
}
