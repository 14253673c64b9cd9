use super::{AnimationState, rand_range};
use fastrand::Rng;

pub const FLOOR: f32 = 0.2;
pub const CEILING: f32 = 3.0;
pub const DECAY: f32 = 0.995;
pub const SPIKE_CHANCE: f32 = 0.05;
pub const SPIKE_MIN: f32 = 1.0;

/// Geometric decay toward the floor, then a 5% chance of a random spike.
/// Returns whether a spike fired this frame.
pub fn step(state: &mut AnimationState, rng: &mut Rng) -> bool {
    state.intensity = (state.intensity * DECAY).clamp(FLOOR, CEILING);
    if rng.f32() < SPIKE_CHANCE {
        spike(state, rng);
        return true;
    }
    false
}

/// Resamples intensity uniformly from `[SPIKE_MIN, CEILING)`.
pub fn spike(state: &mut AnimationState, rng: &mut Rng) {
    state.intensity = rand_range(rng, SPIKE_MIN, CEILING).clamp(FLOOR, CEILING);
}
