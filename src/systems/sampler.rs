//! Strength sampler - turns recoil parameters into a single yaw/pitch impulse.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{RecoilParameters, StrengthRange};
use crate::types::CharacterState;

/// Calculate the recoil scale from the character's current state.
///
/// Every active state multiplier is applied, so combined states compound
/// (sprinting while crouching multiplies by both).
///
/// # Arguments
/// * `params` - Recoil parameters holding the multipliers
/// * `state` - Character state provider; `None` counts as a neutral state
///
/// # Returns
/// The multiplier applied to both sampled axes
pub fn recoil_scale<C: CharacterState + ?Sized>(params: &RecoilParameters, state: &C) -> f32 {
    let scale = &params.scale;
    scale.base
        * if state.is_crouching() { scale.crouch } else { 1.0 }
        * if state.is_sprinting() { scale.sprint } else { 1.0 }
        * if state.is_jumping() { scale.jump } else { 1.0 }
        * if state.is_ads() { scale.ads } else { 1.0 }
}

/// Draw one strength value from a range.
///
/// With `force_extremes` a coin flip picks `max` or `min`. Otherwise the value
/// is uniform over the range; an inverted range (`min > max`) is sampled over
/// its swapped bounds rather than rejected, and a degenerate range returns its
/// single value. Infinite bounds are limited to `±f32::MAX`.
pub fn sample_axis<R: Rng + ?Sized>(range: &StrengthRange, rng: &mut R) -> f32 {
    if range.force_extremes {
        return if rng.random_bool(0.5) { range.max } else { range.min };
    }

    let (low, high) = range.span();
    // Also catches NaN bounds, which `random_range` would panic on.
    if !(low < high) {
        return low;
    }

    let low = low.max(-f32::MAX);
    let high = high.min(f32::MAX);
    if (high - low).is_finite() {
        return rng.random_range(low..=high);
    }

    // `random_range` rejects ranges whose width overflows.
    let t: f32 = rng.random();
    (low * (1.0 - t) + high * t).clamp(low, high)
}

/// Sample a recoil impulse.
///
/// Vertical strength rotates the view up, which is negative pitch.
///
/// # Arguments
/// * `params` - Recoil parameters
/// * `scale` - Multiplier from [`recoil_scale`]
/// * `rng` - Random source; pass a seeded `StdRng` for reproducible results
///
/// # Returns
/// The impulse as `Vec2 { x: yaw, y: pitch }`
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::RecoilParameters;
/// use bevy_recoil_dynamics::systems::sampler::sample_strength;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let impulse = sample_strength(&RecoilParameters::default(), 1.0, &mut rng);
/// assert!(impulse.y <= -1.0 && impulse.y >= -2.0);
/// ```
pub fn sample_strength<R: Rng + ?Sized>(params: &RecoilParameters, scale: f32, rng: &mut R) -> Vec2 {
    let vertical = sample_axis(&params.vertical, rng);
    let horizontal = sample_axis(&params.horizontal, rng);
    Vec2::new(horizontal * scale, -vertical * scale)
}
