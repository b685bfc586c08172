//! Easing curves and smoothing helpers used by the recoil timelines.

use std::f32::consts::FRAC_PI_2;

use crate::types::EasingFunction;

/// Interpolate between `from` and `to` along an easing curve.
///
/// Progress is clamped to `[0, 1]` before evaluation, so both ends of every
/// curve land exactly on `from` and `to`.
///
/// # Arguments
/// * `from` - Value at progress 0
/// * `to` - Value at progress 1
/// * `progress` - Normalized timeline progress
/// * `easing` - Curve to apply
/// * `exponent` - Exponent for the power curves
/// * `steps` - Level count for [`EasingFunction::Step`]
///
/// # Returns
/// `from + (to - from) * f(progress)`
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::systems::easing::ease;
/// use bevy_recoil_dynamics::types::EasingFunction;
///
/// assert_eq!(ease(0.0, 4.0, 0.5, EasingFunction::Linear, 2.0, 2), 2.0);
/// assert_eq!(ease(0.0, 4.0, 0.5, EasingFunction::EaseIn, 2.0, 2), 1.0);
/// ```
pub fn ease(
    from: f32,
    to: f32,
    progress: f32,
    easing: EasingFunction,
    exponent: f32,
    steps: u32,
) -> f32 {
    let alpha = easing_factor(progress.clamp(0.0, 1.0), easing, exponent, steps);
    from + (to - from) * alpha
}

/// Interpolation factor of a curve at normalized progress `t`.
pub fn easing_factor(t: f32, easing: EasingFunction, exponent: f32, steps: u32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        EasingFunction::Linear => t,
        EasingFunction::Step => step(t, steps),
        EasingFunction::SinusoidalIn => sin_in(t),
        EasingFunction::SinusoidalOut => sin_out(t),
        EasingFunction::SinusoidalInOut => in_out(t, sin_in, sin_out),
        EasingFunction::EaseIn => t.powf(exponent),
        EasingFunction::EaseOut => 1.0 - (1.0 - t).powf(exponent),
        EasingFunction::EaseInOut => {
            if t < 0.5 {
                (t * 2.0).powf(exponent) * 0.5
            } else {
                (1.0 - (1.0 - (t * 2.0 - 1.0)).powf(exponent)) * 0.5 + 0.5
            }
        }
        EasingFunction::ExpoIn => expo_in(t),
        EasingFunction::ExpoOut => expo_out(t),
        EasingFunction::ExpoInOut => in_out(t, expo_in, expo_out),
        EasingFunction::CircularIn => circular_in(t),
        EasingFunction::CircularOut => circular_out(t),
        EasingFunction::CircularInOut => in_out(t, circular_in, circular_out),
    }
}

/// Move `current` toward `target` by a fraction proportional to `dt * speed`.
///
/// Frame-rate dependent exponential smoothing: a non-positive speed snaps to
/// the target, and values closer than `1e-4` snap as well.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let distance = target - current;
    if distance * distance < 1.0e-8 {
        return target;
    }
    current + distance * (dt * speed).clamp(0.0, 1.0)
}

// Quantizes into `steps` levels spread evenly over [0, 1]. Fewer than two
// levels hold the start value until the end.
fn step(t: f32, steps: u32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    if steps <= 1 || t <= 0.0 {
        return 0.0;
    }
    let levels = steps as f32;
    ((t * levels).floor() / (levels - 1.0)).min(1.0)
}

fn in_out(t: f32, ease_in: fn(f32) -> f32, ease_out: fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        ease_in(t * 2.0) * 0.5
    } else {
        ease_out(t * 2.0 - 1.0) * 0.5 + 0.5
    }
}

fn sin_in(t: f32) -> f32 {
    1.0 - (t * FRAC_PI_2).cos()
}

fn sin_out(t: f32) -> f32 {
    (t * FRAC_PI_2).sin()
}

fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * (t - 1.0))
    }
}

fn expo_out(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

fn circular_in(t: f32) -> f32 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

fn circular_out(t: f32) -> f32 {
    let t = t - 1.0;
    (1.0 - t * t).max(0.0).sqrt()
}
