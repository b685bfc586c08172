//! Common types, enums and collaborator traits for the recoil system.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a recoil timeline.
///
/// Maps normalized timeline progress to an interpolation factor. The power
/// curves (`EaseIn`, `EaseOut`, `EaseInOut`) are shaped by an exponent and
/// `Step` quantizes progress into a fixed number of levels; both parameters
/// live next to the curve in [`CurveSettings`](crate::components::CurveSettings).
///
/// # Variants
/// * `Linear` - Constant speed
/// * `Step` - Discrete jumps between evenly spaced levels
/// * `SinusoidalIn` / `SinusoidalOut` / `SinusoidalInOut` - Quarter sine wave shaping
/// * `EaseIn` / `EaseOut` / `EaseInOut` - Power curves using the exponent
/// * `ExpoIn` / `ExpoOut` / `ExpoInOut` - Base-2 exponential shaping
/// * `CircularIn` / `CircularOut` / `CircularInOut` - Quarter circle shaping
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::types::EasingFunction;
///
/// let kick = EasingFunction::EaseOut;
/// let settle = EasingFunction::SinusoidalInOut;
/// assert_ne!(kick, settle);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum EasingFunction {
    #[default]
    /// Constant speed
    Linear,
    /// Quantized into `steps` discrete levels
    Step,
    /// Sine curve, slow start
    SinusoidalIn,
    /// Sine curve, slow end
    SinusoidalOut,
    /// Sine curve, slow start and end
    SinusoidalInOut,
    /// Power curve, slow start
    EaseIn,
    /// Power curve, slow end
    EaseOut,
    /// Power curve, slow start and end
    EaseInOut,
    /// Exponential curve, slow start
    ExpoIn,
    /// Exponential curve, slow end
    ExpoOut,
    /// Exponential curve, slow start and end
    ExpoInOut,
    /// Circular curve, slow start
    CircularIn,
    /// Circular curve, slow end
    CircularOut,
    /// Circular curve, slow start and end
    CircularInOut,
}

impl EasingFunction {
    /// Every easing curve, in declaration order.
    pub const ALL: [EasingFunction; 14] = [
        EasingFunction::Linear,
        EasingFunction::Step,
        EasingFunction::SinusoidalIn,
        EasingFunction::SinusoidalOut,
        EasingFunction::SinusoidalInOut,
        EasingFunction::EaseIn,
        EasingFunction::EaseOut,
        EasingFunction::EaseInOut,
        EasingFunction::ExpoIn,
        EasingFunction::ExpoOut,
        EasingFunction::ExpoInOut,
        EasingFunction::CircularIn,
        EasingFunction::CircularOut,
        EasingFunction::CircularInOut,
    ];
}

/// Playback state of a recoil timeline.
///
/// # Variants
/// * `Idle` - Not animating; progress is meaningless until the next start
/// * `Playing` - Progress advances every tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect)]
pub enum ProcessState {
    #[default]
    /// Not animating
    Idle,
    /// Advancing toward completion
    Playing,
}

/// Receiver of incremental camera rotation produced by the recoil animator.
///
/// Each call carries a one-time delta that must be added to the current view
/// orientation; it never restates an absolute value. Positive pitch looks
/// down, so upward recoil arrives as negative pitch.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::types::OrientationSink;
///
/// struct LookAccumulator {
///     yaw: f32,
///     pitch: f32,
/// }
///
/// impl OrientationSink for LookAccumulator {
///     fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
///         self.yaw += delta_yaw;
///         self.pitch += delta_pitch;
///     }
/// }
/// ```
pub trait OrientationSink {
    /// Add a rotation delta to the view.
    ///
    /// # Arguments
    /// * `delta_yaw` - Yaw change in recoil units (degrees by default)
    /// * `delta_pitch` - Pitch change in recoil units, negative looks up
    fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32);

    /// Whether the sink can currently receive deltas.
    ///
    /// The animator pauses while this returns `false`, e.g. while the owning
    /// character is respawning.
    fn is_available(&self) -> bool {
        true
    }
}

impl<S: OrientationSink + ?Sized> OrientationSink for &mut S {
    fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
        (**self).apply_orientation_delta(delta_yaw, delta_pitch);
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

impl<S: OrientationSink> OrientationSink for Option<S> {
    fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if let Some(sink) = self {
            sink.apply_orientation_delta(delta_yaw, delta_pitch);
        }
    }

    fn is_available(&self) -> bool {
        self.as_ref().is_some_and(|sink| sink.is_available())
    }
}

/// Movement and aiming state of the character holding the weapon.
///
/// Polled once per trigger to pick the recoil scale multipliers.
pub trait CharacterState {
    /// Whether the character is sprinting
    fn is_sprinting(&self) -> bool;
    /// Whether the character is crouching
    fn is_crouching(&self) -> bool;
    /// Whether the character is moving upward in a jump
    fn is_jumping(&self) -> bool;
    /// Whether the character is falling
    fn is_falling(&self) -> bool;
    /// Whether the character is aiming down sights
    fn is_ads(&self) -> bool;

    /// Whether the character may enter aim-down-sights right now.
    ///
    /// Airborne characters cannot switch.
    fn can_switch_to_ads(&self) -> bool {
        !self.is_jumping() && !self.is_falling()
    }
}

impl<C: CharacterState + ?Sized> CharacterState for &C {
    fn is_sprinting(&self) -> bool {
        (**self).is_sprinting()
    }
    fn is_crouching(&self) -> bool {
        (**self).is_crouching()
    }
    fn is_jumping(&self) -> bool {
        (**self).is_jumping()
    }
    fn is_falling(&self) -> bool {
        (**self).is_falling()
    }
    fn is_ads(&self) -> bool {
        (**self).is_ads()
    }
    fn can_switch_to_ads(&self) -> bool {
        (**self).can_switch_to_ads()
    }
}

// An absent provider reports a neutral state, so no multiplier applies.
impl<C: CharacterState> CharacterState for Option<C> {
    fn is_sprinting(&self) -> bool {
        self.as_ref().is_some_and(|c| c.is_sprinting())
    }
    fn is_crouching(&self) -> bool {
        self.as_ref().is_some_and(|c| c.is_crouching())
    }
    fn is_jumping(&self) -> bool {
        self.as_ref().is_some_and(|c| c.is_jumping())
    }
    fn is_falling(&self) -> bool {
        self.as_ref().is_some_and(|c| c.is_falling())
    }
    fn is_ads(&self) -> bool {
        self.as_ref().is_some_and(|c| c.is_ads())
    }
    fn can_switch_to_ads(&self) -> bool {
        self.as_ref().is_some_and(|c| c.can_switch_to_ads())
    }
}
