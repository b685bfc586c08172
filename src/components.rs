//! Core components for the recoil system.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ParameterIssue;
use crate::types::{CharacterState, EasingFunction, OrientationSink};

/// Strength range for one recoil axis.
///
/// # Fields
/// * `min` - Lower bound of the sampled strength
/// * `max` - Upper bound of the sampled strength
/// * `force_extremes` - Pick either `min` or `max` with a coin flip instead of
///   sampling the whole range
///
/// An inverted range (`min > max`) is tolerated: the sampler swaps the bounds.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::StrengthRange;
///
/// let kick = StrengthRange::new(1.0, 2.0);
/// let snap = StrengthRange::new(-0.5, 0.5).with_forced_extremes();
/// assert!(snap.force_extremes);
/// assert_eq!(kick.span(), (1.0, 2.0));
/// ```
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrengthRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
    /// Only ever return one of the bounds
    #[serde(default)]
    pub force_extremes: bool,
}

impl StrengthRange {
    /// Creates a uniformly sampled range.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            force_extremes: false,
        }
    }

    /// Builder pattern: only return the bounds themselves.
    pub fn with_forced_extremes(mut self) -> Self {
        self.force_extremes = true;
        self
    }

    /// Bounds ordered from lesser to greater.
    pub fn span(&self) -> (f32, f32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }

    /// Whether `value` is a result the sampler may produce for this range.
    pub fn contains(&self, value: f32) -> bool {
        if self.force_extremes {
            return value == self.min || value == self.max;
        }
        let (low, high) = self.span();
        value >= low && value <= high
    }
}

/// Multipliers applied to the sampled strength based on character state.
///
/// All active multipliers compound: a character that sprints while crouching
/// gets `base * crouch * sprint`.
///
/// # Fields
/// * `base` - Always applied
/// * `sprint` - Applied while sprinting
/// * `crouch` - Applied while crouching
/// * `jump` - Applied while jumping
/// * `ads` - Applied while aiming down sights
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleModifiers {
    /// Always applied
    pub base: f32,
    /// Sprinting multiplier
    pub sprint: f32,
    /// Crouching multiplier
    pub crouch: f32,
    /// Jumping multiplier
    pub jump: f32,
    /// Aim-down-sights multiplier
    pub ads: f32,
}

impl Default for ScaleModifiers {
    /// Sprinting doubles recoil, crouching quarters it, jumping and ADS are neutral.
    fn default() -> Self {
        Self {
            base: 1.0,
            sprint: 2.0,
            crouch: 0.25,
            jump: 1.0,
            ads: 1.0,
        }
    }
}

/// Timeline speed and easing used by one recoil phase.
///
/// # Fields
/// * `play_rate` - Normalized progress per second (3.0 finishes in a third of a second)
/// * `easing` - Curve mapping progress to interpolation factor
/// * `exponent` - Exponent for the power curves
/// * `steps` - Level count for [`EasingFunction::Step`]
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveSettings {
    /// Progress units per second
    pub play_rate: f32,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingFunction,
    /// Exponent for power curves
    pub exponent: f32,
    /// Levels for stepped easing
    pub steps: u32,
}

impl CurveSettings {
    /// Creates linear settings with the given play rate.
    pub fn linear(play_rate: f32) -> Self {
        Self {
            play_rate,
            easing: EasingFunction::Linear,
            exponent: 2.0,
            steps: 2,
        }
    }

    /// Builder pattern: set easing curve and exponent.
    pub fn with_easing(mut self, easing: EasingFunction, exponent: f32) -> Self {
        self.easing = easing;
        self.exponent = exponent;
        self
    }

    /// Builder pattern: set step count.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Time in seconds a full run takes, or `None` for non-positive rates.
    pub fn duration(&self) -> Option<f32> {
        (self.play_rate > 0.0).then(|| 1.0 / self.play_rate)
    }
}

/// Settings for the phase that brings the view back after a shot.
///
/// # Fields
/// * `enabled` - Whether accumulated recoil animates back at all
/// * `delay` - Seconds between the end of the apply phase and the reset start
/// * `curve` - Timeline speed and easing of the reset
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetSettings {
    /// Reset recoil after each shot
    pub enabled: bool,
    /// Delay before resetting (seconds)
    pub delay: f32,
    /// Reset timeline
    pub curve: CurveSettings,
}

impl Default for ResetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: 0.05,
            curve: CurveSettings::linear(0.5),
        }
    }
}

/// Recoil configuration for a weapon.
///
/// Read once per trigger; the animator keeps a copy for the duration of the
/// shot, so edits only affect subsequent shots.
///
/// # Fields
/// * `vertical` - Vertical kick strength (positive rotates the view up)
/// * `horizontal` - Horizontal kick strength (positive rotates right)
/// * `scale` - State-dependent multipliers
/// * `apply` - Timeline of the kick itself
/// * `reset` - Timeline and delay of the recovery
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::{RecoilParameters, StrengthRange};
///
/// let params = RecoilParameters {
///     vertical: StrengthRange::new(2.0, 3.0),
///     ..Default::default()
/// }
/// .with_horizontal(StrengthRange::new(-1.0, 1.0).with_forced_extremes());
///
/// assert!(params.issues().is_empty());
/// ```
#[derive(Component, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
pub struct RecoilParameters {
    /// Vertical strength range
    pub vertical: StrengthRange,
    /// Horizontal strength range
    pub horizontal: StrengthRange,
    /// Scale multipliers
    #[serde(default)]
    pub scale: ScaleModifiers,
    /// Apply timeline
    pub apply: CurveSettings,
    /// Reset timeline
    #[serde(default)]
    pub reset: ResetSettings,
}

impl Default for RecoilParameters {
    /// Creates a moderate rifle-like kick.
    ///
    /// Default values:
    /// - Vertical 1.0..2.0, horizontal -0.5..0.5
    /// - Default scale modifiers
    /// - Linear apply at 3.0/s
    /// - Linear reset at 0.5/s after 0.05s
    fn default() -> Self {
        Self {
            vertical: StrengthRange::new(1.0, 2.0),
            horizontal: StrengthRange::new(-0.5, 0.5),
            scale: ScaleModifiers::default(),
            apply: CurveSettings::linear(3.0),
            reset: ResetSettings::default(),
        }
    }
}

impl RecoilParameters {
    /// Builder pattern: set vertical range
    pub fn with_vertical(mut self, vertical: StrengthRange) -> Self {
        self.vertical = vertical;
        self
    }

    /// Builder pattern: set horizontal range
    pub fn with_horizontal(mut self, horizontal: StrengthRange) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Builder pattern: set apply timeline
    pub fn with_apply(mut self, apply: CurveSettings) -> Self {
        self.apply = apply;
        self
    }

    /// Builder pattern: set reset settings
    pub fn with_reset(mut self, reset: ResetSettings) -> Self {
        self.reset = reset;
        self
    }

    /// Builder pattern: disable the reset phase
    pub fn without_reset(mut self) -> Self {
        self.reset.enabled = false;
        self
    }

    /// Lists configuration problems.
    ///
    /// None of these stop the recoil from working; they describe values the
    /// runtime has to reinterpret (swapped ranges, instant timelines).
    pub fn issues(&self) -> Vec<ParameterIssue> {
        let mut issues = Vec::new();

        for (axis, range) in [("vertical", &self.vertical), ("horizontal", &self.horizontal)] {
            if range.min > range.max {
                issues.push(ParameterIssue::InvertedRange {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if self.apply.play_rate <= 0.0 {
            issues.push(ParameterIssue::NonPositivePlayRate {
                phase: "apply",
                rate: self.apply.play_rate,
            });
        }
        if self.reset.enabled && self.reset.curve.play_rate <= 0.0 {
            issues.push(ParameterIssue::NonPositivePlayRate {
                phase: "reset",
                rate: self.reset.curve.play_rate,
            });
        }
        if self.reset.delay < 0.0 {
            issues.push(ParameterIssue::NegativeResetDelay(self.reset.delay));
        }

        issues
    }
}

/// Character state consumed by the recoil scale.
///
/// Games update these flags from their own movement code; the recoil system
/// only reads them when a shot is fired.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::RecoilCharacterState;
/// use bevy_recoil_dynamics::types::CharacterState;
///
/// let mut state = RecoilCharacterState::default();
/// assert!(state.try_set_ads(true));
///
/// state.falling = true;
/// assert!(!state.try_set_ads(false));
/// assert!(state.is_ads());
/// ```
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct RecoilCharacterState {
    /// Moving faster than the sprint threshold
    pub sprinting: bool,
    /// Crouched
    pub crouching: bool,
    /// Airborne and rising
    pub jumping: bool,
    /// Airborne and descending
    pub falling: bool,
    /// Aiming down sights
    pub ads: bool,
}

impl RecoilCharacterState {
    /// Changes the aim-down-sights flag if the character is allowed to switch.
    ///
    /// # Returns
    /// `true` if the flag was written
    pub fn try_set_ads(&mut self, ads: bool) -> bool {
        if !self.can_switch_to_ads() {
            return false;
        }
        self.ads = ads;
        true
    }
}

impl CharacterState for RecoilCharacterState {
    fn is_sprinting(&self) -> bool {
        self.sprinting
    }
    fn is_crouching(&self) -> bool {
        self.crouching
    }
    fn is_jumping(&self) -> bool {
        self.jumping
    }
    fn is_falling(&self) -> bool {
        self.falling
    }
    fn is_ads(&self) -> bool {
        self.ads
    }
}

/// View rotation produced by recoil, in recoil units (degrees by default).
///
/// `pending` collects deltas until [`apply_recoil_rotation`] turns them into
/// camera rotation; `total` keeps the running sum for HUDs and debugging.
///
/// [`apply_recoil_rotation`]: crate::systems::recoil::apply_recoil_rotation
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct RecoilOrientation {
    /// Deltas not yet applied to the transform (x = yaw, y = pitch)
    pub pending: Vec2,
    /// Sum of all deltas received (x = yaw, y = pitch)
    pub total: Vec2,
    /// Set to `false` to pause recoil animation, e.g. while respawning
    pub active: bool,
}

impl RecoilOrientation {
    /// Creates an active sink with no rotation.
    pub fn new() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    /// Returns and clears the deltas gathered since the last call.
    pub fn take_pending(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending)
    }
}

impl OrientationSink for RecoilOrientation {
    fn apply_orientation_delta(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let delta = Vec2::new(delta_yaw, delta_pitch);
        self.pending += delta;
        self.total += delta;
    }

    fn is_available(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        let params = RecoilParameters::default();
        assert!(params.issues().is_empty());
        assert_eq!(params.vertical.span(), (1.0, 2.0));
        assert_eq!(params.apply.duration(), Some(1.0 / 3.0));
    }

    #[test]
    fn test_inverted_range_reported() {
        let params = RecoilParameters::default().with_vertical(StrengthRange::new(3.0, 1.0));
        let issues = params.issues();
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ParameterIssue::InvertedRange { axis: "vertical", .. }));
        assert_eq!(params.vertical.span(), (1.0, 3.0));
    }

    #[test]
    fn test_disabled_reset_rate_not_reported() {
        let mut params = RecoilParameters::default().without_reset();
        params.reset.curve.play_rate = 0.0;
        assert!(params.issues().is_empty());

        params.reset.enabled = true;
        assert_eq!(params.issues().len(), 1);
    }

    #[test]
    fn test_ads_blocked_while_airborne() {
        let mut state = RecoilCharacterState {
            jumping: true,
            ..Default::default()
        };
        assert!(!state.try_set_ads(true));
        assert!(!state.ads);

        state.jumping = false;
        assert!(state.try_set_ads(true));
        assert!(state.ads);
    }

    #[test]
    fn test_orientation_collects_deltas() {
        let mut orientation = RecoilOrientation::new();
        orientation.apply_orientation_delta(0.25, -1.0);
        orientation.apply_orientation_delta(0.25, -0.5);

        assert_eq!(orientation.take_pending(), Vec2::new(0.5, -1.5));
        assert_eq!(orientation.pending, Vec2::ZERO);
        assert_eq!(orientation.total, Vec2::new(0.5, -1.5));
    }

    #[test]
    fn test_forced_range_contains_only_bounds() {
        let range = StrengthRange::new(-1.0, 1.0).with_forced_extremes();
        assert!(range.contains(-1.0));
        assert!(range.contains(1.0));
        assert!(!range.contains(0.0));
    }
}
