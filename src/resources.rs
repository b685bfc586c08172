//! Global resources for the recoil system.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{CurveSettings, RecoilParameters, ResetSettings, StrengthRange};
use crate::error::{RecoilDataError, RecoilDataResult};
use crate::types::EasingFunction;

/// Global configuration for the recoil system.
///
/// # Fields
/// * `enabled` - Whether trigger messages start new kicks
/// * `debug_log` - Whether the debug plugin logs animator state changes
/// * `radians_per_unit` - Camera rotation per recoil unit
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::RecoilConfig;
///
/// let config = RecoilConfig {
///     radians_per_unit: 0.5_f32.to_radians(),
///     ..Default::default()
/// };
/// assert!(config.enabled);
/// ```
#[derive(Resource, Reflect, Clone, Debug)]
#[reflect(Resource)]
pub struct RecoilConfig {
    /// Accept new kicks
    pub enabled: bool,
    /// Log animator state transitions
    pub debug_log: bool,
    /// Camera radians per recoil unit
    pub radians_per_unit: f32,
}

impl Default for RecoilConfig {
    /// Creates a default RecoilConfig.
    ///
    /// Default values:
    /// - Recoil enabled
    /// - Debug logging disabled
    /// - One recoil unit is one degree
    fn default() -> Self {
        Self {
            enabled: true,
            debug_log: false,
            radians_per_unit: 1.0_f32.to_radians(),
        }
    }
}

impl RecoilConfig {
    /// Convert a recoil-space offset to `(yaw, pitch)` camera radians.
    pub fn to_radians(&self, offset: Vec2) -> Vec2 {
        offset * self.radians_per_unit
    }
}

/// A named recoil configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoilPreset {
    pub name: String,
    pub params: RecoilParameters,
}

impl RecoilPreset {
    pub fn new(name: impl Into<String>, params: RecoilParameters) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Library of recoil presets.
///
/// Ships with a handful of common weapon archetypes and can be replaced with
/// presets loaded from JSON.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::RecoilPresets;
///
/// let presets = RecoilPresets::with_defaults();
/// let rifle = presets.find("rifle").expect("rifle preset");
/// assert!(rifle.vertical.max > rifle.vertical.min);
/// ```
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoilPresets {
    pub presets: Vec<RecoilPreset>,
}

impl RecoilPresets {
    /// Creates a RecoilPresets instance with default weapon configurations.
    ///
    /// - Pistol: snappy vertical kick, quick recovery
    /// - Rifle: moderate kick with an eased recovery
    /// - SMG: light kick, fast apply, slow stacking recovery
    /// - Sniper: heavy kick, ADS halves it, long delay before recovery
    /// - Shotgun: heavy kick with horizontal jerks to either side
    pub fn with_defaults() -> Self {
        Self {
            presets: vec![
                RecoilPreset::new(
                    "pistol",
                    RecoilParameters::default()
                        .with_vertical(StrengthRange::new(1.5, 2.5))
                        .with_horizontal(StrengthRange::new(-0.3, 0.3))
                        .with_apply(CurveSettings::linear(8.0).with_easing(EasingFunction::EaseOut, 2.0))
                        .with_reset(ResetSettings {
                            enabled: true,
                            delay: 0.08,
                            curve: CurveSettings::linear(2.0)
                                .with_easing(EasingFunction::SinusoidalInOut, 2.0),
                        }),
                ),
                RecoilPreset::new(
                    "rifle",
                    RecoilParameters::default()
                        .with_apply(CurveSettings::linear(6.0).with_easing(EasingFunction::EaseOut, 2.0))
                        .with_reset(ResetSettings {
                            enabled: true,
                            delay: 0.15,
                            curve: CurveSettings::linear(1.0)
                                .with_easing(EasingFunction::CircularOut, 2.0),
                        }),
                ),
                RecoilPreset::new(
                    "smg",
                    RecoilParameters::default()
                        .with_vertical(StrengthRange::new(0.5, 1.0))
                        .with_horizontal(StrengthRange::new(-0.6, 0.6))
                        .with_apply(CurveSettings::linear(12.0))
                        .with_reset(ResetSettings {
                            enabled: true,
                            delay: 0.2,
                            curve: CurveSettings::linear(0.8)
                                .with_easing(EasingFunction::ExpoOut, 2.0),
                        }),
                ),
                RecoilPreset::new("sniper", {
                    let mut params = RecoilParameters::default()
                        .with_vertical(StrengthRange::new(5.0, 7.0))
                        .with_horizontal(StrengthRange::new(-1.0, 1.0))
                        .with_apply(CurveSettings::linear(10.0).with_easing(EasingFunction::ExpoOut, 2.0))
                        .with_reset(ResetSettings {
                            enabled: true,
                            delay: 0.4,
                            curve: CurveSettings::linear(0.6)
                                .with_easing(EasingFunction::EaseInOut, 3.0),
                        });
                    params.scale.ads = 0.5;
                    params
                }),
                RecoilPreset::new(
                    "shotgun",
                    RecoilParameters::default()
                        .with_vertical(StrengthRange::new(4.0, 5.0))
                        .with_horizontal(StrengthRange::new(-1.5, 1.5).with_forced_extremes())
                        .with_apply(CurveSettings::linear(9.0).with_easing(EasingFunction::EaseOut, 3.0))
                        .with_reset(ResetSettings {
                            enabled: true,
                            delay: 0.25,
                            curve: CurveSettings::linear(1.2)
                                .with_easing(EasingFunction::Step, 2.0)
                                .with_steps(4),
                        }),
                ),
            ],
        }
    }

    /// Look up a preset by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&RecoilParameters> {
        self.presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .map(|preset| &preset.params)
    }

    /// Parse presets from a JSON document.
    ///
    /// # Errors
    /// [`RecoilDataError::Parse`] if the text is not a valid preset list
    pub fn from_json_str(json: &str) -> RecoilDataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize presets to pretty-printed JSON.
    pub fn to_json_string(&self) -> RecoilDataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load presets from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RecoilDataResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load presets from a JSON file, falling back to the built-in presets
    /// when the file does not exist.
    ///
    /// # Errors
    /// Unreadable or malformed files are reported rather than silently replaced.
    pub fn load_or_default(path: impl AsRef<Path>) -> RecoilDataResult<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(RecoilDataError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No recoil presets at {}; using built-in presets", path.display());
                Ok(Self::with_defaults())
            }
            other => other,
        }
    }
}
