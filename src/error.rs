//! Error and diagnostic types.
//!
//! Runtime recoil never fails; these types cover preset loading and the
//! configuration warnings logged when parameters change.

use thiserror::Error;

pub type RecoilDataResult<T> = Result<T, RecoilDataError>;

/// Failure while loading recoil presets from disk or text.
#[derive(Debug, Error)]
pub enum RecoilDataError {
    #[error("failed to read recoil presets: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse recoil presets: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A recoil parameter value the runtime has to reinterpret.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterIssue {
    #[error("{axis} strength range is inverted ({min} > {max}); bounds will be swapped")]
    InvertedRange {
        axis: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{phase} play rate {rate} is not positive; the timeline completes instantly")]
    NonPositivePlayRate { phase: &'static str, rate: f32 },

    #[error("reset delay {0} is negative; the reset starts on the next tick")]
    NegativeResetDelay(f32),
}
