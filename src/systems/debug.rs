use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::animator::RecoilAnimator;
use crate::resources::RecoilConfig;

/// Coarse animator phase used for debug output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoilPhase {
    Idle,
    Applying,
    AwaitingReset,
    Resetting,
}

impl RecoilPhase {
    pub fn of(animator: &RecoilAnimator) -> Self {
        if animator.is_applying() {
            Self::Applying
        } else if animator.is_resetting() {
            Self::Resetting
        } else if animator.has_pending_reset() {
            Self::AwaitingReset
        } else {
            Self::Idle
        }
    }
}

/// Log animator phase transitions.
///
/// Only active while `RecoilConfig::debug_log` is set.
pub fn log_recoil_state(
    config: Res<RecoilConfig>,
    animators: Query<(Entity, &RecoilAnimator)>,
    mut phases: Local<HashMap<Entity, RecoilPhase>>,
) {
    if !config.debug_log {
        phases.clear();
        return;
    }

    for (entity, animator) in animators.iter() {
        let phase = RecoilPhase::of(animator);
        let previous = phases.insert(entity, phase);
        if previous == Some(phase) {
            continue;
        }

        let offset = animator.accumulated_offset();
        debug!(
            "{}: {:?} -> {:?} | offset yaw {:.3} pitch {:.3} | apply {:.2} reset {:.2} | absorbed {:.3}",
            entity,
            previous,
            phase,
            offset.x,
            offset.y,
            animator.apply_progress(),
            animator.reset_progress(),
            animator.reset_pitch_absorbed(),
        );
    }

    // Forget despawned animators.
    phases.retain(|entity, _| animators.contains(*entity));
}
