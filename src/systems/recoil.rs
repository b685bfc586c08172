//! ECS systems that drive [`RecoilAnimator`] components from messages.

use bevy::prelude::*;

use crate::animator::RecoilAnimator;
use crate::components::{RecoilCharacterState, RecoilOrientation, RecoilParameters};
use crate::events::{LookInputEvent, RecoilTriggerEvent, ResetRecoilEvent};
use crate::resources::RecoilConfig;

/// Ordering of the recoil systems within `Update`.
///
/// Run your own look input before [`RecoilSystems::Input`] and camera
/// follow-up after [`RecoilSystems::Apply`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoilSystems {
    /// Resets, triggers and look input are applied to animators
    Input,
    /// Timelines advance and emit rotation deltas
    Animate,
    /// Pending deltas are turned into transform rotation
    Apply,
}

/// Clear animators on request.
pub fn handle_recoil_resets(
    mut resets: MessageReader<ResetRecoilEvent>,
    mut animators: Query<&mut RecoilAnimator>,
) {
    for event in resets.read() {
        let Ok(mut animator) = animators.get_mut(event.entity) else {
            continue;
        };
        animator.reset_state();
        debug!("Recoil state cleared on {}", event.entity);
    }
}

/// Start a kick for every trigger message.
///
/// Messages are consumed but ignored while [`RecoilConfig::enabled`] is off.
pub fn handle_recoil_triggers(
    config: Res<RecoilConfig>,
    mut triggers: MessageReader<RecoilTriggerEvent>,
    mut shooters: Query<(
        &mut RecoilAnimator,
        Option<&RecoilParameters>,
        Option<&RecoilCharacterState>,
    )>,
) {
    for event in triggers.read() {
        if !config.enabled {
            continue;
        }
        let Ok((mut animator, params, state)) = shooters.get_mut(event.shooter) else {
            warn!("Recoil trigger for {} without a RecoilAnimator", event.shooter);
            continue;
        };
        animator.trigger(params, &state);
    }
}

/// Forward player look input to the animators.
pub fn handle_look_input(
    mut looks: MessageReader<LookInputEvent>,
    mut animators: Query<&mut RecoilAnimator>,
) {
    for event in looks.read() {
        let Ok(mut animator) = animators.get_mut(event.entity) else {
            continue;
        };
        animator.notify_external_yaw(event.yaw);
        animator.notify_external_pitch(event.pitch);
    }
}

/// Advance every animator by the frame time.
///
/// Animators without a [`RecoilOrientation`] stay paused. Idle animators only
/// record the frame time, so their orientation is not marked changed.
pub fn advance_recoil(
    time: Res<Time>,
    mut animators: Query<(&mut RecoilAnimator, Option<&mut RecoilOrientation>)>,
) {
    let dt = time.delta_secs();
    for (mut animator, mut orientation) in animators.iter_mut() {
        if animator.is_idle() {
            animator.advance(dt, &mut None::<RecoilOrientation>);
            continue;
        }
        let mut sink = orientation.as_deref_mut();
        animator.advance(dt, &mut sink);
    }
}

/// Rotate transforms by the recoil deltas gathered this frame.
///
/// Yaw turns around world up, pitch around the local right axis; positive
/// yaw turns right and positive pitch looks down.
pub fn apply_recoil_rotation(
    config: Res<RecoilConfig>,
    mut views: Query<(&mut RecoilOrientation, &mut Transform)>,
) {
    for (mut orientation, mut transform) in views.iter_mut() {
        if orientation.pending == Vec2::ZERO {
            continue;
        }
        let radians = config.to_radians(orientation.take_pending());
        transform.rotate_y(-radians.x);
        transform.rotate_local_x(-radians.y);
    }
}

/// Warn about parameter values the runtime reinterprets, once per change.
pub fn report_parameter_issues(params: Query<(Entity, &RecoilParameters), Changed<RecoilParameters>>) {
    for (entity, params) in params.iter() {
        for issue in params.issues() {
            warn!("Recoil parameters on {}: {}", entity, issue);
        }
    }
}
