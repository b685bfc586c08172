//! Messages consumed by the recoil systems.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Sent when a weapon fires and should kick the view.
///
/// The shooter entity must carry a [`RecoilAnimator`](crate::animator::RecoilAnimator)
/// and [`RecoilParameters`](crate::components::RecoilParameters); entities
/// without parameters are ignored.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::events::RecoilTriggerEvent;
///
/// let event = RecoilTriggerEvent::new(Entity::PLACEHOLDER);
/// assert_eq!(event.shooter, Entity::PLACEHOLDER);
/// ```
#[derive(Message, Clone, Copy, Debug)]
pub struct RecoilTriggerEvent {
    /// Entity holding the recoil animator
    pub shooter: Entity,
}

impl RecoilTriggerEvent {
    pub fn new(shooter: Entity) -> Self {
        Self { shooter }
    }
}

/// Look input the player applied this frame, in recoil units.
///
/// Lets the animator bleed off yaw the player turned through and absorb pitch
/// the player pulled against the recoil.
///
/// # Fields
/// * `entity` - Entity holding the recoil animator
/// * `yaw` - Yaw change; zero means no horizontal input
/// * `pitch` - Pitch change; positive looks down
#[derive(Message, Clone, Copy, Debug)]
pub struct LookInputEvent {
    pub entity: Entity,
    pub yaw: f32,
    pub pitch: f32,
}

impl LookInputEvent {
    pub fn new(entity: Entity, yaw: f32, pitch: f32) -> Self {
        Self { entity, yaw, pitch }
    }
}

/// Clears an animator without animating, e.g. on weapon switch.
#[derive(Message, Clone, Copy, Debug)]
pub struct ResetRecoilEvent {
    pub entity: Entity,
}
