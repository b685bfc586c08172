//! # Bevy Recoil Dynamics
//!
//! Weapon recoil animation plugin for Bevy 0.18.
//!
//! ## Features
//! - Randomized kick strength with per-axis forced extremes
//! - Sprint, crouch, jump and ADS multipliers
//! - Eased apply and reset timelines (14 easing curves)
//! - Accumulated offset tracking so rapid fire stacks and resets cleanly
//! - Player look input bleeds off or restarts the reset
//! - Shot pattern preview textures
//! - JSON presets
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_recoil_dynamics::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(RecoilPluginGroup)
//!         .add_systems(Startup, spawn_player)
//!         .run();
//! }
//!
//! fn spawn_player(mut commands: Commands) {
//!     commands.spawn((
//!         Camera3d::default(),
//!         RecoilAnimator::new(),
//!         RecoilParameters::default(),
//!         RecoilCharacterState::default(),
//!         RecoilOrientation::new(),
//!     ));
//! }
//! ```
//!
//! Send a [`RecoilTriggerEvent`](events::RecoilTriggerEvent) for the camera
//! entity whenever the weapon fires.

pub mod animator;
pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
pub mod timeline;
pub mod types;

pub mod prelude {
    pub use crate::animator::RecoilAnimator;
    pub use crate::components::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::resources::*;
    pub use crate::systems::recoil::RecoilSystems;
    pub use crate::types::*;
    pub use crate::RecoilPluginGroup;
    pub use crate::{RecoilCorePlugin, RecoilDebugPlugin};

    pub use crate::systems::preview::PreviewSettings;
    #[cfg(feature = "preview")]
    pub use crate::systems::preview::RecoilPreview;
    #[cfg(feature = "preview")]
    pub use crate::RecoilPreviewPlugin;
}

use bevy::prelude::*;

use systems::recoil::RecoilSystems;

/// Main plugin group that includes all recoil subsystems.
///
/// # Example
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::prelude::*;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(RecoilPluginGroup)
///         .run();
/// }
/// ```
#[derive(Default)]
pub struct RecoilPluginGroup;

impl PluginGroup for RecoilPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        let group = bevy::app::PluginGroupBuilder::start::<Self>().add(RecoilCorePlugin);

        #[cfg(feature = "preview")]
        let group = group.add(RecoilPreviewPlugin);

        group.add(RecoilDebugPlugin)
    }
}

/// Core recoil plugin (messages, animation, camera rotation).
///
/// Works with `MinimalPlugins`; nothing here needs rendering.
///
/// # Systems
/// - `handle_recoil_resets` - Clears animators on [`events::ResetRecoilEvent`]
/// - `handle_recoil_triggers` - Starts kicks on [`events::RecoilTriggerEvent`]
/// - `handle_look_input` - Feeds [`events::LookInputEvent`] to the animators
/// - `advance_recoil` - Advances timelines and emits rotation deltas
/// - `apply_recoil_rotation` - Rotates transforms by the emitted deltas
/// - `report_parameter_issues` - Warns about reinterpreted parameter values
pub struct RecoilCorePlugin;

impl Plugin for RecoilCorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::RecoilParameters>()
            .register_type::<components::RecoilCharacterState>()
            .register_type::<components::RecoilOrientation>()
            .register_type::<resources::RecoilConfig>()
            .init_resource::<resources::RecoilConfig>()
            .add_message::<events::RecoilTriggerEvent>()
            .add_message::<events::LookInputEvent>()
            .add_message::<events::ResetRecoilEvent>()
            .configure_sets(
                Update,
                (
                    RecoilSystems::Input,
                    RecoilSystems::Animate,
                    RecoilSystems::Apply,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (
                        systems::recoil::handle_recoil_resets,
                        systems::recoil::handle_recoil_triggers,
                        systems::recoil::handle_look_input,
                    )
                        .chain()
                        .in_set(RecoilSystems::Input),
                    systems::recoil::advance_recoil.in_set(RecoilSystems::Animate),
                    systems::recoil::apply_recoil_rotation.in_set(RecoilSystems::Apply),
                    systems::recoil::report_parameter_issues,
                ),
            );
    }
}

/// Pattern preview plugin.
///
/// Keeps every [`RecoilPreview`](systems::preview::RecoilPreview) texture in
/// sync with its entity's parameters. Needs an `Assets<Image>` resource, which
/// `DefaultPlugins` provides.
#[cfg(feature = "preview")]
pub struct RecoilPreviewPlugin;

#[cfg(feature = "preview")]
impl Plugin for RecoilPreviewPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<systems::preview::RecoilPreview>()
            .add_systems(PostUpdate, systems::preview::rebuild_recoil_previews);
    }
}

/// Debug plugin logging animator phase changes.
pub struct RecoilDebugPlugin;

impl Plugin for RecoilDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            systems::debug::log_recoil_state.after(RecoilSystems::Animate),
        );
    }
}
