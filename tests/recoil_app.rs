//! App-level tests: messages in, camera rotation out.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_recoil_dynamics::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn recoil_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(RecoilCorePlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(FRAME)));
    // The first update only starts the clock.
    app.update();
    app
}

fn spawn_shooter(app: &mut App, params: RecoilParameters) -> Entity {
    app.world_mut()
        .spawn((
            RecoilAnimator::with_seed(21),
            params,
            RecoilCharacterState::default(),
            RecoilOrientation::new(),
            Transform::default(),
        ))
        .id()
}

fn fire(app: &mut App, shooter: Entity) {
    app.world_mut().write_message(RecoilTriggerEvent::new(shooter));
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn animator(app: &App, entity: Entity) -> &RecoilAnimator {
    app.world().get::<RecoilAnimator>(entity).unwrap()
}

fn orientation(app: &App, entity: Entity) -> &RecoilOrientation {
    app.world().get::<RecoilOrientation>(entity).unwrap()
}

#[test]
fn test_trigger_rotates_camera_up() {
    let mut app = recoil_app();
    let shooter = spawn_shooter(&mut app, RecoilParameters::default().without_reset());

    fire(&mut app, shooter);
    run_frames(&mut app, 30);

    let view = orientation(&app, shooter);
    assert!(view.total.y <= -1.0 + 1.0e-4 && view.total.y >= -2.0 - 1.0e-4, "{:?}", view.total);
    assert!(view.total.x.abs() <= 0.5 + 1.0e-4);
    assert_eq!(view.pending, Vec2::ZERO);
    assert!((animator(&app, shooter).accumulated_offset() - view.total).length() < 1.0e-4);

    let transform = app.world().get::<Transform>(shooter).unwrap();
    assert!(transform.forward().y > 0.0, "camera should look up after a kick");
}

#[test]
fn test_full_cycle_returns_camera() {
    let mut app = recoil_app();
    let shooter = spawn_shooter(&mut app, RecoilParameters::default());

    fire(&mut app, shooter);
    run_frames(&mut app, 200);

    assert!(animator(&app, shooter).is_idle());
    assert!(orientation(&app, shooter).total.length() < 1.0e-3);

    let transform = app.world().get::<Transform>(shooter).unwrap();
    assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1.0e-3);
}

#[test]
fn test_idle_animator_leaves_orientation_untouched() {
    let mut app = recoil_app();
    let shooter = spawn_shooter(&mut app, RecoilParameters::default());
    let last_changed = |app: &App| {
        app.world()
            .entity(shooter)
            .get_ref::<RecoilOrientation>()
            .unwrap()
            .last_changed()
    };

    app.update();
    let spawned = last_changed(&app);
    run_frames(&mut app, 5);
    assert_eq!(last_changed(&app), spawned);

    fire(&mut app, shooter);
    app.update();
    assert_ne!(last_changed(&app), spawned);
}

#[test]
fn test_disabled_config_ignores_triggers() {
    let mut app = recoil_app();
    app.world_mut().resource_mut::<RecoilConfig>().enabled = false;
    let shooter = spawn_shooter(&mut app, RecoilParameters::default());

    fire(&mut app, shooter);
    run_frames(&mut app, 10);

    assert!(animator(&app, shooter).is_idle());
    assert_eq!(orientation(&app, shooter).total, Vec2::ZERO);
}

#[test]
fn test_reset_message_clears_offset() {
    let mut app = recoil_app();
    let shooter = spawn_shooter(&mut app, RecoilParameters::default());

    fire(&mut app, shooter);
    run_frames(&mut app, 5);
    assert!(animator(&app, shooter).accumulated_offset() != Vec2::ZERO);

    let kicked = orientation(&app, shooter).total;
    app.world_mut().write_message(ResetRecoilEvent { entity: shooter });
    run_frames(&mut app, 60);

    assert!(animator(&app, shooter).is_idle());
    assert_eq!(animator(&app, shooter).accumulated_offset(), Vec2::ZERO);
    // The view keeps whatever rotation it had.
    assert_eq!(orientation(&app, shooter).total, kicked);
}

#[test]
fn test_look_input_counteracts_pitch() {
    let mut app = recoil_app();
    let params = RecoilParameters::default()
        .with_vertical(StrengthRange::new(2.0, 2.0))
        .without_reset();
    let shooter = spawn_shooter(&mut app, params);

    fire(&mut app, shooter);
    run_frames(&mut app, 30);
    let before = animator(&app, shooter).accumulated_offset();

    app.world_mut()
        .write_message(LookInputEvent::new(shooter, 0.0, 0.5));
    app.update();

    let after = animator(&app, shooter).accumulated_offset();
    assert!((after.y - (before.y + 0.5)).abs() < 1.0e-4);
}

#[test]
fn test_missing_orientation_pauses() {
    let mut app = recoil_app();
    let shooter = app
        .world_mut()
        .spawn((RecoilAnimator::with_seed(3), RecoilParameters::default()))
        .id();

    fire(&mut app, shooter);
    run_frames(&mut app, 30);

    let animator = animator(&app, shooter);
    assert!(animator.is_applying());
    assert_eq!(animator.apply_progress(), 0.0);
    assert_eq!(animator.accumulated_offset(), Vec2::ZERO);
}

#[test]
fn test_missing_parameters_ignored() {
    let mut app = recoil_app();
    let shooter = app
        .world_mut()
        .spawn((RecoilAnimator::with_seed(4), RecoilOrientation::new()))
        .id();

    fire(&mut app, shooter);
    run_frames(&mut app, 10);

    assert!(animator(&app, shooter).is_idle());
    assert_eq!(orientation(&app, shooter).total, Vec2::ZERO);
}

#[test]
fn test_character_state_scales_kick() {
    let mut app = recoil_app();
    let params = RecoilParameters::default()
        .with_vertical(StrengthRange::new(2.0, 2.0))
        .with_horizontal(StrengthRange::new(0.0, 0.0))
        .without_reset();
    let shooter = spawn_shooter(&mut app, params);
    app.world_mut()
        .get_mut::<RecoilCharacterState>(shooter)
        .unwrap()
        .sprinting = true;

    fire(&mut app, shooter);
    run_frames(&mut app, 30);

    assert!((orientation(&app, shooter).total.y + 4.0).abs() < 1.0e-4);
}

#[cfg(feature = "preview")]
#[test]
fn test_preview_rebuilds_on_parameter_change() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .init_asset::<Image>()
        .add_plugins(RecoilPreviewPlugin);

    let settings = PreviewSettings {
        width: 64,
        height: 64,
        ..Default::default()
    };
    let entity = app
        .world_mut()
        .spawn((RecoilParameters::default(), RecoilPreview::new(settings)))
        .id();
    app.update();

    let handle = app.world().get::<RecoilPreview>(entity).unwrap().image.clone();
    let first = {
        let images = app.world().resource::<Assets<Image>>();
        let image = images.get(&handle).expect("preview image");
        assert_eq!(image.width(), 64);
        image.data.clone()
    };

    app.world_mut()
        .get_mut::<RecoilParameters>(entity)
        .unwrap()
        .vertical = StrengthRange::new(4.0, 4.0);
    app.update();

    let preview = app.world().get::<RecoilPreview>(entity).unwrap();
    assert_eq!(preview.image, handle);
    let images = app.world().resource::<Assets<Image>>();
    assert_ne!(images.get(&handle).unwrap().data, first);
}
