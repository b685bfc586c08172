use std::f32::consts::FRAC_PI_2;
use bevy::{
    color::palettes::tailwind,
    input::mouse::AccumulatedMouseMotion,
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use bevy_recoil_dynamics::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(RecoilPluginGroup)
        .insert_resource(RecoilPresets::with_defaults())
        .insert_resource(RecoilConfig {
            debug_log: true,
            ..default()
        })
        .add_systems(Startup, (spawn_player, spawn_world, spawn_ui))
        .add_systems(
            Update,
            (
                (look_around, update_movement_state, switch_weapons, handle_shooting)
                    .before(RecoilSystems::Input),
                (update_ui, grab_cursor),
            ),
        )
        .run();
}

// --- Components ---

#[derive(Component)]
struct Player;

#[derive(Component, Default, Deref, DerefMut)]
struct CameraSensitivity(Vec2);

#[derive(Component)]
struct Weapon {
    preset: usize,
    fire_interval: f32,
    last_fire_time: f32,
}

#[derive(Component)]
struct WeaponText;

#[derive(Component)]
struct OffsetText;

#[derive(Component)]
struct PatternImage;

// --- Startup Systems ---

fn spawn_player(mut commands: Commands, presets: Res<RecoilPresets>) {
    let params = presets.presets[0].params.clone();

    commands.spawn((
        Player,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 90.0_f32.to_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, 1.5, 5.0),
        CameraSensitivity(Vec2::new(0.15, 0.12)),
        Weapon {
            preset: 0,
            fire_interval: 0.25,
            last_fire_time: f32::NEG_INFINITY,
        },
        RecoilAnimator::new(),
        params,
        RecoilCharacterState::default(),
        RecoilOrientation::new(),
        RecoilPreview::new(PreviewSettings {
            width: 256,
            height: 256,
            ..default()
        }),
    ));
}

fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50.0, 50.0))),
        MeshMaterial3d(materials.add(Color::from(tailwind::STONE_700))),
    ));

    // Target wall with a grid of markers to judge the kick against.
    let wall = materials.add(Color::from(tailwind::SLATE_300));
    let marker = materials.add(Color::from(tailwind::RED_500));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(10.0, 6.0, 0.2))),
        MeshMaterial3d(wall),
        Transform::from_xyz(0.0, 3.0, -10.0),
    ));
    for x in -2..=2 {
        for y in 0..3 {
            commands.spawn((
                Mesh3d(meshes.add(Sphere::new(0.08))),
                MeshMaterial3d(marker.clone()),
                Transform::from_xyz(x as f32 * 2.0, 1.5 + y as f32 * 1.5, -9.85),
            ));
        }
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(20.0)),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Recoil offset"),
                TextFont::from_font_size(20.0),
                TextColor(Color::WHITE),
                OffsetText,
            ));

            parent.spawn((
                ImageNode::default(),
                Node {
                    width: Val::Px(192.0),
                    height: Val::Px(192.0),
                    ..default()
                },
                PatternImage,
            ));

            parent.spawn((
                Text::new("Weapon"),
                TextFont::from_font_size(32.0),
                TextColor(tailwind::AMBER_300.into()),
                WeaponText,
            ));

            parent.spawn((
                Text::new(
                    "MOUSE: Look | LCLICK: Shoot | RCLICK: Aim | SHIFT: Sprint | C: Crouch | 1-5: Switch Weapons",
                ),
                TextFont::from_font_size(16.0),
                TextColor(tailwind::GRAY_400.into()),
            ));
        });

    commands.spawn((
        Node {
            width: Val::Px(4.0),
            height: Val::Px(4.0),
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            margin: UiRect::new(Val::Px(-2.0), Val::Px(0.0), Val::Px(-2.0), Val::Px(0.0)),
            ..default()
        },
        BackgroundColor(Color::WHITE),
    ));
}

// --- Update Systems ---

/// Mouse look, reported to the animator in recoil units (degrees).
fn look_around(
    accumulated_mouse_motion: Res<AccumulatedMouseMotion>,
    player: Single<(Entity, &mut Transform, &CameraSensitivity), With<Player>>,
    mut looks: MessageWriter<LookInputEvent>,
) {
    let (entity, mut transform, sensitivity) = player.into_inner();

    let delta = accumulated_mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }
    let look = delta * **sensitivity;

    let (mut yaw, mut pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
    yaw -= look.x.to_radians();
    pitch -= look.y.to_radians();

    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;
    pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);

    looks.write(LookInputEvent::new(entity, look.x, look.y));
}

fn update_movement_state(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut state: Single<&mut RecoilCharacterState, With<Player>>,
) {
    state.sprinting = keyboard.pressed(KeyCode::ShiftLeft);
    state.crouching = keyboard.pressed(KeyCode::KeyC);

    let wants_ads = mouse.pressed(MouseButton::Right);
    if wants_ads != state.ads {
        state.try_set_ads(wants_ads);
    }
}

fn switch_weapons(
    keyboard: Res<ButtonInput<KeyCode>>,
    presets: Res<RecoilPresets>,
    player: Single<(Entity, &mut Weapon, &mut RecoilParameters), With<Player>>,
    mut resets: MessageWriter<ResetRecoilEvent>,
) {
    let (entity, mut weapon, mut params) = player.into_inner();

    let keys = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    let Some(index) = keys.iter().position(|key| keyboard.just_pressed(*key)) else {
        return;
    };
    let Some(preset) = presets.presets.get(index) else {
        return;
    };
    if index == weapon.preset {
        return;
    }

    weapon.preset = index;
    weapon.fire_interval = match preset.name.as_str() {
        "smg" => 0.07,
        "rifle" => 0.1,
        "sniper" => 1.2,
        "shotgun" => 0.8,
        _ => 0.25,
    };
    *params = preset.params.clone();
    resets.write(ResetRecoilEvent { entity });
}

fn handle_shooting(
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    player: Single<(Entity, &mut Weapon), With<Player>>,
    mut triggers: MessageWriter<RecoilTriggerEvent>,
) {
    let (entity, mut weapon) = player.into_inner();
    let now = time.elapsed_secs();

    if mouse.pressed(MouseButton::Left) && now - weapon.last_fire_time >= weapon.fire_interval {
        weapon.last_fire_time = now;
        triggers.write(RecoilTriggerEvent::new(entity));
    }
}

fn update_ui(
    presets: Res<RecoilPresets>,
    player: Single<(&Weapon, &RecoilAnimator, &RecoilCharacterState, &RecoilPreview), With<Player>>,
    mut weapon_text: Single<&mut Text, (With<WeaponText>, Without<OffsetText>)>,
    mut offset_text: Single<&mut Text, (With<OffsetText>, Without<WeaponText>)>,
    mut pattern: Single<&mut ImageNode, With<PatternImage>>,
) {
    let (weapon, animator, state, preview) = *player;

    let name = presets
        .presets
        .get(weapon.preset)
        .map(|preset| preset.name.as_str())
        .unwrap_or("unknown");
    weapon_text.0 = format!("Weapon: {}{}", name, if state.ads { " (ADS)" } else { "" });

    let offset = animator.accumulated_offset();
    offset_text.0 = format!(
        "Recoil offset: pitch {:+.2} yaw {:+.2} | apply {:.2} reset {:.2}",
        offset.y,
        offset.x,
        animator.apply_progress(),
        animator.reset_progress()
    );

    if pattern.image != preview.image {
        pattern.image = preview.image.clone();
    }
}

fn grab_cursor(
    mut cursor_options: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    key: Res<ButtonInput<KeyCode>>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    }

    if key.just_pressed(KeyCode::Escape) {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}
