use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_recoil_dynamics::prelude::*;
use std::time::Duration;

fn main() {
    println!("Starting Headless Recoil Simulation...");
    println!("Firing a 10-round burst from the rifle preset, then letting the view settle...");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .add_plugins(RecoilCorePlugin)
        .insert_resource(RecoilPresets::with_defaults())
        .add_systems(Startup, setup_simulation)
        .add_systems(Update, (fire_burst, print_progress).after(RecoilSystems::Apply))
        .run();
}

#[derive(Component)]
struct Burst {
    remaining: u32,
    cooldown: Timer,
}

fn setup_simulation(mut commands: Commands, presets: Res<RecoilPresets>) {
    let params = presets.find("rifle").cloned().unwrap_or_default();
    println!("\n[SETUP] Rifle recoil: {:?}", params);

    commands.spawn((
        RecoilAnimator::with_seed(7),
        params,
        RecoilCharacterState::default(),
        RecoilOrientation::new(),
        Transform::default(),
        Burst {
            remaining: 10,
            cooldown: Timer::from_seconds(0.1, TimerMode::Repeating),
        },
        Name::new("Rifle Shooter"),
    ));
}

fn fire_burst(
    time: Res<Time>,
    mut shooters: Query<(Entity, &mut Burst)>,
    mut triggers: MessageWriter<RecoilTriggerEvent>,
) {
    for (entity, mut burst) in shooters.iter_mut() {
        if burst.remaining == 0 {
            continue;
        }
        if burst.cooldown.tick(time.delta()).just_finished() {
            burst.remaining -= 1;
            triggers.write(RecoilTriggerEvent::new(entity));
            println!("[FIRE] {} rounds left", burst.remaining);
        }
    }
}

fn print_progress(
    time: Res<Time>,
    mut timer: Local<f32>,
    shooters: Query<(&Name, &RecoilAnimator, &RecoilOrientation, &Burst)>,
) {
    *timer += time.delta_secs();
    if *timer > 0.25 {
        *timer = 0.0;
        for (name, animator, view, _) in shooters.iter() {
            let offset = animator.accumulated_offset();
            println!(
                "[INFO] {}: view pitch {:+.3} yaw {:+.3} | recoil offset pitch {:+.3} yaw {:+.3}",
                name, view.total.y, view.total.x, offset.y, offset.x
            );
        }
    }

    let settled = shooters
        .iter()
        .all(|(_, animator, _, burst)| burst.remaining == 0 && animator.is_idle());
    if settled && time.elapsed_secs() > 1.0 {
        println!("[FINISHED] View returned to rest after {:.2}s.", time.elapsed_secs());
        std::process::exit(0);
    }
    if time.elapsed_secs() > 10.0 {
        println!("[TIMEOUT] Recoil did not settle.");
        std::process::exit(1);
    }
}
