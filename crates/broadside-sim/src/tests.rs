//! Tests for the simulation engine, ship motion, combat and sea object rules.

use glam::DVec3;
use hecs::Entity;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use broadside_core::commands::{InputIntent, PlayerCommand};
use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::events::SimEvent;
use broadside_core::profiles::PLAYER_PROFILE;
use broadside_core::state::GameStateSnapshot;
use broadside_terrain::mesh::{perturbed_cone, ConeMesh, ConeParams, FormationMesh};
use broadside_terrain::{Formation, TerrainField};

use crate::config::{ConfigError, SimConfig};
use crate::engine::SimulationEngine;
use crate::error::SimError;
use crate::session::{Session, TickRoster};
use crate::systems::ship_motion::{
    approach, frame_scale, integrate, set_throttle, set_turn, ship_bounds, ApproachRates,
};
use crate::systems::{combat, effects, player_control, projectiles};
use crate::world_setup;

// ---- Helpers ----

/// Active engine with an empty sea: no terrain, no scheduled spawns.
fn quiet_engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 7,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    *engine.terrain_mut() = TerrainField::default();
    let director = engine.director_mut();
    director.enemy_interval = f64::INFINITY;
    director.sea_object_interval = f64::INFINITY;
    engine
}

fn player(engine: &SimulationEngine) -> Entity {
    engine.player().expect("player ship should exist")
}

fn max_speed(engine: &SimulationEngine) -> f64 {
    engine
        .world()
        .get::<&ShipMotion>(player(engine))
        .unwrap()
        .max_speed
}

fn health(engine: &SimulationEngine, ship: Entity) -> f64 {
    engine.world().get::<&Hull>(ship).unwrap().health
}

fn effects_of(engine: &SimulationEngine) -> TimedEffects {
    (*engine.world().get::<&TimedEffects>(player(engine)).unwrap()).clone()
}

fn spawn_object(engine: &mut SimulationEngine, kind: SeaObjectKind, position: DVec3) -> Entity {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    world_setup::spawn_sea_object(engine.world_mut(), &mut rng, kind, position)
}

fn spawn_enemy(engine: &mut SimulationEngine, class: ShipClass, position: DVec3) -> Entity {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    world_setup::spawn_enemy(engine.world_mut(), &mut rng, class, position, 0.0, false)
}

fn run_ticks(engine: &mut SimulationEngine, n: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(engine.tick().events);
    }
    events
}

fn count<F: Fn(&SimEvent) -> bool>(events: &[SimEvent], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// A fully risen mountain centered at `(0, 0, z)`: collision box spans 45 units each side.
fn settled_mountain(z: f64) -> Formation {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let body = ConeMesh {
        vertices: perturbed_cone(
            &mut rng,
            ConeParams {
                radius: 100.0,
                height: 200.0,
                segments: 16,
                noise: 0.0,
                ridge: 0.0,
            },
        ),
        offset_y: 0.0,
        color: 0x696969,
    };
    Formation::new(
        FormationKind::Mountain,
        DVec3::new(0.0, -20.0, z),
        0.0,
        100.0,
        200.0,
        FormationMesh {
            body,
            snow_cap: None,
        },
        0.001,
    )
}

// ---- Determinism ----

fn scripted_input(tick: usize) -> InputIntent {
    InputIntent {
        forward: true,
        left: (tick / 120) % 2 == 0,
        fire: tick % 7 == 0,
        turbo_active: (tick / 300) % 2 == 1,
        ..Default::default()
    }
}

fn scripted_run(seed: u64, ticks: usize) -> Vec<String> {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame);
    (0..ticks)
        .map(|t| {
            engine.set_input(scripted_input(t));
            serde_json::to_string(&engine.tick()).unwrap()
        })
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    let a = scripted_run(12345, 900);
    let b = scripted_run(12345, 900);
    for (tick, (snap_a, snap_b)) in a.iter().zip(&b).enumerate() {
        assert_eq!(snap_a, snap_b, "Snapshots diverged at tick {tick} with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    a.queue_command(PlayerCommand::StartGame);
    b.queue_command(PlayerCommand::StartGame);
    a.tick();
    b.tick();

    let terrain_a = serde_json::to_string(a.terrain()).unwrap();
    let terrain_b = serde_json::to_string(b.terrain()).unwrap();
    assert_ne!(terrain_a, terrain_b, "Different seeds should generate different terrain");
}

// ---- Phases ----

#[test]
fn test_lobby_until_started() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Lobby);
    assert!(snap.player.is_none());
    assert_eq!(snap.time.tick, 0, "Time does not advance in the lobby");
    assert!(engine.terrain().is_empty());

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.player.is_some());
    assert_eq!(snap.time.tick, 1);
    assert!(!engine.terrain().is_empty(), "Terrain is generated on start");
    assert_eq!(snap.terrain.formations_total as usize, engine.terrain().len());
}

#[test]
fn test_pause_resume() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick();
    assert_eq!(paused.phase, GamePhase::Paused);
    let frozen_tick = paused.time.tick;
    run_ticks(&mut engine, 10);
    assert_eq!(engine.time().tick, frozen_tick, "Paused engine does not advance");

    engine.queue_command(PlayerCommand::Resume);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, GamePhase::Active);
    assert_eq!(resumed.time.tick, frozen_tick + 1);
}

#[test]
fn test_time_scale() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 0.0 });
    let before = engine.time().tick;
    run_ticks(&mut engine, 5);
    assert_eq!(engine.time().tick, before, "Zero time scale freezes the sim");

    engine.queue_commands([
        PlayerCommand::SetTimeScale { scale: 10.0 },
        PlayerCommand::Pause,
        PlayerCommand::Resume,
    ]);
    assert_eq!(engine.tick().phase, GamePhase::Active, "Commands apply in order");
    assert_eq!(engine.time_scale(), MAX_TIME_SCALE, "Time scale is clamped");
    assert!((engine.time().last_dt - DT * MAX_TIME_SCALE).abs() < 1e-12);
}

fn distance_under_time_scale(scale: f64, ticks: usize) -> f64 {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::SetTimeScale { scale });
    engine.set_input(InputIntent {
        forward: true,
        ..Default::default()
    });
    run_ticks_snapshot(&mut engine, ticks).player.unwrap().position.z
}

#[test]
fn test_time_scale_slows_ships() {
    let full = distance_under_time_scale(1.0, 60);
    let quarter = distance_under_time_scale(0.25, 60);
    assert!(quarter > 0.0);
    assert!(quarter < full * 0.25, "Quarter speed covers {quarter}, full covers {full}");

    // Four times the ticks at quarter scale is the same sim time.
    let stretched = distance_under_time_scale(0.25, 240);
    assert!(
        (stretched - full).abs() < full * 0.05,
        "Stretched run covers {stretched}, full covers {full}"
    );
}

#[test]
fn test_reset_keeps_terrain() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::StartGame);
    engine.set_input(InputIntent {
        forward: true,
        ..Default::default()
    });
    run_ticks(&mut engine, 120);
    let terrain_before: Vec<DVec3> = engine
        .terrain()
        .formations()
        .iter()
        .map(|f| DVec3::new(f.position.x, 0.0, f.position.z))
        .collect();
    engine.session_mut().score = 500;

    engine.set_input(InputIntent::default());
    engine.queue_command(PlayerCommand::ResetGame);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.score, 0, "Score resets");
    assert_eq!(snap.time.tick, 1, "Clock restarts");
    assert_eq!(snap.ships.len(), 1, "Only the fresh player ship remains");
    let player = snap.player.expect("player respawned");
    assert!(player.position.length() < 1.0, "Player back at the origin");
    assert_eq!(player.health, PLAYER_PROFILE.health);

    let terrain_after: Vec<DVec3> = engine
        .terrain()
        .formations()
        .iter()
        .map(|f| DVec3::new(f.position.x, 0.0, f.position.z))
        .collect();
    assert_eq!(terrain_before, terrain_after, "Reset keeps the generated terrain");
}

// ---- Ship motion ----

fn any_rates() -> impl Strategy<Value = ApproachRates> {
    (0.001_f64..0.2, 0.001_f64..0.2, 0.001_f64..0.2).prop_map(|(accelerate, decelerate, brake)| {
        ApproachRates {
            accelerate,
            decelerate,
            brake,
        }
    })
}

proptest! {
    #[test]
    fn test_speed_approach_is_monotonic(
        start in -3.0_f64..3.0,
        target in -3.0_f64..3.0,
        rates in any_rates(),
        dt in 0.0_f64..0.1,
    ) {
        let scale = frame_scale(dt);
        let slowest = rates.accelerate.min(rates.decelerate).min(rates.brake) * scale;
        let bound = ((target - start).abs() / slowest).ceil() as usize + 2;

        let mut speed = start;
        let mut gap = (speed - target).abs();
        for _ in 0..bound {
            speed = approach(speed, target, rates, SPEED_SNAP_EPSILON, scale);
            let next_gap = (speed - target).abs();
            prop_assert!(next_gap <= gap, "gap grew from {gap} to {next_gap}");
            gap = next_gap;
        }
        prop_assert_eq!(speed, target, "target not reached within {} ticks", bound);
    }

    #[test]
    fn test_turn_commands_are_symmetric(multiplier in 0.0_f64..2.0, max_turn in 0.001_f64..0.05) {
        let mut world = hecs::World::new();
        let ship = world_setup::spawn_player(&mut world, DVec3::ZERO, 0.0);
        let mut motion = (*world.get::<&ShipMotion>(ship).unwrap()).clone();
        motion.max_turn_rate = max_turn;

        set_turn(&mut motion, Turn::Left, multiplier);
        let left = motion.target_turn_rate;
        set_turn(&mut motion, Turn::Right, multiplier);
        let right = motion.target_turn_rate;
        prop_assert_eq!(left, -right);
        prop_assert!((left - max_turn * multiplier).abs() < 1e-15);

        for (l, r) in [(true, true), (false, false)] {
            let input = InputIntent { left: l, right: r, ..Default::default() };
            set_turn(&mut motion, player_control::turn_from_input(&input), multiplier);
            prop_assert_eq!(motion.target_turn_rate, 0.0);
        }
    }
}

#[test]
fn test_approach_uses_braking_rate_when_reversing() {
    let rates = ApproachRates {
        accelerate: 0.05,
        decelerate: 0.03,
        brake: 0.08,
    };
    let next = approach(1.0, -1.0, rates, SPEED_SNAP_EPSILON, 1.0);
    assert!((next - 0.92).abs() < 1e-12, "Braking moves by the braking rate");
    let next = approach(1.0, 0.0, rates, SPEED_SNAP_EPSILON, 1.0);
    assert!((next - 0.97).abs() < 1e-12, "No input decelerates");
    let next = approach(0.0, 1.0, rates, SPEED_SNAP_EPSILON, 1.0);
    assert!((next - 0.05).abs() < 1e-12, "Throttle accelerates");
    let next = approach(0.5, 1.0, rates, SPEED_SNAP_EPSILON, 0.0);
    assert_eq!(next, 0.5, "No movement without time");
    let next = approach(0.995, 1.0, rates, SPEED_SNAP_EPSILON, 0.0);
    assert_eq!(next, 1.0, "Snaps once within the epsilon");
    let next = approach(0.96, 1.0, rates, SPEED_SNAP_EPSILON, 1.0);
    assert_eq!(next, 1.0, "Never overshoots");
}

#[test]
fn test_player_moves_forward_along_heading() {
    let mut engine = quiet_engine();
    engine.set_input(InputIntent {
        forward: true,
        ..Default::default()
    });
    let snap = run_ticks_snapshot(&mut engine, 120);
    let player = snap.player.unwrap();
    assert!(player.position.z > 10.0, "Yaw 0 moves along +z");
    assert!(player.position.x.abs() < 1e-9);
    assert!((player.speed - PLAYER_PROFILE.max_speed).abs() < 1e-12, "Reaches max speed");
}

fn run_ticks_snapshot(engine: &mut SimulationEngine, n: usize) -> GameStateSnapshot {
    let mut snap = engine.tick();
    for _ in 1..n {
        snap = engine.tick();
    }
    snap
}

#[test]
fn test_turbo_doubles_target_and_fires_once() {
    let mut engine = quiet_engine();
    engine.set_input(InputIntent {
        forward: true,
        turbo_active: true,
        ..Default::default()
    });
    let events = run_ticks(&mut engine, 30);
    assert_eq!(count(&events, |e| matches!(e, SimEvent::TurboEffect { .. })), 1);
    let target = engine
        .world()
        .get::<&ShipMotion>(player(&engine))
        .unwrap()
        .target_speed;
    assert_eq!(target, PLAYER_PROFILE.max_speed * TURBO_MULTIPLIER);

    engine.set_input(InputIntent::default());
    engine.tick();
    engine.set_input(InputIntent {
        turbo_active: true,
        ..Default::default()
    });
    let events = run_ticks(&mut engine, 5);
    assert_eq!(
        count(&events, |e| matches!(e, SimEvent::TurboEffect { .. })),
        1,
        "Re-engaging turbo fires again"
    );
}

#[test]
fn test_heading_turns_before_hull_moves() {
    let mut world = hecs::World::new();
    let ship = world_setup::spawn_player(&mut world, DVec3::ZERO, 0.0);
    let mut motion = (*world.get::<&ShipMotion>(ship).unwrap()).clone();
    motion.speed = 1.0;
    motion.target_speed = 1.0;
    motion.turn_rate = 0.02;
    motion.target_turn_rate = 0.02;
    let mut transform = Transform::default();

    assert!(integrate(&mut transform, &mut motion, 0.5));
    assert!((transform.yaw - 0.01).abs() < 1e-12);
    let expected = DVec3::new(0.01_f64.sin(), 0.0, 0.01_f64.cos()) * 0.5;
    assert!((transform.position - expected).length() < 1e-12);

    motion.speed = 0.0;
    motion.target_speed = 0.0;
    let before = transform.position;
    assert!(!integrate(&mut transform, &mut motion, 0.5), "Stopped ships only turn");
    assert_eq!(transform.position, before);
    assert!((transform.yaw - 0.02).abs() < 1e-12);
}

#[test]
fn test_ship_bounds_rotate_with_yaw() {
    let hull = Hull {
        class: ShipClass::Standard,
        health: 100.0,
        max_health: 100.0,
        half_extents: DVec3::new(5.0, 6.0, 13.0),
        color: 0,
    };
    let straight = ship_bounds(&Transform::default(), &hull);
    assert_eq!(straight.min, DVec3::new(-5.0, 0.0, -13.0));
    assert_eq!(straight.max, DVec3::new(5.0, 12.0, 13.0));

    let abeam = ship_bounds(
        &Transform {
            position: DVec3::ZERO,
            yaw: std::f64::consts::FRAC_PI_2,
        },
        &hull,
    );
    assert!((abeam.max.x - 13.0).abs() < 1e-9, "Length now spans x");
    assert!((abeam.max.z - 5.0).abs() < 1e-9);
}

// ---- Terrain contact ----

#[test]
fn test_settled_terrain_blocks_ship() {
    let mut engine = quiet_engine();
    let mut mountain = settled_mountain(80.0);
    mountain.settle();
    let wall = mountain.collision_box().unwrap().min.z;
    *engine.terrain_mut() = TerrainField::new(vec![mountain]);

    engine.set_input(InputIntent {
        forward: true,
        ..Default::default()
    });
    let mut feedback_ticks = Vec::new();
    for t in 0..300 {
        let snap = engine.tick();
        let bounds = snap.player.as_ref().unwrap().bounds;
        assert!(bounds.max.z < wall, "Hull never ends a tick inside the wall");
        if snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::CollisionFeedback { .. }))
        {
            feedback_ticks.push(t);
        }
    }

    assert!(!feedback_ticks.is_empty(), "Bumping the wall gives feedback");
    for pair in feedback_ticks.windows(2) {
        assert!(pair[1] - pair[0] >= 30, "Feedback at most once per 0.5 s");
    }
}

#[test]
fn test_stopped_ship_inside_terrain_gets_no_feedback() {
    let mut engine = quiet_engine();
    let mut mountain = settled_mountain(0.0);
    mountain.settle();
    *engine.terrain_mut() = TerrainField::new(vec![mountain]);

    let events = run_ticks(&mut engine, 120);
    assert_eq!(
        count(&events, |e| matches!(e, SimEvent::CollisionFeedback { .. })),
        0
    );
    let position = engine.world().get::<&Transform>(player(&engine)).unwrap().position;
    assert_eq!(position, DVec3::ZERO, "Nothing pushes a stopped ship");
}

#[test]
fn test_rising_terrain_is_passable() {
    let mut engine = quiet_engine();
    *engine.terrain_mut() = TerrainField::new(vec![settled_mountain(80.0)]);
    engine.set_input(InputIntent {
        forward: true,
        ..Default::default()
    });
    let snap = run_ticks_snapshot(&mut engine, 400);
    assert!(
        snap.player.unwrap().position.z > 150.0,
        "A formation still rising does not block ships"
    );
}

// ---- Projectiles ----

#[test]
fn test_projectile_expires_at_lifespan() {
    let mut engine = quiet_engine();
    let shot = world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Enemy,
        DVec3::new(1000.0, 4.0, 1000.0),
        DVec3::X,
        ENEMY_PROJECTILE_SPEED,
        ENEMY_PROJECTILE_DAMAGE,
    );

    run_ticks(&mut engine, 179);
    let age = engine.world().get::<&Projectile>(shot).unwrap().age;
    assert!(age < PROJECTILE_LIFESPAN_SECS);
    let x = engine.world().get::<&Transform>(shot).unwrap().position.x;
    assert!((x - (1000.0 + 179.0 * 2.5)).abs() < 1e-6, "Moves speed * dt * 30 per tick");

    engine.tick();
    assert!(!engine.world().contains(shot), "Gone once age reaches 3 s");
    run_ticks(&mut engine, 10);
    assert!(!engine.world().contains(shot));
}

#[test]
fn test_player_fire_respects_cooldown() {
    let mut engine = quiet_engine();
    engine.set_input(InputIntent {
        fire: true,
        ..Default::default()
    });
    let snap = run_ticks_snapshot(&mut engine, 60);
    assert!(
        (4..=5).contains(&snap.stats.shots_fired),
        "Base cooldown allows 4-5 shots per second, got {}",
        snap.stats.shots_fired
    );

    let ship = player(&engine);
    engine
        .world_mut()
        .get::<&mut TimedEffects>(ship)
        .unwrap()
        .rapid_fire = Some(RAPID_FIRE_DURATION_SECS);
    let before = snap.stats.shots_fired;
    let snap = run_ticks_snapshot(&mut engine, 60);
    let fired = snap.stats.shots_fired - before;
    assert!((9..=10).contains(&fired), "Rapid fire allows ~10 shots per second, got {fired}");
}

#[test]
fn test_muzzle_and_direction_follow_yaw() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    engine.world_mut().get::<&mut Transform>(ship).unwrap().yaw = std::f64::consts::FRAC_PI_2;

    let shot = world_setup::fire_from(engine.world_mut(), ship).unwrap();
    let transform = *engine.world().get::<&Transform>(shot).unwrap();
    let projectile = (*engine.world().get::<&Projectile>(shot).unwrap()).clone();
    assert!((transform.position - DVec3::new(13.0, 4.0, 0.0)).length() < 1e-9);
    assert!((projectile.direction - DVec3::X).length() < 1e-9);
    assert_eq!(projectile.owner, Faction::Player);
    assert_eq!(projectile.speed, PLAYER_PROJECTILE_SPEED);
    assert_eq!(projectile.damage, PLAYER_PROJECTILE_DAMAGE);
}

#[test]
fn test_damage_scaling_by_class() {
    for (class, expected) in [
        (ShipClass::Battleship, 15.0),
        (ShipClass::Destroyer, 30.0),
        (ShipClass::Carrier, 13.0),
        (ShipClass::Standard, 25.0),
    ] {
        let mut engine = quiet_engine();
        let enemy = spawn_enemy(&mut engine, class, DVec3::new(0.0, 0.0, 100.0));
        let start = health(&engine, enemy);
        world_setup::spawn_projectile(
            engine.world_mut(),
            Faction::Player,
            DVec3::new(0.0, 4.0, 100.0),
            DVec3::Z,
            PLAYER_PROJECTILE_SPEED,
            PLAYER_PROJECTILE_DAMAGE,
        );

        let snap = engine.tick();
        assert_eq!(
            start - health(&engine, enemy),
            expected,
            "{class:?} should take {expected}"
        );
        assert_eq!(snap.score, SCORE_ENEMY_HIT);
        assert!(snap.events.iter().any(|e| matches!(e, SimEvent::HitEffect { .. })));
        assert!(snap.projectiles.is_empty(), "Projectile consumed by the hit");
    }
}

#[test]
fn test_kill_awards_bonus() {
    let mut engine = quiet_engine();
    let enemy = spawn_enemy(&mut engine, ShipClass::Destroyer, DVec3::new(0.0, 0.0, 100.0));
    engine.world_mut().get::<&mut Hull>(enemy).unwrap().health = 20.0;
    world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Player,
        DVec3::new(0.0, 4.0, 100.0),
        DVec3::Z,
        PLAYER_PROJECTILE_SPEED,
        PLAYER_PROJECTILE_DAMAGE,
    );

    let snap = engine.tick();
    assert!(!engine.world().contains(enemy));
    assert_eq!(snap.score, SCORE_ENEMY_HIT + SCORE_KILL_BONUS);
    assert_eq!(snap.stats.enemies_destroyed, 1);
    assert_eq!(
        count(&snap.events, |e| matches!(
            e,
            SimEvent::ShipDestroyed {
                class: ShipClass::Destroyer,
                faction: Faction::Enemy,
                ..
            }
        )),
        1
    );
    assert_eq!(snap.phase, GamePhase::Active, "Enemy kills do not end the game");
}

#[test]
fn test_friendly_fire_is_ignored() {
    let mut engine = quiet_engine();
    let enemy = spawn_enemy(&mut engine, ShipClass::Standard, DVec3::new(0.0, 0.0, 300.0));
    let shot = world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Enemy,
        DVec3::new(0.0, 4.0, 300.0),
        DVec3::Z,
        ENEMY_PROJECTILE_SPEED,
        ENEMY_PROJECTILE_DAMAGE,
    );

    engine.tick();
    assert_eq!(health(&engine, enemy), 100.0);
    assert!(engine.world().contains(shot), "Passes through its own side");
}

#[test]
fn test_shield_absorbs_projectile() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    engine
        .world_mut()
        .get::<&mut TimedEffects>(ship)
        .unwrap()
        .shield = Some(SHIELD_DURATION_SECS);
    let shot = world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Enemy,
        DVec3::new(0.0, 4.0, 18.0),
        -DVec3::Z,
        ENEMY_PROJECTILE_SPEED,
        ENEMY_PROJECTILE_DAMAGE,
    );

    let events = run_ticks(&mut engine, 30);
    assert!(!engine.world().contains(shot), "Shield destroys the projectile");
    assert_eq!(health(&engine, ship), 100.0, "No damage through the shield");
    assert_eq!(count(&events, |e| matches!(e, SimEvent::ShieldImpact { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, SimEvent::DamageFeedback { .. })), 0);
}

#[test]
fn test_kill_flow_ends_game_once() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    engine.world_mut().get::<&mut Hull>(ship).unwrap().health = 20.0;
    engine.session_mut().score = 120;
    world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Enemy,
        DVec3::new(0.0, 4.0, -10.0),
        DVec3::Z,
        ENEMY_PROJECTILE_SPEED,
        25.0,
    );

    let snap = engine.tick();
    assert!(!engine.world().contains(ship), "Player ship destroyed");
    assert!(snap.player.is_none());
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(
        snap.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::GameOver { final_score } => Some(*final_score),
                _ => None,
            })
            .collect::<Vec<_>>(),
        vec![120]
    );

    let tick = engine.time().tick;
    let events = run_ticks(&mut engine, 60);
    assert_eq!(count(&events, |e| matches!(e, SimEvent::GameOver { .. })), 0);
    assert_eq!(engine.time().tick, tick, "Game over halts the simulation");
}

#[test]
fn test_projectile_hits_terrain() {
    let mut engine = quiet_engine();
    let mut mountain = settled_mountain(500.0);
    mountain.settle();
    *engine.terrain_mut() = TerrainField::new(vec![mountain]);
    let shot = world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Player,
        DVec3::new(0.0, 4.0, 450.0),
        DVec3::Z,
        PLAYER_PROJECTILE_SPEED,
        PLAYER_PROJECTILE_DAMAGE,
    );

    let events = run_ticks(&mut engine, 5);
    assert!(!engine.world().contains(shot));
    assert_eq!(count(&events, |e| matches!(e, SimEvent::HitEffect { .. })), 1);
}

// ---- Sea objects ----

#[test]
fn test_shooting_bomb_and_skittle() {
    let mut engine = quiet_engine();
    let bomb = spawn_object(&mut engine, SeaObjectKind::Bomb, DVec3::new(0.0, 0.0, 60.0));
    let skittle = spawn_object(&mut engine, SeaObjectKind::Skittle, DVec3::new(60.0, 0.0, 0.0));
    world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Player,
        DVec3::new(0.0, 4.0, 55.0),
        DVec3::Z,
        PLAYER_PROJECTILE_SPEED,
        PLAYER_PROJECTILE_DAMAGE,
    );
    world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Player,
        DVec3::new(57.0, 2.0, 0.0),
        DVec3::X,
        PLAYER_PROJECTILE_SPEED,
        PLAYER_PROJECTILE_DAMAGE,
    );

    let snap = engine.tick();
    assert!(!engine.world().contains(bomb));
    assert!(!engine.world().contains(skittle));
    assert_eq!(snap.score, SCORE_BOMB_SHOT + SCORE_SKITTLE_SHOT);
    assert_eq!(snap.stats.bombs_destroyed, 1);
    assert_eq!(snap.stats.skittles_hit, 1);
    assert_eq!(count(&snap.events, |e| matches!(e, SimEvent::Explosion { .. })), 1);
    assert_eq!(
        count(&snap.events, |e| matches!(e, SimEvent::SkittleDestroyed { .. })),
        1
    );
}

#[test]
fn test_powerups_cannot_be_shot() {
    let mut engine = quiet_engine();
    let powerup = spawn_object(
        &mut engine,
        SeaObjectKind::Powerup(PowerupKind::Shield),
        DVec3::new(0.0, 0.0, 60.0),
    );
    world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Player,
        DVec3::new(0.0, 2.0, 58.0),
        DVec3::Z,
        PLAYER_PROJECTILE_SPEED,
        PLAYER_PROJECTILE_DAMAGE,
    );
    let snap = engine.tick();
    assert!(engine.world().contains(powerup));
    assert_eq!(snap.score, 0);
}

#[test]
fn test_bomb_contact_damages_ship() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    let bomb = spawn_object(&mut engine, SeaObjectKind::Bomb, DVec3::new(0.0, 0.0, 10.0));

    let snap = engine.tick();
    assert!(!engine.world().contains(bomb));
    assert_eq!(health(&engine, ship), 100.0 - BOMB_CONTACT_DAMAGE);
    assert_eq!(count(&snap.events, |e| matches!(e, SimEvent::Explosion { .. })), 1);
    assert_eq!(count(&snap.events, |e| matches!(e, SimEvent::DamageFeedback { .. })), 1);
}

#[test]
fn test_skittle_slow_does_not_stack() {
    let mut engine = quiet_engine();
    let original = max_speed(&engine);

    let first = spawn_object(&mut engine, SeaObjectKind::Skittle, DVec3::ZERO);
    engine.tick();
    assert!(engine.world().contains(first), "Skittles survive contact");
    let knocked = engine.world().get::<&Transform>(first).unwrap().position;
    assert!(knocked.z >= SKITTLE_KNOCKBACK, "Knocked away along the bow");
    assert_eq!(knocked.x, 0.0);
    let _ = engine.world_mut().despawn(first);
    assert_eq!(max_speed(&engine), original * SLOW_FACTOR);

    run_ticks(&mut engine, 60);
    let second = spawn_object(&mut engine, SeaObjectKind::Skittle, DVec3::ZERO);
    let snap = engine.tick();
    let _ = engine.world_mut().despawn(second);
    assert_eq!(max_speed(&engine), original * SLOW_FACTOR, "Not slowed twice");
    assert_eq!(snap.stats.skittles_hit, 2);
    assert_eq!(snap.score, 2 * SCORE_SKITTLE_CONTACT);

    // Ends exactly 3 s after the second contact.
    run_ticks(&mut engine, 179);
    assert!(effects_of(&engine).slow.is_some());
    let events = run_ticks(&mut engine, 1);
    assert!(effects_of(&engine).slow.is_none());
    assert_eq!(max_speed(&engine), original);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SimEvent::EffectEnded {
                kind: EffectKind::Slow,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_skittle_touch_scores_once() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    let skittle = spawn_object(&mut engine, SeaObjectKind::Skittle, DVec3::ZERO);

    let events = run_ticks(&mut engine, 6);
    assert!(engine.world().contains(skittle));
    let skittle_box = engine.world().get::<&Bounds>(skittle).unwrap().0;
    let hull_box = engine.world().get::<&Bounds>(ship).unwrap().0;
    assert!(!skittle_box.intersects(&hull_box), "Knocked clear of the hull");

    assert_eq!(engine.score(), SCORE_SKITTLE_CONTACT);
    assert_eq!(engine.tick().stats.skittles_hit, 1);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SimEvent::EffectStarted {
                kind: EffectKind::Slow,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_speed_powerup_refreshes() {
    let mut engine = quiet_engine();
    let original = max_speed(&engine);

    spawn_object(
        &mut engine,
        SeaObjectKind::Powerup(PowerupKind::Speed),
        DVec3::ZERO,
    );
    engine.tick();
    assert_eq!(max_speed(&engine), original * SPEED_BOOST_FACTOR);

    run_ticks(&mut engine, 300);
    let left = effects_of(&engine).speed_boost.unwrap();
    assert!((left - 5.0).abs() < 1e-6);

    spawn_object(
        &mut engine,
        SeaObjectKind::Powerup(PowerupKind::Speed),
        DVec3::ZERO,
    );
    let snap = engine.tick();
    assert_eq!(
        max_speed(&engine),
        original * SPEED_BOOST_FACTOR,
        "Doubled, not quadrupled"
    );
    assert_eq!(effects_of(&engine).speed_boost, Some(SPEED_BOOST_DURATION_SECS));
    assert_eq!(snap.stats.powerups_collected, 2);
    assert_eq!(snap.score, 2 * SCORE_POWERUP);

    run_ticks(&mut engine, 599);
    assert!(effects_of(&engine).speed_boost.is_some());
    run_ticks(&mut engine, 1);
    assert!(effects_of(&engine).speed_boost.is_none());
    assert_eq!(max_speed(&engine), original);
}

#[test]
fn test_health_pickup_caps() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    engine.world_mut().get::<&mut Hull>(ship).unwrap().health = 90.0;
    spawn_object(
        &mut engine,
        SeaObjectKind::Powerup(PowerupKind::Health),
        DVec3::ZERO,
    );
    let snap = engine.tick();
    assert_eq!(health(&engine, ship), 100.0);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::HealthChanged { health, .. } if *health == 100.0)));
}

#[test]
fn test_enemies_ignore_pickups() {
    let mut engine = quiet_engine();
    spawn_enemy(&mut engine, ShipClass::Standard, DVec3::new(400.0, 0.0, 0.0));
    let powerup = spawn_object(
        &mut engine,
        SeaObjectKind::Powerup(PowerupKind::Speed),
        DVec3::new(400.0, 0.0, 0.0),
    );
    let skittle = spawn_object(&mut engine, SeaObjectKind::Skittle, DVec3::new(400.0, 0.0, 5.0));
    let snap = engine.tick();
    assert!(engine.world().contains(powerup));
    assert!(engine.world().contains(skittle));
    assert_eq!(snap.score, 0);
    assert_eq!(snap.stats.skittles_hit, 0);
    assert!(effects_of(&engine).slow.is_none());

    let pushed = engine.world().get::<&Transform>(skittle).unwrap().position;
    assert!(pushed.z >= 5.0 + SKITTLE_KNOCKBACK, "Enemy hulls still knock skittles away");
}

#[test]
fn test_sea_object_expires_and_bomb_pulses() {
    let mut engine = quiet_engine();
    let bomb = spawn_object(&mut engine, SeaObjectKind::Bomb, DVec3::new(200.0, 0.0, 0.0));
    engine.world_mut().get::<&mut SeaObject>(bomb).unwrap().age = BOMB_LIFESPAN_SECS - 5.0;
    engine.tick();
    let glow = engine.world().get::<&SeaObject>(bomb).unwrap().glow;
    assert!((0.0..=1.0).contains(&glow));

    run_ticks(&mut engine, 5 * 60);
    assert!(!engine.world().contains(bomb), "Bomb expires after 60 s");
}

// ---- Director ----

#[test]
fn test_enemy_spawn_schedule() {
    let mut engine = quiet_engine();
    {
        let director = engine.director_mut();
        director.enemy_interval = ENEMY_SPAWN_INTERVAL_SECS;
        director.enemy_timer = 0.0;
    }
    run_ticks(&mut engine, 599);
    assert_eq!(engine.world().query::<&EnemyShip>().iter().count(), 0);
    run_ticks(&mut engine, 2);

    let snap = engine.tick();
    let enemies: Vec<_> = snap
        .ships
        .iter()
        .filter(|s| s.faction == Faction::Enemy)
        .collect();
    assert_eq!(enemies.len(), 1);
    let distance = enemies[0].position.length();
    assert!(
        (ENEMY_SPAWN_MIN_DISTANCE - 5.0..=ENEMY_SPAWN_MAX_DISTANCE + 5.0).contains(&distance),
        "Spawned {distance} units out"
    );
    assert!((engine.director_mut().enemy_interval - 9.5).abs() < 1e-12);
}

#[test]
fn test_enemy_interval_floor() {
    let mut engine = quiet_engine();
    let director = engine.director_mut();
    director.enemy_interval = 3.1;
    assert_eq!(director.next_enemy_interval(), ENEMY_SPAWN_INTERVAL_MIN_SECS);
}

#[test]
fn test_sea_object_cap() {
    let mut engine = quiet_engine();
    {
        let director = engine.director_mut();
        director.sea_object_interval = DT;
        director.max_sea_objects = 3;
    }
    let snap = run_ticks_snapshot(&mut engine, 30);
    assert_eq!(snap.sea_objects.len(), 3);
    for object in &snap.sea_objects {
        let d = DVec3::new(object.position.x, 0.0, object.position.z).length();
        assert!((SEA_OBJECT_SPAWN_MIN_DISTANCE..SEA_OBJECT_SPAWN_MAX_DISTANCE).contains(&d));
    }
}

#[test]
fn test_random_draw_tables() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut bombs = 0;
    let mut powerups = 0;
    for _ in 0..10_000 {
        match world_setup::random_sea_object_kind(&mut rng) {
            SeaObjectKind::Bomb => bombs += 1,
            SeaObjectKind::Powerup(_) => powerups += 1,
            SeaObjectKind::Skittle => {}
        }
    }
    assert!((3700..4300).contains(&bombs), "~40% bombs, got {bombs}");
    assert!((1700..2300).contains(&powerups), "~20% powerups, got {powerups}");

    let carriers = (0..10_000)
        .filter(|_| world_setup::random_ship_class(&mut rng) == ShipClass::Carrier)
        .count();
    assert!((350..650).contains(&carriers), "Carriers are rare, got {carriers}");
}

// ---- Enemy AI ----

#[test]
fn test_enemy_closes_on_player() {
    let mut engine = quiet_engine();
    let enemy = spawn_enemy(&mut engine, ShipClass::Standard, DVec3::new(0.0, 0.0, 150.0));
    engine.world_mut().get::<&mut Transform>(enemy).unwrap().yaw = std::f64::consts::PI;

    let start = 150.0;
    run_ticks(&mut engine, 120);
    let position = engine.world().get::<&Transform>(enemy).unwrap().position;
    assert!(position.length() < start, "Pursuing enemy moved closer");
}

// ---- Error isolation ----

#[test]
fn test_stale_handles_are_skipped() {
    let mut engine = quiet_engine();
    let enemy = spawn_enemy(&mut engine, ShipClass::Standard, DVec3::new(0.0, 0.0, 300.0));
    let mut session = Session::default();
    effects::apply(engine.world_mut(), enemy, EffectKind::Slow, &mut session).unwrap();
    combat::apply_damage(engine.world_mut(), enemy, 1000.0, &mut session).unwrap();
    assert!(!engine.world().contains(enemy));

    session.events.clear();
    effects::run(engine.world_mut(), &[enemy], 5.0, &mut session);
    assert!(session.events.is_empty(), "Destroyed ship's effects never fire");

    let err = effects::tick_ship(engine.world_mut(), enemy, DT, &mut session).unwrap_err();
    assert!(matches!(err, SimError::Query(_)));
}

#[test]
fn test_bad_entity_does_not_halt_tick() {
    let mut engine = quiet_engine();
    // A projectile missing its transform cannot be advanced.
    let broken = engine.world_mut().spawn((Projectile {
        owner: Faction::Enemy,
        direction: DVec3::Z,
        speed: 1.0,
        damage: 1.0,
        age: 0.0,
        lifespan: PROJECTILE_LIFESPAN_SECS,
    },));
    let good = world_setup::spawn_projectile(
        engine.world_mut(),
        Faction::Enemy,
        DVec3::new(500.0, 4.0, 500.0),
        DVec3::X,
        1.0,
        1.0,
    );

    let roster = TickRoster::take(engine.world());
    let terrain = TerrainField::default();
    let mut session = Session::default();
    let err = projectiles::update_projectile(
        engine.world_mut(),
        broken,
        &roster,
        &terrain,
        DT,
        &mut session,
    )
    .unwrap_err();
    assert!(matches!(err, SimError::Query(_)));

    engine.tick();
    let x = engine.world().get::<&Transform>(good).unwrap().position.x;
    assert!(x > 500.0, "Healthy projectile still advanced");
}

#[test]
fn test_set_throttle_tracks_max_speed() {
    let mut engine = quiet_engine();
    let ship = player(&engine);
    let mut motion = (*engine.world().get::<&ShipMotion>(ship).unwrap()).clone();
    set_throttle(&mut motion, Throttle::Backward, 0.5);
    assert_eq!(motion.target_speed, -motion.max_speed * 0.5);
    set_throttle(&mut motion, Throttle::None, 1.0);
    assert_eq!(motion.target_speed, 0.0);
}

// ---- Configuration ----

#[test]
fn test_config_partial_json() {
    let config = SimConfig::from_json_str(r#"{ "seed": 99, "terrain": { "mountain_count": 4 } }"#)
        .unwrap();
    assert_eq!(config.seed, 99);
    assert_eq!(config.terrain.mountain_count, 4);
    assert_eq!(config.terrain.sector_count, TERRAIN_SECTOR_COUNT);
    assert_eq!(config.max_sea_objects, MAX_SEA_OBJECTS);
}

#[test]
fn test_config_validation() {
    let err = SimConfig::from_json_str(r#"{ "time_scale": 9.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "time_scale", .. }));

    let err = SimConfig::from_json_str(r#"{ "enemy_spawn_interval_secs": 1.0 }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "enemy_spawn_interval_secs",
            ..
        }
    ));

    let err = SimConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = SimConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));

    assert!(SimConfig::default().validate().is_ok());
}
