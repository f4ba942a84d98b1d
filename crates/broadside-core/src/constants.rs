//! Simulation constants and tuning parameters.
//!
//! Motion constants are expressed per calibrated frame: each tick multiplies
//! them by `max(dt, MIN_FRAME_SECS) * FRAME_CALIBRATION`.

/// Nominal tick rate of the headless loop (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per nominal tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Floor on the effective frame time (never faster than a 60 Hz step).
pub const MIN_FRAME_SECS: f64 = 1.0 / 60.0;

/// Converts per-frame motion constants into per-second rates.
pub const FRAME_CALIBRATION: f64 = 30.0;

/// Upper bound for the simulation time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;

/// Countdowns and ages within this distance of their limit count as expired.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Ship motion ---

/// Natural deceleration when no throttle is applied.
pub const SHIP_DECELERATION_RATE: f64 = 0.03;

/// Deceleration when throttling against the current direction of travel.
pub const SHIP_BRAKING_RATE: f64 = 0.08;

pub const SHIP_TURN_ACCELERATION_RATE: f64 = 0.001;

pub const SHIP_TURN_DECELERATION_RATE: f64 = 0.002;

/// Speed snaps to its target within this distance.
pub const SPEED_SNAP_EPSILON: f64 = 0.01;

/// Turn rate snaps to its target within this distance.
pub const TURN_SNAP_EPSILON: f64 = 0.0001;

/// Speed multiplier while the player holds turbo.
pub const TURBO_MULTIPLIER: f64 = 2.0;

/// Speed retained after bumping into terrain.
pub const TERRAIN_BUMP_SPEED_FACTOR: f64 = 0.5;

/// Minimum time between terrain collision feedback events for the player (seconds).
pub const COLLISION_FEEDBACK_COOLDOWN: f64 = 0.5;

/// Hull half extents before profile scaling (x = beam, y = height, z = length).
pub const HULL_HALF_EXTENTS: [f64; 3] = [5.0, 6.0, 13.0];

// --- Health ---

pub const MAX_HEALTH: f64 = 100.0;

// --- Projectiles ---

pub const PROJECTILE_LIFESPAN_SECS: f64 = 3.0;

pub const PLAYER_PROJECTILE_SPEED: f64 = 8.0;

pub const ENEMY_PROJECTILE_SPEED: f64 = 5.0;

pub const PLAYER_PROJECTILE_DAMAGE: f64 = 25.0;

pub const ENEMY_PROJECTILE_DAMAGE: f64 = 15.0;

/// Muzzle position relative to the ship origin, before yaw rotation.
pub const MUZZLE_OFFSET: [f64; 3] = [0.0, 4.0, 13.0];

/// A shielded ship absorbs projectiles within this distance of its position.
pub const SHIELD_RADIUS: f64 = 20.0;

/// Default player fire cooldown (seconds).
pub const BASE_FIRE_COOLDOWN: f64 = 0.25;

/// Fire cooldown while rapid fire is active (seconds).
pub const RAPID_FIRE_COOLDOWN: f64 = 0.1;

/// Minimum interval between shots from one enemy ship (seconds).
pub const ENEMY_MIN_FIRE_INTERVAL: f64 = 0.5;

// --- Sea objects ---

pub const BOMB_LIFESPAN_SECS: f64 = 60.0;

pub const SKITTLE_LIFESPAN_SECS: f64 = 120.0;

pub const POWERUP_LIFESPAN_SECS: f64 = 30.0;

/// Bombs pulse their glow during this final stretch of life (seconds).
pub const BOMB_PULSE_WINDOW_SECS: f64 = 10.0;

pub const BOMB_CONTACT_DAMAGE: f64 = 30.0;

/// Distance a skittle is pushed away from the ship that touched it.
pub const SKITTLE_KNOCKBACK: f64 = 10.0;
/// Gap left between a knocked skittle and the hull that pushed it (units).
pub const SKITTLE_CLEARANCE: f64 = 0.5;

pub const SLOW_FACTOR: f64 = 0.5;

pub const SLOW_DURATION_SECS: f64 = 3.0;

pub const SPEED_BOOST_FACTOR: f64 = 2.0;

pub const SPEED_BOOST_DURATION_SECS: f64 = 10.0;

pub const SHIELD_DURATION_SECS: f64 = 15.0;

pub const RAPID_FIRE_DURATION_SECS: f64 = 8.0;

pub const HEALTH_PICKUP_AMOUNT: f64 = 30.0;

/// Sea objects bob around the water line at this height.
pub const SEA_OBJECT_BASE_Y: f64 = 0.0;

pub const BOMB_HALF_EXTENT: f64 = 7.0;

pub const SKITTLE_HALF_EXTENTS: [f64; 3] = [3.0, 5.0, 3.0];

pub const POWERUP_HALF_EXTENT: f64 = 4.0;

// --- Scoring ---

pub const SCORE_ENEMY_HIT: u32 = 10;

pub const SCORE_KILL_BONUS: u32 = 50;

pub const SCORE_BOMB_SHOT: u32 = 25;

pub const SCORE_SKITTLE_SHOT: u32 = 10;

pub const SCORE_SKITTLE_CONTACT: u32 = 5;

pub const SCORE_POWERUP: u32 = 20;

// --- Enemy AI ---

/// Enemies within this range of the player pursue and shoot.
pub const AI_ENGAGE_RANGE: f64 = 200.0;

/// Pursuit throttle reaches full at this range.
pub const AI_FULL_THROTTLE_RANGE: f64 = 100.0;

/// Heading error below which an enemy may fire (radians, about 17 degrees).
pub const AI_FIRE_CONE: f64 = 0.3;

/// Peak per-frame firing probability at point-blank range.
pub const AI_FIRE_CHANCE: f64 = 0.01;

/// Per-frame probability of picking a new wander heading.
pub const AI_WANDER_CHANCE: f64 = 0.01;

pub const AI_PURSUIT_TURN_MULTIPLIER: f64 = 0.8;

pub const AI_WANDER_TURN_MULTIPLIER: f64 = 0.5;

/// Frame length the AI probabilities are calibrated against (seconds).
pub const AI_REFERENCE_FRAME_SECS: f64 = 1.0 / 60.0;

// --- Director ---

pub const ENEMY_SPAWN_INTERVAL_SECS: f64 = 10.0;

pub const ENEMY_SPAWN_INTERVAL_MIN_SECS: f64 = 3.0;

pub const ENEMY_SPAWN_INTERVAL_DECAY: f64 = 0.95;

pub const ENEMY_SPAWN_MIN_DISTANCE: f64 = 300.0;

pub const ENEMY_SPAWN_MAX_DISTANCE: f64 = 500.0;

pub const SEA_OBJECT_SPAWN_INTERVAL_SECS: f64 = 6.0;

pub const SEA_OBJECT_SPAWN_MIN_DISTANCE: f64 = 100.0;

pub const SEA_OBJECT_SPAWN_MAX_DISTANCE: f64 = 300.0;

pub const MAX_SEA_OBJECTS: usize = 40;

/// Probability that a spawned sea object is a bomb.
pub const SEA_OBJECT_BOMB_CHANCE: f64 = 0.4;

/// Probability that a spawned sea object is a skittle.
pub const SEA_OBJECT_SKITTLE_CHANCE: f64 = 0.4;

/// Relative jitter applied to enemy speed and turn rate when randomization is on.
pub const ENEMY_STAT_JITTER: f64 = 0.1;

// --- Terrain ---

pub const TERRAIN_MAP_RADIUS: f64 = 2000.0;

pub const TERRAIN_SECTOR_COUNT: u32 = 12;

pub const TERRAIN_MOUNTAIN_COUNT: u32 = 20;

pub const TERRAIN_STANDALONE_CLUSTERS: u32 = 6;

/// Horizontal fraction of the visual bounds kept by a collision box.
pub const TERRAIN_COLLISION_SHRINK: f64 = 0.45;

/// Vertical fraction (from the bottom) of the visual bounds kept by a collision box.
pub const TERRAIN_COLLISION_HEIGHT_FRACTION: f64 = 0.6;

/// Frame length the rise speeds are calibrated against (seconds).
pub const TERRAIN_RISE_FRAME_SECS: f64 = 1.0 / 60.0;

// --- Stats ---

/// Smoothing factor for the exponential FPS average.
pub const FPS_SMOOTHING: f64 = 0.1;
