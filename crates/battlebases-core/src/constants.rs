//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Fastest allowed time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;

// --- Lane ---

/// Length of the single lane the two teams fight over (world units).
/// Red holds x = 0, Blue holds x = LANE_LENGTH.
pub const LANE_LENGTH: f64 = 60.0;

/// Distance from a main base to its defense gun, measured toward the team's own edge.
pub const DEFENSE_GUN_OFFSET: f64 = 1.0;

/// Distance from a main base to each outpost, measured toward the enemy.
pub const OUTPOST_OFFSETS: [f64; 2] = [12.0, 24.0];

/// Distance in front of an outpost where its units appear.
pub const OUTPOST_SPAWN_OFFSET: f64 = 1.5;

/// Half-width of the area around a spawn point that must be free of units.
pub const SPAWN_CLEAR_RADIUS: f64 = 0.5;

// --- Combat timing ---

/// Extra delay, as a fraction of its own attack period, before the side that
/// lost initiative may strike for the first time.
pub const INITIATIVE_LOSER_DELAY_FACTOR: f64 = 0.5;

/// Tolerance when comparing accumulated float time against an attack period.
/// Thirty additions of 1/30 do not sum to exactly 1.0.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Economy ---

/// Funds released per funding turn when configuration supplies a non-positive rate.
pub const DEFAULT_FUNDS_PER_TURN: u32 = 5;

/// Length of a funding turn when configuration supplies a non-positive duration.
pub const DEFAULT_SECS_PER_TURN: f64 = 1.0;

/// Funds each team starts a match with.
pub const DEFAULT_STARTING_FUNDS: u32 = 20;

// --- Default archetypes ---

pub const SOLDIER_HEALTH: u32 = 100;
pub const SOLDIER_ATTACK: u32 = 10;
pub const SOLDIER_PERIOD: f64 = 1.0;
pub const SOLDIER_WALK_SPEED: f64 = 0.5;
pub const SOLDIER_TURN_TIME: f64 = 0.5;
pub const SOLDIER_COST: u32 = 10;

pub const BRUTE_HEALTH: u32 = 250;
pub const BRUTE_ATTACK: u32 = 25;
pub const BRUTE_PERIOD: f64 = 2.0;
pub const BRUTE_WALK_SPEED: f64 = 0.4;
pub const BRUTE_TURN_TIME: f64 = 0.5;
pub const BRUTE_COST: u32 = 25;

/// Melee reach of mobile units.
pub const MELEE_REACH: f64 = 1.0;

pub const DEFENSE_GUN_HEALTH: u32 = 10;
pub const DEFENSE_GUN_ATTACK: u32 = 5;
pub const DEFENSE_GUN_PERIOD: f64 = 0.25;
pub const DEFENSE_GUN_REACH: f64 = 6.0;

pub const OUTPOST_HEALTH: u32 = 300;
pub const MAIN_BASE_HEALTH: u32 = 500;

/// Contact reach of structures that never attack (bases, outposts).
pub const STRUCTURE_REACH: f64 = 1.0;

// --- Snapshot ---

/// Maximum combat events carried by a single snapshot.
pub const MAX_SNAPSHOT_EVENTS: usize = 256;
