//! Tuning tables and level layouts for the two prototype variants.
//!
//! Built-in tables cover both variants; a RON file can override any section
//! (missing sections fall back to the platformer defaults).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{Archetype, Stage};
use crate::geometry::{Rect, Vec2};

// ── Variant ───────────────────────────────────────────────────────────────────

/// Which prototype parameterisation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Side-on platformer: gravity, jumping, scattered ledges.
    Platformer,
    /// Closed arena; the player starts in flight.
    Arena,
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Error type for tuning loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid tuning: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Tuning sections ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration, px/s².
    pub gravity: f32,
    /// Horizontal velocity multiplier per frame while airborne.
    pub air_friction: f32,
    /// Horizontal velocity multiplier per frame while grounded.
    pub ground_friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        PhysicsTuning {
            gravity: 2200.0,
            air_friction: 0.95,
            ground_friction: 0.85,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: (f32, f32),
    pub max_health: f32,
    pub max_energy: f32,
    /// Energy per second while no continuous ability is active.
    pub energy_regen: f32,
    /// Horizontal acceleration in grounded mode.
    pub speed: f32,
    pub jump_speed: f32,
    pub fly_accel: f32,
    pub max_fly_speed: f32,
    /// Velocity multiplier per frame while flying.
    pub fly_damping: f32,
    pub dash_speed: f32,
    pub dash_cooldown: f32,
    pub dash_invuln: f32,
    pub starts_flying: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        PlayerTuning {
            size: (54.0, 90.0),
            max_health: 1000.0,
            max_energy: 300.0,
            energy_regen: 40.0,
            speed: 520.0,
            jump_speed: 980.0,
            fly_accel: 1600.0,
            max_fly_speed: 800.0,
            fly_damping: 0.99,
            dash_speed: 1100.0,
            dash_cooldown: 0.6,
            dash_invuln: 0.15,
            starts_flying: false,
        }
    }
}

/// Player melee combo.  Reach, damage, knockback and stun grow linearly with
/// the combo counter (1..=`combo_cap`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeTuning {
    pub cooldown: f32,
    pub combo_cap: u32,
    pub combo_window: f32,
    pub reach: f32,
    pub reach_per_combo: f32,
    pub damage: f32,
    pub damage_per_combo: f32,
    pub knockback: f32,
    pub knockback_per_combo: f32,
    /// Vertical knockback (negative = up).
    pub lift: f32,
    pub stun: f32,
    pub stun_per_combo: f32,
    /// Distance of the strike origin beyond the body's leading edge.
    pub offset: f32,
}

impl Default for MeleeTuning {
    fn default() -> Self {
        MeleeTuning {
            cooldown: 0.25,
            combo_cap: 3,
            combo_window: 0.8,
            reach: 64.0,
            reach_per_combo: 6.0,
            damage: 120.0,
            damage_per_combo: 30.0,
            knockback: 380.0,
            knockback_per_combo: 60.0,
            lift: -180.0,
            stun: 0.2,
            stun_per_combo: 0.05,
            offset: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayTuning {
    pub dps: f32,
    /// Energy per second while held.
    pub drain: f32,
    /// Seconds a beam stays alive after its last refresh.
    pub duration: f32,
    pub length: f32,
    /// Vertical component of the beam direction before normalisation.
    pub tilt: f32,
    /// Beam origin relative to the body centre (negative = above).
    pub eye_offset: f32,
    /// Per-frame knockback: (along facing, vertical).
    pub knockback: (f32, f32),
    /// Ray lock-out after energy is drained to zero.
    pub lockout: f32,
}

impl Default for RayTuning {
    fn default() -> Self {
        RayTuning {
            dps: 250.0,
            drain: 120.0,
            duration: 0.06,
            length: 900.0,
            tilt: -0.08,
            eye_offset: -18.0,
            knockback: (40.0, -20.0),
            lockout: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeTuning {
    pub drain: f32,
    pub half_angle_deg: f32,
    pub radius: f32,
    /// Damage per second at zero distance, scaled by falloff.
    pub dps: f32,
    /// Per-frame push: `push * falloff + push_base` along facing.
    pub push: f32,
    pub push_base: f32,
    /// Per-frame upward push scaled by falloff.
    pub lift: f32,
    pub stun: f32,
    pub offset: f32,
}

impl Default for ConeTuning {
    fn default() -> Self {
        ConeTuning {
            drain: 90.0,
            half_angle_deg: 28.0,
            radius: 360.0,
            dps: 480.0,
            push: 600.0,
            push_base: 120.0,
            lift: 120.0,
            stun: 0.2,
            offset: 8.0,
        }
    }
}

/// One row of the enemy stat table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub size: (f32, f32),
    pub health: f32,
    /// Damage per melee swing or per projectile.
    pub damage: f32,
    /// Chase acceleration (px/s²) for ground types, cruise speed for flyers.
    pub speed: f32,
    /// Horizontal velocity multiplier per frame while chasing.
    pub chase_damping: f32,
    /// Horizontal velocity multiplier per frame while idle or attacking.
    pub brake: f32,
    /// Beyond this centre distance the enemy idles.
    pub aggro_range: f32,
    /// At or within this centre distance the enemy attacks.
    pub attack_range: f32,
    /// Melee reach from the strike origin.
    pub reach: f32,
    pub knockback: f32,
    pub lift: f32,
    pub attack_cooldown: f32,
    pub score: u32,
    /// Flyers ignore gravity and steer in both axes.
    pub flies: bool,
    /// Preferred horizontal distance band to the player (flyers).
    pub standoff: (f32, f32),
    /// Preferred height above the player's centre (flyers).
    pub hover_height: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_size: f32,
    /// Spawn height above the anchor.
    pub spawn_lift: f32,
}

impl ArchetypeStats {
    pub fn light_melee() -> Self {
        ArchetypeStats {
            size: (48.0, 80.0),
            health: 250.0,
            damage: 70.0,
            speed: 460.0,
            chase_damping: 0.86,
            brake: 0.8,
            aggro_range: 1400.0,
            attack_range: 80.0,
            reach: 64.0,
            knockback: 200.0,
            lift: -140.0,
            attack_cooldown: 0.7,
            score: 25,
            flies: false,
            standoff: (0.0, 0.0),
            hover_height: 0.0,
            projectile_speed: 0.0,
            projectile_lifetime: 0.0,
            projectile_size: 0.0,
            spawn_lift: 0.0,
        }
    }

    pub fn ranged() -> Self {
        ArchetypeStats {
            size: (48.0, 32.0),
            health: 160.0,
            damage: 50.0,
            speed: 320.0,
            chase_damping: 0.92,
            brake: 0.92,
            aggro_range: 1400.0,
            attack_range: 720.0,
            reach: 0.0,
            knockback: 120.0,
            lift: -40.0,
            attack_cooldown: 1.2,
            score: 40,
            flies: true,
            standoff: (120.0, 260.0),
            hover_height: 160.0,
            projectile_speed: 520.0,
            projectile_lifetime: 2.5,
            projectile_size: 10.0,
            spawn_lift: 200.0,
        }
    }

    pub fn heavy_melee() -> Self {
        ArchetypeStats {
            size: (64.0, 96.0),
            health: 450.0,
            damage: 110.0,
            speed: 300.0,
            chase_damping: 0.86,
            brake: 0.8,
            aggro_range: 1400.0,
            attack_range: 96.0,
            reach: 84.0,
            knockback: 320.0,
            lift: -140.0,
            attack_cooldown: 1.1,
            score: 80,
            flies: false,
            standoff: (0.0, 0.0),
            hover_height: 0.0,
            projectile_speed: 0.0,
            projectile_lifetime: 0.0,
            projectile_size: 0.0,
            spawn_lift: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub light_melee: ArchetypeStats,
    pub ranged: ArchetypeStats,
    pub heavy_melee: ArchetypeStats,
}

impl EnemyTable {
    pub fn get(&self, archetype: Archetype) -> &ArchetypeStats {
        match archetype {
            Archetype::LightMelee => &self.light_melee,
            Archetype::Ranged => &self.ranged,
            Archetype::HeavyMelee => &self.heavy_melee,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        EnemyTable {
            light_melee: ArchetypeStats::light_melee(),
            ranged: ArchetypeStats::ranged(),
            heavy_melee: ArchetypeStats::heavy_melee(),
        }
    }
}

/// One wave: `(archetype, count)` pairs spawned together.
pub type Wave = Vec<(Archetype, u32)>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Countdown before the first wave.
    pub first_delay: f32,
    /// Countdown between waves.
    pub interval: f32,
    /// Horizontal jitter applied around the chosen anchor.
    pub jitter: f32,
    /// Range for a fresh enemy's first attack cooldown.
    pub initial_cooldown: (f32, f32),
    pub table: Vec<Wave>,
}

impl Default for WaveTuning {
    fn default() -> Self {
        use Archetype::*;
        WaveTuning {
            first_delay: 1.5,
            interval: 6.0,
            jitter: 80.0,
            initial_cooldown: (0.4, 1.1),
            table: vec![
                vec![(LightMelee, 3), (Ranged, 1)],
                vec![(LightMelee, 4), (Ranged, 2)],
                vec![(LightMelee, 4), (HeavyMelee, 1)],
                vec![(LightMelee, 5), (Ranged, 2), (HeavyMelee, 1)],
                vec![(LightMelee, 6), (Ranged, 3), (HeavyMelee, 2)],
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub dps: f32,
    /// Vertical knockback per frame while overlapping.
    pub lift: f32,
    /// Per-frame probability of a spark particle.
    pub spark_chance: f64,
}

impl Default for HazardTuning {
    fn default() -> Self {
        HazardTuning {
            dps: 40.0,
            lift: -20.0,
            spark_chance: 0.12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub viewport: (f32, f32),
    /// Fraction of the remaining distance covered per frame.
    pub follow: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        CameraTuning {
            viewport: (1280.0, 720.0),
            follow: 0.08,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Damage multiplier applied to hits taken while blocking.
    pub block_multiplier: f32,
    /// Half-height of the vertical band every melee swing covers.
    pub strike_band: f32,
    /// Enemy strike origin distance beyond the body's leading edge.
    pub enemy_strike_offset: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        CombatTuning {
            block_multiplier: 0.35,
            strike_band: 60.0,
            enemy_strike_offset: 10.0,
        }
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Every simulation constant, grouped by subsystem.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub melee: MeleeTuning,
    pub ray: RayTuning,
    pub cone: ConeTuning,
    pub enemies: EnemyTable,
    pub waves: WaveTuning,
    pub hazard: HazardTuning,
    pub camera: CameraTuning,
    pub combat: CombatTuning,
}

impl Tuning {
    pub fn for_variant(variant: Variant) -> Tuning {
        match variant {
            Variant::Platformer => Tuning::default(),
            Variant::Arena => Tuning::arena(),
        }
    }

    /// Open-arena retune: the player starts airborne, abilities hit harder,
    /// and waves lean on ranged enemies.
    pub fn arena() -> Tuning {
        use Archetype::*;
        let mut t = Tuning::default();
        t.player.starts_flying = true;
        t.player.dash_speed = 1300.0;
        t.player.energy_regen = 55.0;
        t.melee.knockback = 520.0;
        t.melee.knockback_per_combo = 90.0;
        t.ray.dps = 300.0;
        t.ray.tilt = 0.0;
        t.cone.radius = 420.0;
        t.cone.push = 800.0;
        t.enemies.ranged.standoff = (180.0, 340.0);
        t.waves.first_delay = 2.0;
        t.waves.interval = 8.0;
        t.waves.table = vec![
            vec![(LightMelee, 2), (Ranged, 2)],
            vec![(LightMelee, 3), (Ranged, 3)],
            vec![(Ranged, 4), (HeavyMelee, 1)],
            vec![(LightMelee, 4), (Ranged, 4), (HeavyMelee, 2)],
        ];
        t
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("physics.gravity", self.physics.gravity),
            ("player.energy_regen", self.player.energy_regen),
            ("player.speed", self.player.speed),
            ("player.dash_speed", self.player.dash_speed),
            ("player.dash_cooldown", self.player.dash_cooldown),
            ("player.dash_invuln", self.player.dash_invuln),
            ("melee.cooldown", self.melee.cooldown),
            ("melee.combo_window", self.melee.combo_window),
            ("ray.dps", self.ray.dps),
            ("ray.drain", self.ray.drain),
            ("ray.duration", self.ray.duration),
            ("ray.length", self.ray.length),
            ("ray.lockout", self.ray.lockout),
            ("cone.drain", self.cone.drain),
            ("cone.dps", self.cone.dps),
            ("cone.stun", self.cone.stun),
            ("waves.first_delay", self.waves.first_delay),
            ("waves.interval", self.waves.interval),
            ("waves.jitter", self.waves.jitter),
            ("hazard.dps", self.hazard.dps),
            ("combat.block_multiplier", self.combat.block_multiplier),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a finite, non-negative number (got {})", name, value));
            }
        }

        if self.player.max_health <= 0.0 || !self.player.max_health.is_finite() {
            return Err("player.max_health must be positive".to_string());
        }
        if self.player.max_energy <= 0.0 || !self.player.max_energy.is_finite() {
            return Err("player.max_energy must be positive".to_string());
        }
        if self.player.size.0 <= 0.0 || self.player.size.1 <= 0.0 {
            return Err("player.size must be positive".to_string());
        }
        if self.cone.radius <= 0.0 {
            return Err("cone.radius must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.hazard.spark_chance) {
            return Err("hazard.spark_chance must be within [0, 1]".to_string());
        }
        if self.melee.combo_cap == 0 {
            return Err("melee.combo_cap must be at least 1".to_string());
        }

        let (lo, hi) = self.waves.initial_cooldown;
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo > hi {
            return Err(format!("waves.initial_cooldown must satisfy 0 <= min <= max (got {:?})", (lo, hi)));
        }

        for (name, stats) in [
            ("light_melee", &self.enemies.light_melee),
            ("ranged", &self.enemies.ranged),
            ("heavy_melee", &self.enemies.heavy_melee),
        ] {
            if stats.health <= 0.0 || !stats.health.is_finite() {
                return Err(format!("enemies.{}.health must be positive", name));
            }
            if stats.size.0 <= 0.0 || stats.size.1 <= 0.0 {
                return Err(format!("enemies.{}.size must be positive", name));
            }
            if stats.standoff.0 > stats.standoff.1 {
                return Err(format!("enemies.{}.standoff must satisfy min <= max", name));
            }
            if stats.attack_cooldown < 0.0 || stats.damage < 0.0 {
                return Err(format!("enemies.{} has a negative cooldown or damage", name));
            }
        }

        for (i, wave) in self.waves.table.iter().enumerate() {
            if wave.iter().any(|&(_, count)| count == 0) {
                return Err(format!("waves.table[{}] has an entry with count 0", i));
            }
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse and validate a tuning table from RON text.
pub fn tuning_from_str(s: &str) -> Result<Tuning, ConfigError> {
    let tuning: Tuning = ron::from_str(s)?;
    tuning.validate().map_err(ConfigError::Invalid)?;
    Ok(tuning)
}

/// Load a tuning table from a RON file.
pub fn load_tuning<P: AsRef<Path>>(path: P) -> Result<Tuning, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let tuning = tuning_from_str(&contents)?;
    log::info!("loaded tuning from {}", path.display());
    Ok(tuning)
}

// ── Stages ────────────────────────────────────────────────────────────────────

impl Stage {
    pub fn for_variant(variant: Variant) -> Stage {
        match variant {
            Variant::Platformer => Stage::platformer(),
            Variant::Arena => Stage::arena(),
        }
    }

    /// Long street with a wide ground slab, scattered ledges and two
    /// electrified floor strips.
    pub fn platformer() -> Stage {
        Stage {
            platforms: vec![
                Rect::new(-2000.0, 640.0, 5000.0, 160.0),
                Rect::new(-200.0, 480.0, 300.0, 24.0),
                Rect::new(180.0, 360.0, 240.0, 24.0),
                Rect::new(520.0, 460.0, 300.0, 24.0),
                Rect::new(980.0, 520.0, 300.0, 24.0),
                Rect::new(1350.0, 380.0, 260.0, 24.0),
            ],
            hazards: vec![
                Rect::new(300.0, 630.0, 120.0, 10.0),
                Rect::new(860.0, 630.0, 120.0, 10.0),
            ],
            spawn_anchors: vec![
                Vec2::new(-800.0, 520.0),
                Vec2::new(-400.0, 520.0),
                Vec2::new(500.0, 520.0),
                Vec2::new(1200.0, 520.0),
                Vec2::new(1600.0, 520.0),
            ],
            player_spawn: Vec2::new(80.0, 390.0),
            bounds: Rect::new(-2200.0, -1200.0, 5400.0, 2400.0),
        }
    }

    /// Closed box with floating blocks; everything stays inside the walls.
    pub fn arena() -> Stage {
        Stage {
            platforms: vec![
                Rect::new(0.0, 1300.0, 2400.0, 100.0),
                Rect::new(0.0, -100.0, 2400.0, 100.0),
                Rect::new(-100.0, -100.0, 100.0, 1500.0),
                Rect::new(2400.0, -100.0, 100.0, 1500.0),
                Rect::new(600.0, 900.0, 240.0, 40.0),
                Rect::new(1560.0, 900.0, 240.0, 40.0),
                Rect::new(1080.0, 600.0, 240.0, 40.0),
            ],
            hazards: vec![
                Rect::new(300.0, 1290.0, 200.0, 10.0),
                Rect::new(1100.0, 1290.0, 200.0, 10.0),
                Rect::new(1900.0, 1290.0, 200.0, 10.0),
            ],
            spawn_anchors: vec![
                Vec2::new(200.0, 1200.0),
                Vec2::new(1100.0, 1200.0),
                Vec2::new(2100.0, 1200.0),
                Vec2::new(700.0, 800.0),
                Vec2::new(1650.0, 800.0),
            ],
            player_spawn: Vec2::new(1170.0, 700.0),
            bounds: Rect::new(-200.0, -200.0, 2800.0, 1800.0),
        }
    }
}
