//! Data-driven game balance
//!
//! Every number the simulation uses lives here so levels can be rebalanced
//! from a JSON file without touching code. Defaults match `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::{Error, Result};

/// Axis-aligned sampling region (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Zone {
    pub fn is_valid(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }
}

/// Obstacle population for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub targets: u32,
    pub rocks: u32,
    pub perpetio: u32,
    pub mirrors: u32,
    /// Generated as `wormholes / 2` pairs
    pub wormholes: u32,
    /// Non-target obstacles drift and bounce when set
    #[serde(default = "default_drift")]
    pub obstacles_drift: bool,
}

fn default_drift() -> bool {
    true
}

impl LevelConfig {
    pub const fn new(targets: u32, rocks: u32, perpetio: u32, mirrors: u32, wormholes: u32) -> Self {
        Self {
            targets,
            rocks,
            perpetio,
            mirrors,
            wormholes,
            obstacles_drift: true,
        }
    }

    pub fn total(&self) -> u32 {
        self.targets + self.rocks + self.perpetio + self.mirrors + (self.wormholes / 2) * 2
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Projectiles are culled this far beyond the arena edges
    pub extended_margin: f32,
    pub gravity: f32,

    // === Projectiles ===
    pub bullet_radius: f32,
    pub bullet_multiplier: f32,
    pub bomb_radius: f32,
    pub bomb_multiplier: f32,
    pub bomb_drill: f32,
    pub bomb_blast_radius: f32,
    pub laser_radius: f32,
    pub laser_speed: f32,
    pub laser_lifetime: f32,
    pub laser_range: f32,

    // === Obstacles ===
    pub obstacle_radius: f32,
    /// Collision radius used for targets instead of `obstacle_radius`
    pub target_effective_radius: f32,
    pub obstacle_health: u8,
    /// Random drift velocity range is `±drift_speed` per axis
    pub drift_speed: f32,
    /// Target velocity components below this are bumped up to it
    pub target_min_speed: f32,
    pub teleport_offset: f32,
    pub teleport_cooldown: f32,

    // === Level generation ===
    /// Fixed cannon pivot; targets keep `cannon_clearance` away from it
    pub cannon_base: Vec2,
    pub cannon_clearance: f32,
    pub target_separation: f32,
    pub target_zone: Zone,
    pub obstacle_zone: Zone,
    /// Samples per placement round before relaxing separation
    pub placement_attempts: u32,
    /// Number of times separation is halved before giving up
    pub relaxation_rounds: u32,
    pub levels: Vec<LevelConfig>,
    pub max_level: u32,

    // === Scoring ===
    pub shots_per_level: u32,
    pub target_reward: i64,
    pub reset_penalty: i64,
    pub preview_penalty: i64,
    pub preview_duration: f32,
    pub out_of_ammo_grace: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: SCREEN_WIDTH,
            arena_height: SCREEN_HEIGHT,
            extended_margin: EXTENDED_MARGIN,
            gravity: GRAVITY,

            bullet_radius: BULLET_RADIUS,
            bullet_multiplier: BULLET_MULTIPLIER,
            bomb_radius: BOMB_RADIUS,
            bomb_multiplier: BOMB_MULTIPLIER,
            bomb_drill: BOMB_DRILL,
            bomb_blast_radius: BOMB_BLAST_RADIUS,
            laser_radius: LASER_RADIUS,
            laser_speed: LASER_VEL,
            laser_lifetime: LASER_IMPULSE,
            laser_range: LASER_DIST,

            obstacle_radius: OBSTACLE_RADIUS,
            target_effective_radius: TARGET_EFFECTIVE_RADIUS,
            obstacle_health: OBSTACLE_HEALTH,
            drift_speed: OBSTACLE_DRIFT_SPEED,
            target_min_speed: TARGET_MIN_SPEED,
            teleport_offset: TELEPORT_OFFSET,
            teleport_cooldown: TELEPORT_COOLDOWN,

            cannon_base: Vec2::new(CANNON_BASE_X, CANNON_BASE_Y),
            cannon_clearance: 400.0,
            target_separation: 200.0,
            target_zone: Zone {
                x_min: 100.0,
                x_max: SCREEN_WIDTH - 100.0,
                y_min: 100.0,
                y_max: SCREEN_HEIGHT - 100.0,
            },
            // Right-hand band, clear of the cannon
            obstacle_zone: Zone {
                x_min: SCREEN_WIDTH / 2.0,
                x_max: SCREEN_WIDTH - OBSTACLE_RADIUS * 2.0,
                y_min: 150.0,
                y_max: SCREEN_HEIGHT / 2.0,
            },
            placement_attempts: 1000,
            relaxation_rounds: 3,
            levels: vec![
                LevelConfig::new(4, 3, 3, 0, 0),
                LevelConfig::new(5, 3, 3, 2, 0),
                LevelConfig::new(6, 3, 2, 2, 2),
            ],
            max_level: MAX_LEVEL,

            shots_per_level: SHOTS_PER_LEVEL,
            target_reward: TARGET_REWARD,
            reset_penalty: RESET_PENALTY,
            preview_penalty: PREVIEW_PENALTY,
            preview_duration: PREVIEW_DURATION,
            out_of_ammo_grace: OUT_OF_AMMO_GRACE,
        }
    }
}

impl Tuning {
    /// Level table entry for a 1-based level; levels past the table reuse the last row
    pub fn level(&self, level: u32) -> LevelConfig {
        let idx = (level.max(1) - 1) as usize;
        self.levels
            .get(idx)
            .or_else(|| self.levels.last())
            .copied()
            .unwrap_or(LevelConfig::new(0, 0, 0, 0, 0))
    }

    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("gravity", self.gravity),
            ("bullet_radius", self.bullet_radius),
            ("bomb_radius", self.bomb_radius),
            ("laser_radius", self.laser_radius),
            ("laser_speed", self.laser_speed),
            ("laser_lifetime", self.laser_lifetime),
            ("laser_range", self.laser_range),
            ("bomb_drill", self.bomb_drill),
            ("obstacle_radius", self.obstacle_radius),
            ("target_effective_radius", self.target_effective_radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::InvalidTuning(format!("{} must be positive", name)));
            }
        }
        if self.obstacle_health == 0 {
            return Err(Error::InvalidTuning("obstacle_health must be at least 1".into()));
        }
        if self.levels.is_empty() {
            return Err(Error::InvalidTuning("level table is empty".into()));
        }
        if !self.target_zone.is_valid() || !self.obstacle_zone.is_valid() {
            return Err(Error::InvalidTuning("placement zone has min > max".into()));
        }
        if self.placement_attempts == 0 {
            return Err(Error::InvalidTuning("placement_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_table() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level(1), LevelConfig::new(4, 3, 3, 0, 0));
        assert_eq!(tuning.level(2), LevelConfig::new(5, 3, 3, 2, 0));
        assert_eq!(tuning.level(3), LevelConfig::new(6, 3, 2, 2, 2));
        // Past the table: same as level 3
        assert_eq!(tuning.level(7), tuning.level(3));
    }

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "gravity": 20.0, "shots_per_level": 4 }"#).unwrap();
        assert_eq!(tuning.gravity, 20.0);
        assert_eq!(tuning.shots_per_level, 4);
        assert_eq!(tuning.arena_width, SCREEN_WIDTH);
        assert_eq!(tuning.levels.len(), 3);
    }

    #[test]
    fn test_rejects_empty_levels() {
        let err = Tuning::from_json_str(r#"{ "levels": [] }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_weightless_arena() {
        let err = Tuning::from_json_str(r#"{ "gravity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json_str("{ gravity: ").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_level_config_drift_default() {
        let cfg: LevelConfig = serde_json::from_str(
            r#"{ "targets": 1, "rocks": 0, "perpetio": 0, "mirrors": 0, "wormholes": 3 }"#,
        )
        .unwrap();
        assert!(cfg.obstacles_drift);
        // Odd wormhole counts round down to whole pairs
        assert_eq!(cfg.total(), 3);
    }
}
