//! Cannonade - artillery game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, interaction rules, levels)
//! - `tuning`: Data-driven game balance
//! - `error`: Crate error type

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use tuning::{LevelConfig, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Play area dimensions (pixels, y up)
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;
    /// Projectiles are only culled once this far outside the play area
    pub const EXTENDED_MARGIN: f32 = 1000.0;

    /// Downward acceleration applied to bullets and bombshells
    pub const GRAVITY: f32 = 9.8;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 10.0;
    pub const BULLET_MULTIPLIER: f32 = 5.0;

    /// Bombshell defaults
    pub const BOMB_RADIUS: f32 = 50.0;
    pub const BOMB_MULTIPLIER: f32 = 2.0;
    /// Penetration budget (pixels of travel)
    pub const BOMB_DRILL: f32 = 900.0;
    /// Area-of-effect radius when a bombshell kills an obstacle
    pub const BOMB_BLAST_RADIUS: f32 = 50.0;

    /// Laser defaults
    pub const LASER_RADIUS: f32 = 50.0;
    pub const LASER_VEL: f32 = 325.0;
    /// Seconds the beam stays alive
    pub const LASER_IMPULSE: f32 = 3.0;
    /// Maximum distance the beam travels
    pub const LASER_DIST: f32 = 1000.0;

    /// Obstacle defaults
    pub const OBSTACLE_RADIUS: f32 = 30.0;
    pub const TARGET_EFFECTIVE_RADIUS: f32 = 40.0;
    pub const OBSTACLE_HEALTH: u8 = 3;
    pub const OBSTACLE_DRIFT_SPEED: f32 = 5.0;
    pub const TARGET_MIN_SPEED: f32 = 1.0;

    /// Wormhole exit offset beyond the partner radius
    pub const TELEPORT_OFFSET: f32 = 10.0;
    /// Seconds a projectile ignores wormholes after teleporting
    pub const TELEPORT_COOLDOWN: f32 = 0.5;

    /// Cannon defaults
    pub const CANNON_BASE_X: f32 = 100.0;
    pub const CANNON_BASE_Y: f32 = 190.0;
    pub const CANNON_BARREL: f32 = 60.0;
    pub const CANNON_TIP_EXTRA: f32 = 10.0;
    pub const CANNON_START_ANGLE: f32 = 45.0;
    pub const CANNON_ANGLE_STEP: f32 = 5.0;
    pub const CANNON_MIN_ANGLE: f32 = -90.0;
    pub const CANNON_MAX_ANGLE: f32 = 360.0;
    pub const START_POWER: f32 = 50.0;
    pub const POWER_STEP: f32 = 10.0;
    pub const MIN_POWER: f32 = 10.0;
    pub const MAX_POWER: f32 = 100.0;

    /// Scoring and budget
    pub const SHOTS_PER_LEVEL: u32 = 10;
    pub const TARGET_REWARD: i64 = 10;
    pub const RESET_PENALTY: i64 = 15;
    pub const PREVIEW_PENALTY: i64 = 10;
    pub const PREVIEW_DURATION: f32 = 15.0;
    /// Seconds to wait after the last shot before declaring the level lost
    pub const OUT_OF_AMMO_GRACE: f32 = 3.0;
    pub const MAX_LEVEL: u32 = 3;
}

/// Unit vector for an angle given in degrees (counter-clockwise from +x)
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_axes() {
        let east = heading(0.0);
        assert!((east.x - 1.0).abs() < 1e-6 && east.y.abs() < 1e-6);

        let north = heading(90.0);
        assert!(north.x.abs() < 1e-6 && (north.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_is_unit() {
        for angle in [-90.0, 12.5, 45.0, 200.0, 360.0] {
            assert!((heading(angle).length() - 1.0).abs() < 1e-6);
        }
    }
}
