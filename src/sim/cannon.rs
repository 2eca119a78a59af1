//! Cannon aiming and trajectory preview
//!
//! The cannon is the player's only control surface: it rotates in fixed
//! steps, adjusts launch power, and selects which projectile to fire.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{ProjectileKind, launch_velocity};
use crate::consts::*;
use crate::heading;
use crate::tuning::Tuning;

/// Sample spacing for previewed trajectories (seconds)
pub const PREVIEW_STEP: f32 = 0.1;
/// Bombshell previews stop after this long even with drill budget left
pub const BOMB_PREVIEW_MAX_TIME: f32 = 10.0;
/// Bullet preview horizon when the shot has no horizontal speed
pub const BULLET_PREVIEW_FALLBACK: f32 = 15.0;
/// Hard cap on preview samples, for shots that never leave the extended area
pub const MAX_PREVIEW_POINTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateDir {
    /// Counter-clockwise (raise the barrel)
    Up,
    /// Clockwise (lower the barrel)
    Down,
}

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    /// Pivot point
    pub base: Vec2,
    /// Barrel angle in degrees, counter-clockwise from +x
    pub angle_deg: f32,
    pub barrel_length: f32,
    /// Launch power scalar
    pub power: f32,
    pub selected: ProjectileKind,
}

impl Default for Cannon {
    fn default() -> Self {
        Self::new(Vec2::new(CANNON_BASE_X, CANNON_BASE_Y))
    }
}

impl Cannon {
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            angle_deg: CANNON_START_ANGLE,
            barrel_length: CANNON_BARREL,
            power: START_POWER,
            selected: ProjectileKind::Bullet,
        }
    }

    /// Where projectiles spawn
    pub fn tip(&self) -> Vec2 {
        self.base + heading(self.angle_deg) * (self.barrel_length + CANNON_TIP_EXTRA)
    }

    pub fn rotate(&mut self, dir: RotateDir) {
        self.angle_deg = match dir {
            RotateDir::Up => (self.angle_deg + CANNON_ANGLE_STEP).min(CANNON_MAX_ANGLE),
            RotateDir::Down => (self.angle_deg - CANNON_ANGLE_STEP).max(CANNON_MIN_ANGLE),
        };
        log::debug!("Cannon rotated to angle: {}", self.angle_deg);
    }

    /// Change power by whole steps (positive = stronger)
    pub fn adjust_power(&mut self, steps: i32) {
        self.power = (self.power + steps as f32 * POWER_STEP).clamp(MIN_POWER, MAX_POWER);
    }

    /// Set angle and power directly, clamped to the cannon's limits
    pub fn aim(&mut self, angle_deg: f32, power: f32) {
        self.angle_deg = angle_deg.clamp(CANNON_MIN_ANGLE, CANNON_MAX_ANGLE);
        self.power = power.clamp(MIN_POWER, MAX_POWER);
    }

    pub fn select(&mut self, kind: ProjectileKind) {
        self.selected = kind;
    }

    /// Level start pose (selection is kept)
    pub fn reset_aim(&mut self) {
        self.angle_deg = CANNON_START_ANGLE;
    }

    /// Preview of the currently aimed shot
    pub fn preview(&self, tuning: &Tuning) -> Vec<Vec2> {
        trajectory_points(self.tip(), self.angle_deg, self.power, self.selected, tuning)
    }
}

/// How long a preview for this shot should extend
fn preview_horizon(origin: Vec2, v0: Vec2, kind: ProjectileKind, tuning: &Tuning) -> f32 {
    match kind {
        ProjectileKind::Bullet => {
            if v0.x.abs() > 0.0 {
                100_000.0 / v0.x.abs()
            } else {
                BULLET_PREVIEW_FALLBACK
            }
        }
        ProjectileKind::Bombshell => {
            // Walk the arc until the drill budget would be used up
            let mut t = 0.0;
            let mut traveled = 0.0;
            let mut prev = origin;
            while traveled < tuning.bomb_drill && t < BOMB_PREVIEW_MAX_TIME {
                t += PREVIEW_STEP;
                let point = ballistic_point(origin, v0, tuning.gravity, t);
                traveled += point.distance(prev);
                prev = point;
            }
            t
        }
        ProjectileKind::Laser => tuning.laser_range / tuning.laser_speed,
    }
}

#[inline]
fn ballistic_point(origin: Vec2, v0: Vec2, gravity: f32, t: f32) -> Vec2 {
    origin + v0 * t - Vec2::new(0.0, 0.5 * gravity * t * t)
}

/// Sampled flight path for a shot, in closed form
///
/// Sampling stops at the kind's horizon, once the path leaves the extended
/// play area, or after `MAX_PREVIEW_POINTS` samples.
pub fn trajectory_points(
    origin: Vec2,
    angle_deg: f32,
    power: f32,
    kind: ProjectileKind,
    tuning: &Tuning,
) -> Vec<Vec2> {
    let v0 = launch_velocity(kind, angle_deg, power, tuning);
    let t_max = preview_horizon(origin, v0, kind, tuning);
    let gravity = if kind == ProjectileKind::Laser {
        0.0
    } else {
        tuning.gravity
    };
    let m = tuning.extended_margin;

    let mut points = Vec::new();
    for step in 0..MAX_PREVIEW_POINTS {
        let t = step as f32 * PREVIEW_STEP;
        if t > t_max {
            break;
        }
        let point = ballistic_point(origin, v0, gravity, t);
        if point.x < -m
            || point.x > tuning.arena_width + m
            || point.y < -m
            || point.y > tuning.arena_height + m
        {
            break;
        }
        points.push(point);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_position() {
        let cannon = Cannon::default();
        let tip = cannon.tip();
        let expected = Vec2::new(100.0, 190.0) + Vec2::splat(70.0 * std::f32::consts::FRAC_1_SQRT_2);
        assert!((tip - expected).length() < 1e-3);
    }

    #[test]
    fn test_rotation_limits() {
        let mut cannon = Cannon::default();
        cannon.rotate(RotateDir::Up);
        assert_eq!(cannon.angle_deg, 50.0);
        for _ in 0..200 {
            cannon.rotate(RotateDir::Up);
        }
        assert_eq!(cannon.angle_deg, 360.0);
        for _ in 0..200 {
            cannon.rotate(RotateDir::Down);
        }
        assert_eq!(cannon.angle_deg, -90.0);
    }

    #[test]
    fn test_power_limits() {
        let mut cannon = Cannon::default();
        cannon.adjust_power(1);
        assert_eq!(cannon.power, 60.0);
        cannon.adjust_power(10);
        assert_eq!(cannon.power, 100.0);
        cannon.adjust_power(-20);
        assert_eq!(cannon.power, 10.0);
    }

    #[test]
    fn test_laser_preview_is_straight() {
        let tuning = Tuning::default();
        let points = trajectory_points(Vec2::new(100.0, 190.0), 30.0, 50.0, ProjectileKind::Laser, &tuning);
        // range / speed = 3.08s at 0.1s spacing
        assert_eq!(points.len(), 31);
        let dir = heading(30.0);
        for p in &points {
            let rel = *p - Vec2::new(100.0, 190.0);
            assert!(rel.perp_dot(dir).abs() < 1e-2);
        }
    }

    #[test]
    fn test_bullet_preview_follows_gravity() {
        let tuning = Tuning::default();
        let origin = Vec2::new(100.0, 190.0);
        let points = trajectory_points(origin, 45.0, 50.0, ProjectileKind::Bullet, &tuning);
        assert!(points.len() > 10);
        assert_eq!(points[0], origin);
        let v0 = launch_velocity(ProjectileKind::Bullet, 45.0, 50.0, &tuning);
        let t = 1.0;
        let expected = origin + v0 * t - Vec2::new(0.0, 0.5 * tuning.gravity * t * t);
        assert!((points[10] - expected).length() < 1e-2);
        // Bounded by the extended area, not by the long horizontal horizon
        let last = points.last().unwrap();
        assert!(last.x <= tuning.arena_width + tuning.extended_margin);
    }

    #[test]
    fn test_preview_capped_when_shot_never_leaves() {
        // Weightless, barely moving shot: horizon is huge and the path stays in bounds
        let tuning = Tuning {
            gravity: 0.0,
            ..Tuning::default()
        };
        let points = trajectory_points(Vec2::new(500.0, 350.0), 45.0, 1e-6, ProjectileKind::Bullet, &tuning);
        assert_eq!(points.len(), MAX_PREVIEW_POINTS);
    }

    #[test]
    fn test_bombshell_preview_bounded_by_drill() {
        let tuning = Tuning::default();
        let origin = Vec2::new(100.0, 190.0);
        let points = trajectory_points(origin, 45.0, 50.0, ProjectileKind::Bombshell, &tuning);
        let path: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        assert!(path <= tuning.bomb_drill + 20.0);
        assert!(path > tuning.bomb_drill * 0.9);
    }
}
