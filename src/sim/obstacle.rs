//! Obstacle behavior: drift, wall bounces, and damage
//!
//! Rocks and targets take damage; perpetio, mirrors and wormholes are
//! indestructible and only interact through the resolver's special rules.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Destructible, no score
    Rock,
    /// Destructible, scores and must be cleared to finish the level
    Target,
    /// Indestructible, swallows any projectile
    Perpetio,
    /// Indestructible, shatters solid shots and reflects lasers
    Mirror,
    /// Teleports projectiles to the other wormhole sharing `pair_id`
    Wormhole { pair_id: u32 },
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::Target => "target",
            ObstacleKind::Perpetio => "perpetio",
            ObstacleKind::Mirror => "mirror",
            ObstacleKind::Wormhole { .. } => "wormhole",
        }
    }

    /// Only rocks and targets carry health
    pub fn is_destructible(&self) -> bool {
        matches!(self, ObstacleKind::Rock | ObstacleKind::Target)
    }

    pub fn is_target(&self) -> bool {
        matches!(self, ObstacleKind::Target)
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    /// Placement at level start, restored on reset
    pub initial_pos: Vec2,
    pub vel: Vec2,
    /// Velocity at level start, restored on reset
    pub initial_vel: Vec2,
    /// Nominal radius (used for wall bounces and wormhole exits)
    pub radius: f32,
    /// Radius used for projectile hit tests
    pub hit_radius: f32,
    /// `None` for indestructible kinds
    pub health: Option<u8>,
    pub movable: bool,
    /// Cleared when destroyed; inactive obstacles are skipped by every pass
    pub active: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        let hit_radius = match kind {
            ObstacleKind::Target => tuning.target_effective_radius,
            _ => tuning.obstacle_radius,
        };
        let movable = vel != Vec2::ZERO;
        Self {
            id,
            kind,
            pos,
            initial_pos: pos,
            vel,
            initial_vel: vel,
            radius: tuning.obstacle_radius,
            hit_radius,
            health: kind.is_destructible().then_some(tuning.obstacle_health),
            movable,
            active: true,
        }
    }

    /// Fresh copy at the level-start placement, with full health
    pub fn restored(&self, id: u32, tuning: &Tuning) -> Self {
        let mut copy = Self::new(id, self.kind, self.initial_pos, self.initial_vel, tuning);
        copy.movable = self.movable;
        copy
    }

    /// Move by velocity and bounce off the arena walls
    pub fn advance(&mut self, dt: f32, width: f32, height: f32) {
        if !self.active || !self.movable {
            return;
        }
        self.pos += self.vel * dt;

        // Only flip when heading into the wall so an obstacle pushed past the
        // edge can't get stuck oscillating there
        if (self.pos.x - self.radius <= 0.0 && self.vel.x < 0.0)
            || (self.pos.x + self.radius >= width && self.vel.x > 0.0)
        {
            self.vel.x = -self.vel.x;
        }
        if (self.pos.y - self.radius <= 0.0 && self.vel.y < 0.0)
            || (self.pos.y + self.radius >= height && self.vel.y > 0.0)
        {
            self.vel.y = -self.vel.y;
        }
    }

    /// Apply one point of damage. Returns true if this hit destroyed it.
    ///
    /// Indestructible kinds ignore hits.
    pub fn on_hit(&mut self) -> bool {
        if !self.active {
            return false;
        }
        match self.health.as_mut() {
            Some(hp) => {
                *hp = hp.saturating_sub(1);
                *hp == 0
            }
            None => false,
        }
    }

    /// Take the obstacle out of play. Returns false if it was already gone.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        was_active
    }
}

/// Random drift velocity in `±speed` per axis
pub fn drift_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-speed..=speed),
        rng.random_range(-speed..=speed),
    )
}

/// Target velocity: drift, but each axis moves at least `min_speed`
pub fn target_velocity<R: Rng>(rng: &mut R, speed: f32, min_speed: f32) -> Vec2 {
    let mut vel = drift_velocity(rng, speed);
    if vel.x.abs() < min_speed {
        vel.x = min_speed;
    }
    if vel.y.abs() < min_speed {
        vel.y = min_speed;
    }
    vel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_health_by_kind() {
        let tuning = Tuning::default();
        let rock = Obstacle::new(1, ObstacleKind::Rock, Vec2::ZERO, Vec2::ZERO, &tuning);
        let target = Obstacle::new(2, ObstacleKind::Target, Vec2::ZERO, Vec2::ZERO, &tuning);
        let mirror = Obstacle::new(3, ObstacleKind::Mirror, Vec2::ZERO, Vec2::ZERO, &tuning);
        assert_eq!(rock.health, Some(3));
        assert_eq!(target.health, Some(3));
        assert_eq!(mirror.health, None);
        assert_eq!(target.hit_radius, 40.0);
        assert_eq!(rock.hit_radius, 30.0);
    }

    #[test]
    fn test_target_dies_on_third_hit() {
        let tuning = Tuning::default();
        let mut target = Obstacle::new(1, ObstacleKind::Target, Vec2::ZERO, Vec2::ZERO, &tuning);
        assert!(!target.on_hit());
        assert!(!target.on_hit());
        assert!(target.on_hit());
        assert_eq!(target.health, Some(0));
    }

    #[test]
    fn test_indestructible_ignores_hits() {
        let tuning = Tuning::default();
        for kind in [
            ObstacleKind::Perpetio,
            ObstacleKind::Mirror,
            ObstacleKind::Wormhole { pair_id: 1 },
        ] {
            let mut obstacle = Obstacle::new(1, kind, Vec2::ZERO, Vec2::ZERO, &tuning);
            for _ in 0..10 {
                assert!(!obstacle.on_hit());
            }
            assert_eq!(obstacle.health, None);
        }
    }

    #[test]
    fn test_bounce_off_right_wall() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(
            1,
            ObstacleKind::Target,
            Vec2::new(968.0, 300.0),
            Vec2::new(5.0, 0.0),
            &tuning,
        );
        obstacle.advance(1.0, 1000.0, 700.0);
        assert_eq!(obstacle.pos.x, 973.0);
        assert_eq!(obstacle.vel.x, -5.0);

        // Next step moves it back inside without flipping again
        obstacle.advance(1.0, 1000.0, 700.0);
        assert_eq!(obstacle.vel.x, -5.0);
    }

    #[test]
    fn test_bounce_off_floor() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(
            1,
            ObstacleKind::Rock,
            Vec2::new(500.0, 32.0),
            Vec2::new(0.0, -4.0),
            &tuning,
        );
        obstacle.advance(1.0, 1000.0, 700.0);
        assert_eq!(obstacle.vel.y, 4.0);
    }

    #[test]
    fn test_static_obstacle_stays_put() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(1, ObstacleKind::Perpetio, Vec2::new(600.0, 200.0), Vec2::ZERO, &tuning);
        assert!(!obstacle.movable);
        obstacle.advance(1.0, 1000.0, 700.0);
        assert_eq!(obstacle.pos, Vec2::new(600.0, 200.0));
    }

    #[test]
    fn test_restored_copy() {
        let tuning = Tuning::default();
        let mut rock = Obstacle::new(1, ObstacleKind::Rock, Vec2::new(600.0, 200.0), Vec2::new(1.0, 2.0), &tuning);
        rock.advance(10.0, 1000.0, 700.0);
        rock.on_hit();
        let fresh = rock.restored(9, &tuning);
        assert_eq!(fresh.id, 9);
        assert_eq!(fresh.pos, Vec2::new(600.0, 200.0));
        assert_eq!(fresh.vel, Vec2::new(1.0, 2.0));
        assert_eq!(fresh.health, Some(3));
    }

    #[test]
    fn test_target_velocity_minimum() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let vel = target_velocity(&mut rng, 5.0, 1.0);
            assert!(vel.x.abs() >= 1.0 && vel.x.abs() <= 5.0);
            assert!(vel.y.abs() >= 1.0 && vel.y.abs() <= 5.0);
        }
    }
}
