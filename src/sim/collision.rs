//! Collision detection between projectiles and obstacles
//!
//! Everything is a circle here: a hit is any center distance strictly below
//! the sum of the two radii. Targets use their enlarged `hit_radius`.

use glam::Vec2;

use super::obstacle::Obstacle;
use super::projectile::Projectile;

/// Strict circle overlap test
///
/// Symmetric in its arguments: swapping the two circles gives the same answer.
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance_squared(b) < (a_radius + b_radius) * (a_radius + b_radius)
}

/// Does a live projectile overlap a live obstacle this tick
pub fn projectile_hits_obstacle(projectile: &Projectile, obstacle: &Obstacle) -> bool {
    projectile.active
        && obstacle.active
        && circles_overlap(projectile.pos, projectile.radius, obstacle.pos, obstacle.hit_radius)
}

/// Is an obstacle's center inside a blast circle (inclusive edge)
#[inline]
pub fn within_blast(center: Vec2, blast_radius: f32, obstacle: &Obstacle) -> bool {
    center.distance(obstacle.pos) <= blast_radius
}

/// Is the projectile moving toward the obstacle's center
#[inline]
pub fn approaching(projectile: &Projectile, obstacle: &Obstacle) -> bool {
    projectile.vel.dot(obstacle.pos - projectile.pos) > 0.0
}

/// Mirror response for beams: full velocity reversal
#[inline]
pub fn reverse_velocity(velocity: Vec2) -> Vec2 {
    -velocity
}
