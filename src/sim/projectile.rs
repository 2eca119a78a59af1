//! Projectile kinematics
//!
//! Bullets and bombshells fly ballistic arcs under gravity; lasers travel in a
//! straight line at a fixed speed. Each kind has its own termination rule,
//! checked after integration every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading;
use crate::tuning::Tuning;

/// The three shot types the cannon can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Bullet,
    Bombshell,
    Laser,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 3] = [
        ProjectileKind::Bullet,
        ProjectileKind::Bombshell,
        ProjectileKind::Laser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Bullet => "bullet",
            ProjectileKind::Bombshell => "bombshell",
            ProjectileKind::Laser => "laser",
        }
    }

    /// Solid shots are stopped by mirrors; beams are reflected
    pub fn is_solid(&self) -> bool {
        !matches!(self, ProjectileKind::Laser)
    }

    pub fn radius(&self, tuning: &Tuning) -> f32 {
        match self {
            ProjectileKind::Bullet => tuning.bullet_radius,
            ProjectileKind::Bombshell => tuning.bomb_radius,
            ProjectileKind::Laser => tuning.laser_radius,
        }
    }
}

/// Kind-specific flight state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Bullet,
    /// Remaining penetration budget in pixels of travel
    Bombshell { drill_remaining: f32 },
    /// Beam lifetime left and total distance covered so far
    Laser { time_left: f32, traveled: f32 },
}

/// Why a projectile left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Left the extended play area
    OutOfBounds,
    /// Laser lifetime or range exhausted
    Expired,
    /// Bombshell penetration budget used up
    Spent,
    /// Swallowed by a perpetio
    Absorbed,
    /// Solid shot shattered on a mirror
    Mirror,
    /// Destroyed together with the obstacle it killed
    Impact,
    /// Cleared by a level reset
    Reset,
}

/// Handle returned when a shot is fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileHandle(pub u32);

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cleared when removed; inactive projectiles are skipped by every pass
    pub active: bool,
    pub payload: Payload,
    /// Set after a wormhole jump, suppresses further jumps until cooldown ends
    pub just_teleported: bool,
    pub teleport_cooldown: f32,
    /// Set together with `active = false`
    pub removal: Option<RemovalCause>,
}

/// Initial velocity for a shot
///
/// Bullets and bombshells scale with power; lasers ignore it and always
/// leave the barrel at the configured beam speed.
pub fn launch_velocity(kind: ProjectileKind, angle_deg: f32, power: f32, tuning: &Tuning) -> Vec2 {
    let dir = heading(angle_deg);
    match kind {
        ProjectileKind::Bullet => dir * power * tuning.bullet_multiplier,
        ProjectileKind::Bombshell => dir * power * tuning.bomb_multiplier,
        ProjectileKind::Laser => dir * tuning.laser_speed,
    }
}

impl Projectile {
    /// Create a projectile at `origin` and launch it
    pub fn launch(
        id: u32,
        kind: ProjectileKind,
        origin: Vec2,
        angle_deg: f32,
        power: f32,
        tuning: &Tuning,
    ) -> Self {
        let payload = match kind {
            ProjectileKind::Bullet => Payload::Bullet,
            ProjectileKind::Bombshell => Payload::Bombshell {
                drill_remaining: tuning.bomb_drill,
            },
            ProjectileKind::Laser => Payload::Laser {
                time_left: tuning.laser_lifetime,
                traveled: 0.0,
            },
        };
        Self {
            id,
            pos: origin,
            vel: launch_velocity(kind, angle_deg, power, tuning),
            radius: kind.radius(tuning),
            active: true,
            payload,
            just_teleported: false,
            teleport_cooldown: 0.0,
            removal: None,
        }
    }

    pub fn kind(&self) -> ProjectileKind {
        match self.payload {
            Payload::Bullet => ProjectileKind::Bullet,
            Payload::Bombshell { .. } => ProjectileKind::Bombshell,
            Payload::Laser { .. } => ProjectileKind::Laser,
        }
    }

    pub fn handle(&self) -> ProjectileHandle {
        ProjectileHandle(self.id)
    }

    /// Take the projectile out of play. Returns false if it was already gone.
    pub fn deactivate(&mut self, cause: RemovalCause) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.removal = Some(cause);
        true
    }

    /// Start the wormhole re-entry cooldown
    pub fn mark_teleported(&mut self, cooldown: f32) {
        self.just_teleported = true;
        self.teleport_cooldown = cooldown;
    }

    /// Integrate one timestep and apply the termination rules
    ///
    /// Returns the removal cause if the projectile left play this tick.
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> Option<RemovalCause> {
        if !self.active {
            return None;
        }

        if self.just_teleported {
            self.teleport_cooldown -= dt;
            if self.teleport_cooldown <= 0.0 {
                self.just_teleported = false;
            }
        }

        let old_pos = self.pos;
        match &mut self.payload {
            Payload::Laser { time_left, .. } => *time_left -= dt,
            _ => self.vel.y -= tuning.gravity * dt,
        }
        self.pos += self.vel * dt;
        let moved = (self.pos - old_pos).length();

        let cause = match &mut self.payload {
            Payload::Laser {
                time_left,
                traveled,
            } => {
                *traveled += moved;
                (*time_left <= 0.0 || *traveled >= tuning.laser_range).then_some(RemovalCause::Expired)
            }
            Payload::Bombshell { drill_remaining } => {
                *drill_remaining -= moved;
                (*drill_remaining <= 0.0).then_some(RemovalCause::Spent)
            }
            Payload::Bullet => None,
        };

        let cause = cause.or_else(|| {
            (!self.within_extended_bounds(tuning)).then_some(RemovalCause::OutOfBounds)
        });

        if let Some(cause) = cause {
            self.deactivate(cause);
        }
        cause
    }

    /// True while any part of the projectile is inside the arena grown by the margin
    pub fn within_extended_bounds(&self, tuning: &Tuning) -> bool {
        let m = tuning.extended_margin;
        let r = self.radius;
        !(self.pos.x + r < -m
            || self.pos.x - r > tuning.arena_width + m
            || self.pos.y + r < -m
            || self.pos.y - r > tuning.arena_height + m)
    }
}
