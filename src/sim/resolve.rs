//! Projectile/obstacle interaction rules
//!
//! One pass per tick over every (obstacle, projectile) pair. Removal is
//! deferred: entities are only marked inactive here and the caller compacts
//! the lists afterwards, so nothing is visited after it has been removed and
//! no score is counted twice.
//!
//! Precedence for a colliding pair, by obstacle kind:
//! 1. Wormhole - teleport to the partner (unless on cooldown)
//! 2. Mirror - shatter solid shots, reverse lasers
//! 3. Perpetio - swallow the projectile
//! 4. Rock / Target - damage; on a kill, bombshells blast the area while
//!    bullets and lasers are spent

use glam::Vec2;

use super::collision::{approaching, projectile_hits_obstacle, reverse_velocity, within_blast};
use super::obstacle::{Obstacle, ObstacleKind};
use super::projectile::{Projectile, ProjectileKind, RemovalCause};
use super::state::{GameEvent, TickReport};
use crate::tuning::Tuning;

/// Resolve all collisions for this tick, recording effects into `report`
pub fn resolve_collisions(
    projectiles: &mut [Projectile],
    obstacles: &mut [Obstacle],
    tuning: &Tuning,
    report: &mut TickReport,
) {
    for oi in 0..obstacles.len() {
        for pi in 0..projectiles.len() {
            // The obstacle may have been destroyed by an earlier projectile
            if !obstacles[oi].active {
                break;
            }
            if !projectile_hits_obstacle(&projectiles[pi], &obstacles[oi]) {
                continue;
            }

            match obstacles[oi].kind {
                ObstacleKind::Wormhole { pair_id } => {
                    teleport(&mut projectiles[pi], obstacles, oi, pair_id, tuning, report);
                }
                ObstacleKind::Mirror => {
                    mirror(&mut projectiles[pi], &obstacles[oi], report);
                }
                ObstacleKind::Perpetio => {
                    remove_projectile(&mut projectiles[pi], RemovalCause::Absorbed, report);
                }
                ObstacleKind::Rock | ObstacleKind::Target => {
                    damage(&mut projectiles[pi], obstacles, oi, tuning, report);
                }
            }
        }
    }
}

fn remove_projectile(projectile: &mut Projectile, cause: RemovalCause, report: &mut TickReport) {
    if projectile.deactivate(cause) {
        log::debug!("{} {} removed: {:?}", projectile.kind().as_str(), projectile.id, cause);
        report.push(GameEvent::ProjectileRemoved {
            id: projectile.id,
            cause,
        });
    }
}

/// Destroy an obstacle, awarding points for targets. No-op if already gone.
fn destroy_obstacle(obstacle: &mut Obstacle, tuning: &Tuning, report: &mut TickReport) {
    if !obstacle.deactivate() {
        return;
    }
    if obstacle.kind.is_target() {
        report.score_delta += tuning.target_reward;
    }
    log::debug!("{} {} destroyed", obstacle.kind.as_str(), obstacle.id);
    report.push(GameEvent::ObstacleDestroyed {
        id: obstacle.id,
        kind: obstacle.kind,
    });
}

fn teleport(
    projectile: &mut Projectile,
    obstacles: &[Obstacle],
    entry: usize,
    pair_id: u32,
    tuning: &Tuning,
    report: &mut TickReport,
) {
    if projectile.just_teleported {
        return;
    }
    let entry_id = obstacles[entry].id;
    let partner = obstacles.iter().find(|o| {
        o.active && o.id != entry_id && o.kind == ObstacleKind::Wormhole { pair_id }
    });
    let Some(partner) = partner else {
        return;
    };

    let offset = partner.radius + tuning.teleport_offset;
    projectile.pos = partner.pos + Vec2::splat(offset);
    projectile.mark_teleported(tuning.teleport_cooldown);
    log::debug!(
        "Projectile {} teleported {} -> {}, exit {:?}",
        projectile.id,
        entry_id,
        partner.id,
        projectile.pos
    );
    report.push(GameEvent::Teleported {
        projectile: projectile.id,
        from: entry_id,
        to: partner.id,
    });
}

fn mirror(projectile: &mut Projectile, mirror: &Obstacle, report: &mut TickReport) {
    if projectile.kind().is_solid() {
        remove_projectile(projectile, RemovalCause::Mirror, report);
        return;
    }
    // Still overlapping after the bounce: wait until it has left
    if !approaching(projectile, mirror) {
        return;
    }
    projectile.vel = reverse_velocity(projectile.vel);
    log::debug!("Laser {} reflected by mirror {}", projectile.id, mirror.id);
    report.push(GameEvent::Reflected {
        projectile: projectile.id,
        mirror: mirror.id,
    });
}

fn damage(
    projectile: &mut Projectile,
    obstacles: &mut [Obstacle],
    struck: usize,
    tuning: &Tuning,
    report: &mut TickReport,
) {
    if !obstacles[struck].on_hit() {
        return;
    }

    // Killed: the struck obstacle always goes, whatever else happens
    destroy_obstacle(&mut obstacles[struck], tuning, report);

    match projectile.kind() {
        ProjectileKind::Bombshell => {
            // Penetrating shot: keeps flying and levels everything nearby
            let impact = projectile.pos;
            for obstacle in obstacles.iter_mut() {
                if obstacle.active && within_blast(impact, tuning.bomb_blast_radius, obstacle) {
                    destroy_obstacle(obstacle, tuning, report);
                }
            }
        }
        ProjectileKind::Bullet | ProjectileKind::Laser => {
            remove_projectile(projectile, RemovalCause::Impact, report);
        }
    }
}
