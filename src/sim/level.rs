//! Level obstacle generation
//!
//! Populates a level from the tuning table. Targets are placed by rejection
//! sampling away from the cannon and from each other; everything else is
//! sampled uniformly inside the obstacle zone. The result doubles as the
//! snapshot used to rebuild the level on reset.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind, drift_velocity, target_velocity};
use crate::error::{Error, Result};
use crate::tuning::{Tuning, Zone};

/// Monotonic entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// All obstacles generated for one level, at their starting placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSet {
    pub level: u32,
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn count(&self, pred: impl Fn(&ObstacleKind) -> bool) -> usize {
        self.obstacles.iter().filter(|o| pred(&o.kind)).count()
    }

    /// Fresh live copies of every obstacle, with new ids
    pub fn instantiate(&self, ids: &mut EntityIds, tuning: &Tuning) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .map(|o| o.restored(ids.next_id(), tuning))
            .collect()
    }
}

/// Per-level RNG seed derived from the run seed
pub fn level_seed(run_seed: u64, level: u32) -> u64 {
    (level as u64).wrapping_mul(2654435761).wrapping_add(run_seed)
}

fn sample_in<R: Rng>(rng: &mut R, zone: &Zone) -> Vec2 {
    Vec2::new(
        rng.random_range(zone.x_min..=zone.x_max),
        rng.random_range(zone.y_min..=zone.y_max),
    )
}

/// One bounded round of rejection sampling for a target position
fn try_place_target<R: Rng>(
    rng: &mut R,
    tuning: &Tuning,
    placed: &[Vec2],
    separation: f32,
) -> Option<Vec2> {
    for _ in 0..tuning.placement_attempts {
        let candidate = sample_in(rng, &tuning.target_zone);
        if candidate.distance(tuning.cannon_base) < tuning.cannon_clearance {
            continue;
        }
        if placed.iter().any(|p| p.distance(candidate) < separation) {
            continue;
        }
        return Some(candidate);
    }
    None
}

/// Place one target, halving the separation requirement after each failed round
fn place_target<R: Rng>(rng: &mut R, tuning: &Tuning, placed: &[Vec2], level: u32) -> Option<Vec2> {
    let mut separation = tuning.target_separation;
    for round in 0..=tuning.relaxation_rounds {
        if let Some(pos) = try_place_target(rng, tuning, placed, separation) {
            return Some(pos);
        }
        if round < tuning.relaxation_rounds {
            separation *= 0.5;
            log::warn!(
                "Level {}: target {} unplaceable, relaxing separation to {}",
                level,
                placed.len() + 1,
                separation
            );
        }
    }
    None
}

/// Generate the obstacle population for a 1-based level
pub fn generate_level<R: Rng>(
    level: u32,
    tuning: &Tuning,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Result<ObstacleSet> {
    let config = tuning.level(level);
    let mut obstacles = Vec::with_capacity(config.total() as usize);

    // Targets first: they carry the placement constraints
    let mut placed: Vec<Vec2> = Vec::with_capacity(config.targets as usize);
    for _ in 0..config.targets {
        let Some(pos) = place_target(rng, tuning, &placed, level) else {
            return Err(Error::TargetPlacement {
                level,
                placed: placed.len(),
                requested: config.targets as usize,
            });
        };
        placed.push(pos);
        let vel = target_velocity(rng, tuning.drift_speed, tuning.target_min_speed);
        obstacles.push(Obstacle::new(ids.next_id(), ObstacleKind::Target, pos, vel, tuning));
    }

    let drift = if config.obstacles_drift {
        tuning.drift_speed
    } else {
        0.0
    };
    let spawn = |kind: ObstacleKind, rng: &mut R, ids: &mut EntityIds| {
        let pos = sample_in(rng, &tuning.obstacle_zone);
        let vel = drift_velocity(rng, drift);
        Obstacle::new(ids.next_id(), kind, pos, vel, tuning)
    };

    // Wormholes come in pairs sharing the first member's id
    for _ in 0..config.wormholes / 2 {
        let mut first = spawn(ObstacleKind::Wormhole { pair_id: 0 }, rng, ids);
        let pair_id = first.id;
        first.kind = ObstacleKind::Wormhole { pair_id };
        let second = spawn(ObstacleKind::Wormhole { pair_id }, rng, ids);
        obstacles.push(first);
        obstacles.push(second);
    }
    for _ in 0..config.mirrors {
        obstacles.push(spawn(ObstacleKind::Mirror, rng, ids));
    }
    for _ in 0..config.perpetio {
        obstacles.push(spawn(ObstacleKind::Perpetio, rng, ids));
    }
    for _ in 0..config.rocks {
        obstacles.push(spawn(ObstacleKind::Rock, rng, ids));
    }

    log::info!(
        "Obstacles initialized for level {}: {} targets, {} rocks, {} wormholes, {} mirrors, {} perpetio",
        level,
        config.targets,
        config.rocks,
        (config.wormholes / 2) * 2,
        config.mirrors,
        config.perpetio
    );

    Ok(ObstacleSet { level, obstacles })
}

/// Generate a level with the RNG derived from the run seed
pub fn generate_seeded_level(
    run_seed: u64,
    level: u32,
    tuning: &Tuning,
    ids: &mut EntityIds,
) -> Result<ObstacleSet> {
    let mut rng = Pcg32::seed_from_u64(level_seed(run_seed, level));
    generate_level(level, tuning, &mut rng, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn generate(level: u32, seed: u64) -> ObstacleSet {
        let mut ids = EntityIds::default();
        generate_seeded_level(seed, level, &Tuning::default(), &mut ids).unwrap()
    }

    #[test]
    fn test_level_counts() {
        let set = generate(1, 42);
        assert_eq!(set.count(ObstacleKind::is_target), 4);
        assert_eq!(set.count(|k| *k == ObstacleKind::Rock), 3);
        assert_eq!(set.count(|k| *k == ObstacleKind::Perpetio), 3);
        assert_eq!(set.count(|k| *k == ObstacleKind::Mirror), 0);
        assert_eq!(set.count(|k| matches!(k, ObstacleKind::Wormhole { .. })), 0);

        let set = generate(2, 42);
        assert_eq!(set.count(ObstacleKind::is_target), 5);
        assert_eq!(set.count(|k| *k == ObstacleKind::Mirror), 2);

        let set = generate(5, 42);
        assert_eq!(set.count(ObstacleKind::is_target), 6);
        assert_eq!(set.count(|k| *k == ObstacleKind::Perpetio), 2);
        assert_eq!(set.count(|k| matches!(k, ObstacleKind::Wormhole { .. })), 2);
    }

    #[test]
    fn test_target_constraints() {
        let tuning = Tuning::default();
        for seed in 0..20 {
            let set = generate(3, seed);
            let targets: Vec<_> = set
                .obstacles
                .iter()
                .filter(|o| o.kind.is_target())
                .map(|o| o.pos)
                .collect();
            for (i, a) in targets.iter().enumerate() {
                assert!(a.distance(tuning.cannon_base) >= tuning.cannon_clearance);
                for b in &targets[i + 1..] {
                    // Relaxation may halve separation, never more than the configured rounds
                    let floor = tuning.target_separation * 0.5f32.powi(tuning.relaxation_rounds as i32);
                    assert!(a.distance(*b) >= floor);
                }
            }
        }
    }

    #[test]
    fn test_wormholes_paired() {
        let set = generate(3, 7);
        let mut pairs: HashMap<u32, Vec<u32>> = HashMap::new();
        for o in &set.obstacles {
            if let ObstacleKind::Wormhole { pair_id } = o.kind {
                pairs.entry(pair_id).or_default().push(o.id);
            }
        }
        assert_eq!(pairs.len(), 1);
        for (pair_id, members) in pairs {
            assert_eq!(members.len(), 2);
            assert!(members.contains(&pair_id));
        }
    }

    #[test]
    fn test_obstacles_inside_zone() {
        let tuning = Tuning::default();
        let set = generate(3, 11);
        for o in set.obstacles.iter().filter(|o| !o.kind.is_target()) {
            let z = tuning.obstacle_zone;
            assert!(o.pos.x >= z.x_min && o.pos.x <= z.x_max);
            assert!(o.pos.y >= z.y_min && o.pos.y <= z.y_max);
            assert_eq!(o.initial_pos, o.pos);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate(2, 1234);
        let b = generate(2, 1234);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
    }

    #[test]
    fn test_static_level_config() {
        let mut tuning = Tuning::default();
        tuning.levels[0].obstacles_drift = false;
        let mut ids = EntityIds::default();
        let set = generate_seeded_level(3, 1, &tuning, &mut ids).unwrap();
        for o in &set.obstacles {
            // Targets always move
            assert_eq!(o.movable, o.kind.is_target());
        }
    }

    #[test]
    fn test_unsatisfiable_placement_fails() {
        let tuning = Tuning {
            // Every target sample lands within the cannon clearance
            cannon_clearance: 10_000.0,
            placement_attempts: 50,
            ..Tuning::default()
        };
        let mut ids = EntityIds::default();
        let err = generate_seeded_level(1, 1, &tuning, &mut ids).unwrap_err();
        assert!(matches!(
            err,
            Error::TargetPlacement {
                level: 1,
                placed: 0,
                requested: 4
            }
        ));
    }

    #[test]
    fn test_crowded_level_relaxes_separation() {
        let tuning = Tuning {
            levels: vec![crate::tuning::LevelConfig::new(12, 0, 0, 0, 0)],
            placement_attempts: 200,
            ..Tuning::default()
        };
        let mut ids = EntityIds::default();
        let set = generate_seeded_level(5, 1, &tuning, &mut ids).unwrap();
        assert_eq!(set.count(ObstacleKind::is_target), 12);
    }

    #[test]
    fn test_instantiate_gives_fresh_ids() {
        let tuning = Tuning::default();
        let mut ids = EntityIds::default();
        let set = generate_seeded_level(9, 3, &tuning, &mut ids).unwrap();
        let live = set.instantiate(&mut ids, &tuning);
        assert_eq!(live.len(), set.obstacles.len());
        for (fresh, original) in live.iter().zip(&set.obstacles) {
            assert!(fresh.id > original.id);
            assert_eq!(fresh.kind, original.kind);
            assert_eq!(fresh.pos, original.initial_pos);
        }
    }
}
