//! Game state and core simulation types
//!
//! Score, shot budget and level live on `GameState` and are only mutated by
//! the simulation loop, the resolver and the fire action.

use serde::{Deserialize, Serialize};

use super::cannon::Cannon;
use super::level::{EntityIds, ObstacleSet, generate_seeded_level};
use super::obstacle::{Obstacle, ObstacleKind};
use super::projectile::{Projectile, RemovalCause};
use crate::error::Result;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every target cleared, waiting for `advance_level`
    LevelComplete,
    /// Out of shots with targets left
    GameOver,
    /// Final level cleared
    Victory,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired {
        id: u32,
    },
    ProjectileRemoved {
        id: u32,
        cause: RemovalCause,
    },
    ObstacleDestroyed {
        id: u32,
        kind: ObstacleKind,
    },
    Teleported {
        projectile: u32,
        from: u32,
        to: u32,
    },
    Reflected {
        projectile: u32,
        mirror: u32,
    },
    LevelComplete {
        level: u32,
    },
    OutOfAmmo,
}

/// What a single tick changed, for the presentation layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub score_delta: i64,
    /// Ids to detach visuals for
    pub removed_projectiles: Vec<u32>,
    pub removed_obstacles: Vec<u32>,
    pub events: Vec<GameEvent>,
    /// True only on the tick the last target was removed
    pub level_complete: bool,
    /// True only on the tick the run was lost
    pub out_of_ammo: bool,
}

impl TickReport {
    pub fn push(&mut self, event: GameEvent) {
        match &event {
            GameEvent::ProjectileRemoved { id, .. } => self.removed_projectiles.push(*id),
            GameEvent::ObstacleDestroyed { id, .. } => self.removed_obstacles.push(*id),
            GameEvent::LevelComplete { .. } => self.level_complete = true,
            GameEvent::OutOfAmmo => self.out_of_ammo = true,
            _ => {}
        }
        self.events.push(event);
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    pub score: i64,
    /// Score when the level started; resets are charged against it
    pub level_base_score: i64,
    pub shots_left: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub cannon: Cannon,
    /// Live projectiles (ascending id)
    pub projectiles: Vec<Projectile>,
    /// Live obstacles (ascending id)
    pub obstacles: Vec<Obstacle>,
    /// Starting layout of the current level
    pub layout: ObstacleSet,
    /// Seconds of trajectory preview remaining
    pub preview_time_left: f32,
    /// Seconds spent out of shots with nothing in flight
    pub out_of_ammo_time: f32,
    ids: EntityIds,
}

impl GameState {
    /// Create a new run and generate level 1
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        let mut ids = EntityIds::default();
        let layout = generate_seeded_level(seed, 1, &tuning, &mut ids)?;
        let obstacles = layout.instantiate(&mut ids, &tuning);
        let cannon = Cannon::new(tuning.cannon_base);

        log::info!("Run started with seed {}", seed);

        Ok(Self {
            seed,
            level: 1,
            score: 0,
            level_base_score: 0,
            shots_left: tuning.shots_per_level,
            time_ticks: 0,
            phase: GamePhase::Playing,
            cannon,
            projectiles: Vec::new(),
            obstacles,
            layout,
            preview_time_left: 0.0,
            out_of_ammo_time: 0.0,
            ids,
            tuning,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Replace the live obstacles with a fresh copy of the level layout
    pub(crate) fn rebuild_obstacles(&mut self) {
        self.obstacles = self.layout.instantiate(&mut self.ids, &self.tuning);
    }

    /// Generate and install the layout for `level`
    ///
    /// Nothing is changed if generation fails.
    pub(crate) fn load_level(&mut self, level: u32) -> Result<()> {
        self.layout = generate_seeded_level(self.seed, level, &self.tuning, &mut self.ids)?;
        self.level = level;
        self.rebuild_obstacles();
        self.projectiles.clear();
        self.shots_left = self.tuning.shots_per_level;
        self.level_base_score = self.score;
        self.preview_time_left = 0.0;
        self.out_of_ammo_time = 0.0;
        self.cannon.reset_aim();
        Ok(())
    }

    pub fn targets_remaining(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|o| o.active && o.kind.is_target())
            .count()
    }

    pub fn projectile(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.obstacles.sort_by_key(|o| o.id);
    }
}
