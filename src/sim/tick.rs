//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically, plus the
//! player actions (fire, preview, reset, pause) and level progression.

use glam::Vec2;

use super::cannon::RotateDir;
use super::projectile::{Projectile, ProjectileHandle, ProjectileKind, RemovalCause};
use super::resolve::resolve_collisions;
use super::state::{GameEvent, GamePhase, GameState, TickReport};
use crate::error::Result;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate the barrel one step
    pub rotate: Option<RotateDir>,
    /// Power change in whole steps
    pub power_steps: i32,
    /// Switch the loaded projectile kind
    pub select: Option<ProjectileKind>,
    /// Fire the selected projectile from the cannon tip
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Buy a trajectory preview
    pub show_trajectory: bool,
}

impl GameState {
    /// Spawn a projectile and spend one shot
    ///
    /// Returns `None` without side effects when no shots are left or the
    /// game is not in play.
    pub fn fire(
        &mut self,
        angle_deg: f32,
        power: f32,
        kind: ProjectileKind,
        origin: Vec2,
    ) -> Option<ProjectileHandle> {
        if self.phase != GamePhase::Playing || self.shots_left == 0 {
            log::debug!("Fire ignored: phase {:?}, {} shots left", self.phase, self.shots_left);
            return None;
        }
        self.shots_left -= 1;
        let id = self.next_entity_id();
        let projectile = Projectile::launch(id, kind, origin, angle_deg, power, &self.tuning);
        log::debug!(
            "Fired {} {} at {} deg, power {} ({} shots left)",
            kind.as_str(),
            id,
            angle_deg,
            power,
            self.shots_left
        );
        let handle = projectile.handle();
        self.projectiles.push(projectile);
        Some(handle)
    }

    /// Fire whatever the cannon is currently aimed and loaded with
    pub fn fire_cannon(&mut self) -> Option<ProjectileHandle> {
        let cannon = &self.cannon;
        let (angle, power, kind, tip) = (cannon.angle_deg, cannon.power, cannon.selected, cannon.tip());
        self.fire(angle, power, kind, tip)
    }

    /// Buy a trajectory preview for the current aim
    ///
    /// Charges the preview penalty and starts the preview timer. Returns
    /// `None` (and charges nothing) while a preview is already showing.
    pub fn show_trajectory(&mut self) -> Option<Vec<Vec2>> {
        if self.phase != GamePhase::Playing || self.preview_time_left > 0.0 {
            return None;
        }
        self.score -= self.tuning.preview_penalty;
        self.preview_time_left = self.tuning.preview_duration;
        Some(self.cannon.preview(&self.tuning))
    }

    pub fn preview_active(&self) -> bool {
        self.preview_time_left > 0.0
    }

    /// Restart the current level from its starting layout, for a score penalty
    pub fn reset_level(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.phase == GamePhase::Victory {
            return report;
        }

        for projectile in &mut self.projectiles {
            if projectile.deactivate(RemovalCause::Reset) {
                report.push(GameEvent::ProjectileRemoved {
                    id: projectile.id,
                    cause: RemovalCause::Reset,
                });
            }
        }
        self.projectiles.clear();
        report
            .removed_obstacles
            .extend(self.obstacles.iter().map(|o| o.id));
        self.rebuild_obstacles();

        let new_score = self.level_base_score - self.tuning.reset_penalty;
        report.score_delta = new_score - self.score;
        self.score = new_score;
        self.level_base_score = new_score;
        self.shots_left = self.tuning.shots_per_level;
        self.preview_time_left = 0.0;
        self.out_of_ammo_time = 0.0;
        self.phase = GamePhase::Playing;

        log::info!("Level {} reset, score now {}", self.level, self.score);
        report
    }

    /// Move on after a cleared level
    pub fn advance_level(&mut self) -> Result<()> {
        if self.phase != GamePhase::LevelComplete {
            log::debug!("advance_level ignored in phase {:?}", self.phase);
            return Ok(());
        }
        let next = self.level + 1;
        if next > self.tuning.max_level {
            self.level = next;
            self.shots_left = self.tuning.shots_per_level;
            self.projectiles.clear();
            self.phase = GamePhase::Victory;
            log::info!("All levels cleared, final score {}", self.score);
            return Ok(());
        }
        // Stay on the cleared level if the next one can't be generated
        self.load_level(next)?;
        self.phase = GamePhase::Playing;
        log::info!("Level {} started", self.level);
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
}

fn apply_input(state: &mut GameState, input: &TickInput, report: &mut TickReport) -> i64 {
    if let Some(dir) = input.rotate {
        state.cannon.rotate(dir);
    }
    if input.power_steps != 0 {
        state.cannon.adjust_power(input.power_steps);
    }
    if let Some(kind) = input.select {
        state.cannon.select(kind);
    }

    let mut charged = 0;
    if input.show_trajectory && state.show_trajectory().is_some() {
        charged = state.tuning.preview_penalty;
    }
    if input.fire {
        if let Some(handle) = state.fire_cannon() {
            report.push(GameEvent::ProjectileFired { id: handle.0 });
        }
    }
    charged
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();

    // Handle pause toggle
    if input.pause {
        state.toggle_pause();
        if state.phase == GamePhase::Paused {
            return report;
        }
    }

    if state.phase != GamePhase::Playing {
        return report;
    }

    state.time_ticks += 1;

    // Count down before input so a preview bought this tick runs its full duration
    if state.preview_time_left > 0.0 {
        state.preview_time_left = (state.preview_time_left - dt).max(0.0);
    }

    let charged = apply_input(state, input, &mut report);

    let (width, height) = (state.tuning.arena_width, state.tuning.arena_height);
    for obstacle in &mut state.obstacles {
        obstacle.advance(dt, width, height);
    }

    for projectile in &mut state.projectiles {
        if let Some(cause) = projectile.advance(dt, &state.tuning) {
            log::debug!("{} {} removed: {:?}", projectile.kind().as_str(), projectile.id, cause);
            report.push(GameEvent::ProjectileRemoved {
                id: projectile.id,
                cause,
            });
        }
    }

    resolve_collisions(
        &mut state.projectiles,
        &mut state.obstacles,
        &state.tuning,
        &mut report,
    );
    state.score += report.score_delta;
    report.score_delta -= charged;

    // Compact after the pass so nothing was removed mid-iteration
    state.projectiles.retain(|p| p.active);
    state.obstacles.retain(|o| o.active);
    state.normalize_order();

    if state.targets_remaining() == 0 {
        state.phase = GamePhase::LevelComplete;
        log::info!("Level {} complete, score {}", state.level, state.score);
        report.push(GameEvent::LevelComplete { level: state.level });
        return report;
    }

    // Out of ammo: give the last shots time to land before calling it
    if state.shots_left == 0 && state.projectiles.is_empty() {
        state.out_of_ammo_time += dt;
        if state.out_of_ammo_time >= state.tuning.out_of_ammo_grace {
            state.phase = GamePhase::GameOver;
            log::info!(
                "Out of ammo on level {} with {} targets left, final score {}",
                state.level,
                state.targets_remaining(),
                state.score
            );
            report.push(GameEvent::OutOfAmmo);
        }
    } else {
        state.out_of_ammo_time = 0.0;
    }

    report
}
