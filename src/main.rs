//! Cannonade headless driver
//!
//! Plays every level with a scripted gunner: for each shot it sweeps the
//! cannon's legal angles, power settings and projectile kinds through the
//! trajectory preview and fires whichever path passes closest to a live
//! target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use cannonade::Tuning;
use cannonade::consts::*;
use cannonade::sim::{GamePhase, GameState, ProjectileKind, TickInput, tick, trajectory_points};

#[derive(Parser, Debug)]
#[command(about = "Play cannonade levels with a scripted gunner", version)]
struct Args {
    /// Optional tuning JSON; defaults are used for anything it leaves out
    tuning: Option<PathBuf>,
    /// Run seed for level generation
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Level resets allowed after running out of ammo
    #[arg(long, default_value_t = 2)]
    retries: u32,
    /// Give up on a level after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    level_time_limit: f32,
}

/// Best shot found by the gunner
#[derive(Debug, Clone, Copy)]
struct Aim {
    angle: f32,
    power: f32,
    kind: ProjectileKind,
    miss: f32,
}

/// Sweep every legal cannon setting and keep the path closest to a live target
fn choose_aim(state: &GameState) -> Option<Aim> {
    let targets: Vec<Vec2> = state
        .obstacles
        .iter()
        .filter(|o| o.active && o.kind.is_target())
        .map(|o| o.pos)
        .collect();
    if targets.is_empty() {
        return None;
    }

    let base = state.cannon.base;
    let tip_length = state.cannon.barrel_length + CANNON_TIP_EXTRA;
    let angle_steps = ((CANNON_MAX_ANGLE - CANNON_MIN_ANGLE) / CANNON_ANGLE_STEP) as u32;
    let power_steps = ((MAX_POWER - MIN_POWER) / POWER_STEP) as u32;

    let mut best: Option<Aim> = None;
    for kind in ProjectileKind::ALL {
        for a in 0..=angle_steps {
            let angle = CANNON_MIN_ANGLE + a as f32 * CANNON_ANGLE_STEP;
            let tip = base + cannonade::heading(angle) * tip_length;
            for p in 0..=power_steps {
                let power = MIN_POWER + p as f32 * POWER_STEP;
                let path = trajectory_points(tip, angle, power, kind, &state.tuning);
                let miss = path
                    .iter()
                    .flat_map(|point| targets.iter().map(move |t| point.distance(*t)))
                    .fold(f32::INFINITY, f32::min);
                if best.is_none_or(|b| miss < b.miss) {
                    best = Some(Aim {
                        angle,
                        power,
                        kind,
                        miss,
                    });
                }
                // Laser speed ignores power
                if kind == ProjectileKind::Laser {
                    break;
                }
            }
        }
    }
    best
}

/// Play the current level until it is won, lost or times out
fn play_level(state: &mut GameState, time_limit: f32) -> GamePhase {
    let max_ticks = (time_limit / SIM_DT) as u64;
    let start = state.time_ticks;

    while state.phase == GamePhase::Playing {
        if state.time_ticks - start >= max_ticks {
            log::warn!("Level {} timed out after {} s", state.level, time_limit);
            break;
        }

        let mut input = TickInput::default();
        if state.projectiles.is_empty() && state.shots_left > 0 {
            if let Some(aim) = choose_aim(state) {
                log::debug!(
                    "Aiming {} at {} deg, power {} (predicted miss {:.1})",
                    aim.kind.as_str(),
                    aim.angle,
                    aim.power,
                    aim.miss
                );
                state.cannon.aim(aim.angle, aim.power);
                input.select = Some(aim.kind);
                input.fire = true;
            }
        }

        let report = tick(state, &input, SIM_DT);
        for event in &report.events {
            log::debug!("{:?}", event);
        }
    }
    state.phase
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut state = GameState::new(args.seed, tuning).context("failed to start run")?;
    log::info!("Cannonade starting: seed {}, {} levels", args.seed, state.tuning.max_level);

    let mut retries_left = args.retries;
    loop {
        let level = state.level;
        match play_level(&mut state, args.level_time_limit) {
            GamePhase::LevelComplete => {
                log::info!(
                    "Level {} cleared with {} shots to spare, score {}",
                    level,
                    state.shots_left,
                    state.score
                );
                state
                    .advance_level()
                    .with_context(|| format!("failed to generate level {}", level + 1))?;
            }
            GamePhase::Victory => break,
            GamePhase::GameOver if retries_left > 0 => {
                retries_left -= 1;
                log::info!("Retrying level {} ({} retries left)", level, retries_left);
                state.reset_level();
            }
            _ => break,
        }
    }

    log::info!(
        "Run finished: {:?} on level {}, score {}, {} ticks",
        state.phase,
        state.level.min(state.tuning.max_level),
        state.score,
        state.time_ticks
    );
    Ok(())
}
