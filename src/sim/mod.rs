//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one stream per level, derived from the run seed)
//! - Stable iteration order (by entity ID)
//! - Deferred removal: entities are marked inactive during a pass and
//!   compacted after it
//! - No rendering or platform dependencies

pub mod cannon;
pub mod collision;
pub mod level;
pub mod obstacle;
pub mod projectile;
pub mod resolve;
pub mod state;
pub mod tick;

pub use cannon::{Cannon, RotateDir, trajectory_points};
pub use collision::{circles_overlap, projectile_hits_obstacle};
pub use level::{EntityIds, ObstacleSet, generate_level, generate_seeded_level};
pub use obstacle::{Obstacle, ObstacleKind};
pub use projectile::{Projectile, ProjectileHandle, ProjectileKind, RemovalCause};
pub use resolve::resolve_collisions;
pub use state::{GameEvent, GamePhase, GameState, TickReport};
pub use tick::{TickInput, tick};
