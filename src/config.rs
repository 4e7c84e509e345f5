//! Environment-driven settings.
//!
//! Every knob has a default; a missing or unparseable variable falls back to it.
//! Whether the resulting game parameters form a playable grid is decided later,
//! when the session is built.

use std::{env, str::FromStr, time::Duration};

use minesweeper_common::models::{Difficulty, GameParams};
use tracing::{info, warn};

pub const DIFFICULTY_VAR: &str = "MINESWEEPER_DIFFICULTY";
pub const ROWS_VAR: &str = "MINESWEEPER_ROWS";
pub const COLUMNS_VAR: &str = "MINESWEEPER_COLUMNS";
pub const MINES_VAR: &str = "MINESWEEPER_MINES";
pub const CLEANUP_INTERVAL_VAR: &str = "CLEANUP_INTERVAL_SECONDS";
pub const INACTIVE_TIMEOUT_VAR: &str = "INACTIVE_GAME_TIMEOUT_SECONDS";

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
    }
}

/// Game parameters from the process environment.
pub fn game_params_from_env() -> GameParams {
    game_params_from(|key| env::var(key).ok())
}

/// Game parameters from an arbitrary key lookup.
///
/// A valid difficulty preset wins; otherwise rows, columns and mines override
/// the default board one by one.
pub fn game_params_from(lookup: impl Fn(&str) -> Option<String>) -> GameParams {
    if let Some(name) = lookup(DIFFICULTY_VAR) {
        match name.parse::<Difficulty>() {
            Ok(difficulty) => {
                info!("Using {} preset from {}", difficulty, DIFFICULTY_VAR);
                return difficulty.params();
            }
            Err(err) => warn!("{}", err),
        }
    }

    let default = GameParams::default();
    GameParams {
        rows: parse_or(&lookup, ROWS_VAR, default.rows),
        columns: parse_or(&lookup, COLUMNS_VAR, default.columns),
        mines: parse_or(&lookup, MINES_VAR, default.mines),
    }
}

/// Settings for a host that keeps many sessions alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostConfig {
    pub cleanup_interval: Duration,
    pub inactive_timeout: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(60),
            inactive_timeout: Duration::from_secs(600),
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let cleanup_interval_secs = parse_or(
            &lookup,
            CLEANUP_INTERVAL_VAR,
            default.cleanup_interval.as_secs(),
        );
        let inactive_timeout_secs = parse_or(
            &lookup,
            INACTIVE_TIMEOUT_VAR,
            default.inactive_timeout.as_secs(),
        );

        Self {
            // A zero period would make the cleanup interval panic.
            cleanup_interval: Duration::from_secs(cleanup_interval_secs.max(1)),
            inactive_timeout: Duration::from_secs(inactive_timeout_secs),
        }
    }
}
