use serde::{Deserialize, Serialize};

use crate::models::CellView;

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    /// Won or lost; nothing but the clock is accepted any more.
    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// Everything a renderer needs to redraw a game from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub columns: usize,
    pub mines: usize,
    pub status: GameStatus,
    pub flags: usize,
    pub mines_left: usize,
    pub cells_remaining: usize,
    pub elapsed_seconds: u64,
    pub field: Vec<Vec<CellView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_won_and_lost_are_finished() {
        assert!(!GameStatus::NotStarted.is_finished());
        assert!(!GameStatus::Running.is_finished());
        assert!(GameStatus::Won.is_finished());
        assert!(GameStatus::Lost.is_finished());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&GameStatus::NotStarted).unwrap();
        assert_eq!(json, r#""not_started""#);
    }
}
