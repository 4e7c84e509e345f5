use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a renderer should draw for a single cell.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum CellView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "bomb")]
    Bomb,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub column: usize,
}

impl Pos {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameParams {
    pub rows: usize,
    pub columns: usize,
    pub mines: usize,
}

impl GameParams {
    pub const fn new(rows: usize, columns: usize, mines: usize) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Total number of cells, saturating on absurd dimensions.
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Difficulty::Easy.params()
    }
}

impl From<Difficulty> for GameParams {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.params()
    }
}

/// The three classic board presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Expert];

    pub const fn params(self) -> GameParams {
        match self {
            Difficulty::Easy => GameParams::new(9, 9, 10),
            Difficulty::Medium => GameParams::new(16, 16, 40),
            Difficulty::Expert => GameParams::new(16, 30, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a difficulty name is not one of the presets.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Unknown difficulty {:?}, expected easy, medium or expert", name)]
pub struct ParseDifficultyError {
    pub name: String,
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError {
                name: trimmed.to_string(),
            })
    }
}
