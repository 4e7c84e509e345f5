//! Configuration errors.
//!
//! Building a grid or a session is the only thing in the engine that can fail.
//! Every other misuse (stray clicks, moves after the game ended) is absorbed as
//! a no-op.

/// The requested `(rows, columns, mines)` combination cannot form a game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigError {
    /// One of the dimensions is zero.
    #[display(
        "Invalid configuration: grid needs at least one row and one column, got {}x{}",
        rows,
        columns
    )]
    EmptyGrid { rows: usize, columns: usize },

    /// More cells than the engine will allocate.
    #[display("Invalid configuration: {}x{} grid is too large", rows, columns)]
    GridTooLarge { rows: usize, columns: usize },

    /// A game needs at least one safe cell.
    #[display("Invalid configuration: {} mines do not fit in {} cells", mines, cells)]
    TooManyMines { mines: usize, cells: usize },

    /// An explicit mine position lies outside the grid.
    #[display("Invalid configuration: mine at ({}, {}) is outside the grid", row, column)]
    MineOutOfBounds { row: usize, column: usize },

    /// An explicit mine position was listed more than once.
    #[display("Invalid configuration: mine at ({}, {}) is listed twice", row, column)]
    DuplicateMine { row: usize, column: usize },

    /// Mines can only be laid once per grid.
    #[display("Invalid configuration: mines have already been placed")]
    MinesAlreadyPlaced,

    /// Mines must be laid before any cell is opened or flagged.
    #[display("Invalid configuration: cells were opened or flagged before mines were placed")]
    GridInPlay,
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;
