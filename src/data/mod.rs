/// Player-visible state of a cell. A revealed cell can never carry a flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub(crate) bomb: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub fn has_bomb(&self) -> bool {
        self.bomb
    }

    /// Mines among the in-bounds neighbors, 0..=8.
    pub fn neighbor_mines(&self) -> u8 {
        self.adjacent
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.state == CellState::Flagged
    }
}

/// What a single reveal did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealOutcome {
    /// Nothing changed: the cell was absent, already open or flagged.
    NoOp,
    /// The target cell held a mine.
    Exploded,
    /// This many safe cells were opened, the target plus its cascade.
    Opened(usize),
}

/// Row-major grid of cells, indexed by `row * columns + column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub(crate) rows: usize,
    pub(crate) columns: usize,
    pub(crate) mines: usize,
    pub(crate) mines_placed: bool,
    pub(crate) cells: Vec<Cell>,
}
