use std::fmt;

use minesweeper_common::models::{CellView, GameParams, Pos};
use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{
    data::{Cell, CellState, Grid, RevealOutcome},
    error::{ConfigError, Result},
};

/// Largest board the engine will build, in cells.
pub const MAX_CELLS: usize = 1 << 22;

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// In-bounds neighbors of `pos` on a `rows x columns` grid.
///
/// Yields between 2 and 8 positions for a cell inside the grid (fewer only on
/// degenerate 1-wide grids) and nothing at all for a position outside it.
pub fn neighbors(pos: Pos, rows: usize, columns: usize) -> impl Iterator<Item = Pos> {
    let inside = pos.row < rows && pos.column < columns;
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter(move |_| inside)
        .filter_map(move |(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let column = pos.column.checked_add_signed(dc)?;
            (row < rows && column < columns).then_some(Pos { row, column })
        })
}

impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        match value.state {
            CellState::Hidden => Self::Hidden,
            CellState::Flagged => Self::Flagged,
            CellState::Revealed if value.bomb => Self::Bomb,
            CellState::Revealed => Self::Revealed {
                adjacent: value.adjacent,
            },
        }
    }
}

impl Grid {
    /// An empty grid with no mines laid yet.
    ///
    /// Until mines are placed the grid refuses to be played: reveals and flags
    /// are no-ops.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyGrid { rows, columns });
        }
        let len = rows
            .checked_mul(columns)
            .filter(|&len| len <= MAX_CELLS)
            .ok_or(ConfigError::GridTooLarge { rows, columns })?;

        Ok(Self {
            rows,
            columns,
            mines: 0,
            mines_placed: false,
            cells: vec![Cell::default(); len],
        })
    }

    /// A grid with `params.mines` mines scattered uniformly at random.
    pub fn with_random_mines<R: Rng + ?Sized>(params: GameParams, rng: &mut R) -> Result<Self> {
        let mut grid = Self::new(params.rows, params.columns)?;
        grid.place_mines(params.mines, rng)?;
        Ok(grid)
    }

    /// A grid with mines at exactly the given positions.
    pub fn with_mines(rows: usize, columns: usize, mines: &[Pos]) -> Result<Self> {
        let mut grid = Self::new(rows, columns)?;
        grid.place_mines_at(mines)?;
        Ok(grid)
    }

    #[instrument(level = "trace", skip(self, rng))]
    pub fn place_mines<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        self.check_placement(count)?;

        let mut indices: Vec<usize> = (0..self.cells.len()).collect();
        let (chosen, _) = indices.partial_shuffle(rng, count);
        for &index in chosen.iter() {
            self.cells[index].bomb = true;
        }

        self.finish_placement(count);
        Ok(())
    }

    #[instrument(level = "trace", skip(self, positions), fields(count = positions.len()))]
    pub fn place_mines_at(&mut self, positions: &[Pos]) -> Result<()> {
        self.check_placement(positions.len())?;

        let mut staged = vec![false; self.cells.len()];
        for &pos in positions {
            let index = self.index(pos).ok_or(ConfigError::MineOutOfBounds {
                row: pos.row,
                column: pos.column,
            })?;
            if staged[index] {
                return Err(ConfigError::DuplicateMine {
                    row: pos.row,
                    column: pos.column,
                });
            }
            staged[index] = true;
        }

        for (cell, bomb) in self.cells.iter_mut().zip(staged) {
            cell.bomb = bomb;
        }
        self.finish_placement(positions.len());
        Ok(())
    }

    fn check_placement(&self, count: usize) -> Result<()> {
        if self.mines_placed {
            return Err(ConfigError::MinesAlreadyPlaced);
        }
        if self.cells.iter().any(|cell| cell.state != CellState::Hidden) {
            return Err(ConfigError::GridInPlay);
        }
        if count >= self.cells.len() {
            return Err(ConfigError::TooManyMines {
                mines: count,
                cells: self.cells.len(),
            });
        }
        Ok(())
    }

    fn finish_placement(&mut self, count: usize) {
        for index in 0..self.cells.len() {
            let adjacent = neighbors(self.pos_of(index), self.rows, self.columns)
                .filter(|n| self.cells[n.row * self.columns + n.column].bomb)
                .count() as u8;
            self.cells[index].adjacent = adjacent;
        }
        self.mines = count;
        self.mines_placed = true;
        debug!(
            "Placed {} mines on {}x{} grid",
            count, self.rows, self.columns
        );
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn mine_count(&self) -> usize {
        self.mines
    }

    /// Number of cells, `rows * columns`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row * self.columns + pos.column)
    }

    fn pos_of(&self, index: usize) -> Pos {
        Pos {
            row: index / self.columns,
            column: index % self.columns,
        }
    }

    /// The cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    /// All cells in row-major order with their positions.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.pos_of(index), cell))
    }

    pub fn neighbors_of(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        neighbors(pos, self.rows, self.columns)
    }

    /// Opens the cell at `pos`, cascading through zero-count cells.
    ///
    /// The cascade only expands from cells with no adjacent mines, so it can
    /// never reach a mine. Flagged cells stop it.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, column = pos.column))]
    pub fn reveal(&mut self, pos: Pos) -> RevealOutcome {
        if !self.mines_placed {
            return RevealOutcome::NoOp;
        }
        let Some(index) = self.index(pos) else {
            return RevealOutcome::NoOp;
        };

        let cell = &mut self.cells[index];
        if cell.state != CellState::Hidden {
            return RevealOutcome::NoOp;
        }
        cell.state = CellState::Revealed;
        if cell.bomb {
            return RevealOutcome::Exploded;
        }

        let mut opened = 1;
        let mut pending = Vec::new();
        if cell.adjacent == 0 {
            pending.push(pos);
        }

        while let Some(current) = pending.pop() {
            for neighbor in neighbors(current, self.rows, self.columns) {
                let cell = &mut self.cells[neighbor.row * self.columns + neighbor.column];
                if cell.state != CellState::Hidden {
                    continue;
                }
                debug_assert!(!cell.bomb, "cascade reached a mine at {neighbor:?}");

                cell.state = CellState::Revealed;
                opened += 1;
                if cell.adjacent == 0 {
                    pending.push(neighbor);
                }
            }
        }

        RevealOutcome::Opened(opened)
    }

    /// Opens every mine that is not flagged. Returns how many were opened.
    pub fn reveal_all_mines(&mut self) -> usize {
        let mut revealed = 0;
        for cell in self.cells.iter_mut() {
            if cell.bomb && cell.state == CellState::Hidden {
                cell.state = CellState::Revealed;
                revealed += 1;
            }
        }
        revealed
    }

    /// Flags every closed cell. Returns how many flags were added.
    pub fn flag_all_unrevealed(&mut self) -> usize {
        if !self.mines_placed {
            return 0;
        }
        let mut flagged = 0;
        for cell in self.cells.iter_mut() {
            if cell.state == CellState::Hidden {
                cell.state = CellState::Flagged;
                flagged += 1;
            }
        }
        flagged
    }

    /// Flips the flag on a closed cell and returns the new flag state.
    ///
    /// Revealed cells are left alone and report `Some(false)`; positions
    /// outside the grid, or any position before mines are placed, report
    /// `None`.
    pub fn toggle_flag(&mut self, pos: Pos) -> Option<bool> {
        if !self.mines_placed {
            return None;
        }
        let index = self.index(pos)?;
        let cell = &mut self.cells[index];
        cell.state = match cell.state {
            CellState::Hidden => CellState::Flagged,
            CellState::Flagged => CellState::Hidden,
            CellState::Revealed => CellState::Revealed,
        };
        Some(cell.is_flagged())
    }

    /// Rows of render views, top to bottom.
    pub fn views(&self) -> Vec<Vec<CellView>> {
        self.cells
            .iter()
            .map(CellView::from)
            .collect::<Vec<CellView>>()
            .chunks(self.columns)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

/// Debug picture of the layout: `*` mine, `!` flagged safe cell, the neighbor
/// count where it is positive, blank otherwise.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(self.columns).enumerate() {
            if row > 0 {
                f.write_str("\n")?;
            }
            for cell in chunk {
                match cell {
                    Cell { bomb: true, .. } => f.write_str("*")?,
                    Cell {
                        state: CellState::Flagged,
                        ..
                    } => f.write_str("!")?,
                    Cell { adjacent: 0, .. } => f.write_str(" ")?,
                    Cell { adjacent, .. } => write!(f, "{adjacent}")?,
                }
            }
        }
        Ok(())
    }
}
