use std::fmt;

use minesweeper_common::{
    models::{CellView, GameParams, Pos},
    protocol::{GameStatus, Snapshot},
};
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Cell, Grid, RevealOutcome},
    error::Result,
};

/// Receives the end of a game. Each session fires at most one of these, once.
pub trait GameObserver: Send {
    fn on_win(&mut self) {}
    fn on_lose(&mut self) {}
}

impl GameObserver for () {}

/// Adapts a pair of closures into a [`GameObserver`].
pub struct Callbacks<W, L> {
    on_win: W,
    on_lose: L,
}

impl<W, L> Callbacks<W, L>
where
    W: FnMut() + Send,
    L: FnMut() + Send,
{
    pub fn new(on_win: W, on_lose: L) -> Self {
        Self { on_win, on_lose }
    }
}

impl<W, L> GameObserver for Callbacks<W, L>
where
    W: FnMut() + Send,
    L: FnMut() + Send,
{
    fn on_win(&mut self) {
        (self.on_win)()
    }

    fn on_lose(&mut self) {
        (self.on_lose)()
    }
}

/// One game: a grid plus lifecycle, counters and clock.
///
/// Every call is absorbed as a no-op when it makes no sense (positions off the
/// grid, cells already open, moves after the game ended), so an input layer can
/// forward raw clicks without checking anything first.
pub struct Session {
    grid: Grid,
    status: GameStatus,
    flags: usize,
    cells_remaining: usize,
    start_tick: u64,
    last_tick: u64,
    elapsed_seconds: u64,
    observer: Box<dyn GameObserver>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("grid", &self.grid)
            .field("status", &self.status)
            .field("flags", &self.flags)
            .field("cells_remaining", &self.cells_remaining)
            .field("start_tick", &self.start_tick)
            .field("last_tick", &self.last_tick)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts a game with randomly placed mines.
    pub fn new(params: GameParams) -> Result<Self> {
        Self::with_rng(params, &mut rand::rng())
    }

    #[instrument(level = "trace", skip(rng))]
    pub fn with_rng<R: Rng + ?Sized>(params: GameParams, rng: &mut R) -> Result<Self> {
        let grid = Grid::with_random_mines(params, rng)?;
        info!(
            "Creating new game: {}x{} with {} mines",
            params.rows, params.columns, params.mines
        );
        Ok(Self::from_grid(grid))
    }

    /// Starts a game with mines at exactly the given positions.
    #[instrument(level = "trace", skip(mines), fields(mine_count = mines.len()))]
    pub fn with_mines(rows: usize, columns: usize, mines: &[Pos]) -> Result<Self> {
        let grid = Grid::with_mines(rows, columns, mines)?;
        info!(
            "Creating new game: {}x{} with {} fixed mines",
            rows,
            columns,
            mines.len()
        );
        Ok(Self::from_grid(grid))
    }

    fn from_grid(grid: Grid) -> Self {
        Self {
            cells_remaining: grid.len() - grid.mine_count(),
            grid,
            status: GameStatus::NotStarted,
            flags: 0,
            start_tick: 0,
            last_tick: 0,
            elapsed_seconds: 0,
            observer: Box::new(()),
        }
    }

    /// Replaces the observer notified when the game is won or lost.
    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Shorthand for [`Session::with_observer`] with two closures.
    pub fn with_callbacks(
        self,
        on_win: impl FnMut() + Send + 'static,
        on_lose: impl FnMut() + Send + 'static,
    ) -> Self {
        self.with_observer(Callbacks::new(on_win, on_lose))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn flag_count(&self) -> usize {
        self.flags
    }

    /// Safe cells still closed.
    pub fn cells_remaining(&self) -> usize {
        self.cells_remaining
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Mines minus flags, never below zero.
    pub fn mines_left(&self) -> usize {
        self.grid.mine_count().saturating_sub(self.flags)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.grid.cell(pos)
    }

    pub fn view(&self, pos: Pos) -> Option<CellView> {
        self.grid.cell(pos).map(CellView::from)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            mines: self.grid.mine_count(),
            status: self.status,
            flags: self.flags,
            mines_left: self.mines_left(),
            cells_remaining: self.cells_remaining,
            elapsed_seconds: self.elapsed_seconds,
            field: self.grid.views(),
        }
    }

    /// Opens a cell. Win is decided only once the whole cascade has run.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, column = pos.column))]
    pub fn open(&mut self, pos: Pos) -> RevealOutcome {
        if self.status.is_finished() {
            debug!(
                "Ignoring open on finished game at ({}, {})",
                pos.row, pos.column
            );
            return RevealOutcome::NoOp;
        }

        let Some(cell) = self.grid.cell(pos) else {
            warn!("Invalid open position: ({}, {})", pos.row, pos.column);
            return RevealOutcome::NoOp;
        };
        if cell.is_revealed() || cell.is_flagged() {
            debug!(
                "Ignoring open on {:?} cell ({}, {})",
                cell.state(),
                pos.row,
                pos.column
            );
            return RevealOutcome::NoOp;
        }

        self.start();
        let outcome = self.grid.reveal(pos);
        match outcome {
            RevealOutcome::Exploded => self.lose(pos),
            RevealOutcome::Opened(opened) => {
                self.cells_remaining = self.cells_remaining.saturating_sub(opened);
                if self.cells_remaining == 0 {
                    self.win();
                } else {
                    debug!(
                        "Opened {} cells, {} safe cells remaining",
                        opened, self.cells_remaining
                    );
                }
            }
            RevealOutcome::NoOp => {}
        }
        outcome
    }

    /// Flips the flag on a closed cell. Returns the new flag state, or `None`
    /// when the call was absorbed.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, column = pos.column))]
    pub fn toggle_flag(&mut self, pos: Pos) -> Option<bool> {
        if self.status.is_finished() {
            debug!(
                "Ignoring flag on finished game at ({}, {})",
                pos.row, pos.column
            );
            return None;
        }

        let Some(cell) = self.grid.cell(pos) else {
            warn!("Invalid flag position: ({}, {})", pos.row, pos.column);
            return None;
        };
        if cell.is_revealed() {
            debug!(
                "Ignoring flag on revealed cell ({}, {})",
                pos.row, pos.column
            );
            return None;
        }

        self.start();
        let flagged = self.grid.toggle_flag(pos)?;
        if flagged {
            self.flags += 1;
        } else {
            self.flags -= 1;
        }
        debug!(
            "Cell ({}, {}) {}, {} flags set",
            pos.row,
            pos.column,
            if flagged { "flagged" } else { "unflagged" },
            self.flags
        );
        Some(flagged)
    }

    /// Feeds the clock. Only a running game advances `elapsed_seconds`.
    pub fn tick(&mut self, now_millis: u64) {
        self.last_tick = now_millis;
        if self.status == GameStatus::Running {
            self.elapsed_seconds = now_millis.saturating_sub(self.start_tick) / 1000;
        }
    }

    fn start(&mut self) {
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::Running;
            self.start_tick = self.last_tick;
            self.elapsed_seconds = 0;
            info!("Game started at tick {}", self.start_tick);
        }
    }

    fn win(&mut self) {
        self.status = GameStatus::Won;
        self.flags += self.grid.flag_all_unrevealed();
        info!("Game won after {}s", self.elapsed_seconds);
        self.observer.on_win();
    }

    fn lose(&mut self, pos: Pos) {
        self.status = GameStatus::Lost;
        let revealed = self.grid.reveal_all_mines();
        warn!(
            "Player hit mine at ({}, {}) - game over, revealed {} more mines",
            pos.row, pos.column, revealed
        );
        self.observer.on_lose();
    }
}
