//! Minesweeper Rules Engine
//!
//! This crate owns everything about a minesweeper game that is not
//! presentation: the grid, mine placement, the cascading reveal, flags,
//! win/loss detection and a clock fed by the host.
//!
//! ## Usage
//!
//! ```rust
//! use minesweeper_engine::{GameStatus, Pos, RevealOutcome, Session};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Mines at fixed positions make the game reproducible.
//!     let mut game = Session::with_mines(2, 2, &[Pos::new(0, 0)])?
//!         .with_callbacks(|| println!("You win!"), || println!("Try again"));
//!
//!     game.tick(1_000);
//!     assert_eq!(game.open(Pos::new(1, 1)), RevealOutcome::Opened(1));
//!     game.toggle_flag(Pos::new(0, 0));
//!     game.open(Pos::new(0, 1));
//!     game.open(Pos::new(1, 0));
//!
//!     assert_eq!(game.status(), GameStatus::Won);
//!     println!("{}", game.grid());
//!     Ok(())
//! }
//! ```
//!
//! Hosts that drive games from several threads can keep them in a
//! [`host::SessionTable`], which puts each session behind its own lock.

pub mod cleanup;
pub mod config;
pub mod data;
pub mod error;
pub mod host;
pub mod logic;

pub use data::{Cell, CellState, Grid, RevealOutcome};
pub use error::{ConfigError, Result};
pub use logic::{Callbacks, GameObserver, MAX_CELLS, Session, neighbors};

// Re-export common types for convenience
pub use minesweeper_common::{models::*, protocol::*};
