//! Shared types for the minesweeper engine.
//!
//! Everything in here is plain data: positions, game parameters and the views
//! a render collaborator reads. The rules live in `minesweeper-engine`.

pub mod models;
pub mod protocol;
