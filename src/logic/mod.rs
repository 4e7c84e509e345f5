mod grid;
mod session;

pub use grid::{MAX_CELLS, neighbors};
pub use session::{Callbacks, GameObserver, Session};
