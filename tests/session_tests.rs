//! Session lifecycle, counters, callbacks and clock.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use minesweeper_engine::{
    CellView, ConfigError, Difficulty, GameParams, GameStatus, Pos, RevealOutcome, Session,
};
use rand::{SeedableRng, rngs::StdRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn pos(row: usize, column: usize) -> Pos {
    Pos::new(row, column)
}

#[derive(Clone, Default)]
struct Outcomes {
    wins: Arc<AtomicUsize>,
    losses: Arc<AtomicUsize>,
}

impl Outcomes {
    fn attach(&self, session: Session) -> Session {
        let wins = self.wins.clone();
        let losses = self.losses.clone();
        session.with_callbacks(
            move || {
                wins.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                losses.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    fn wins(&self) -> usize {
        self.wins.load(Ordering::SeqCst)
    }

    fn losses(&self) -> usize {
        self.losses.load(Ordering::SeqCst)
    }
}

/// 2x2 board with a single mine in the top-left corner.
fn small_game(outcomes: &Outcomes) -> Session {
    init_tracing();
    outcomes.attach(Session::with_mines(2, 2, &[pos(0, 0)]).unwrap())
}

#[test]
fn test_new_session_is_not_started() {
    let session = Session::with_mines(3, 4, &[pos(0, 0), pos(2, 3)]).unwrap();

    assert_eq!(session.status(), GameStatus::NotStarted);
    assert_eq!(session.cells_remaining(), 10);
    assert_eq!(session.flag_count(), 0);
    assert_eq!(session.elapsed_seconds(), 0);
    assert_eq!(session.mines_left(), 2);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    assert_eq!(
        Session::new(GameParams::new(3, 3, 9)).unwrap_err(),
        ConfigError::TooManyMines { mines: 9, cells: 9 }
    );
    assert!(matches!(
        Session::new(GameParams::new(0, 3, 0)),
        Err(ConfigError::EmptyGrid { .. })
    ));
    assert!(matches!(
        Session::new(GameParams::new(1_000_000, 1_000_000, 10)),
        Err(ConfigError::GridTooLarge { .. })
    ));
    assert!(Session::new(GameParams::new(1, 1, 0)).is_ok());
}

#[test]
fn test_presets_build_random_sessions() {
    let mut rng = StdRng::seed_from_u64(1);
    for difficulty in Difficulty::ALL {
        let params = difficulty.params();
        let session = Session::with_rng(params, &mut rng).unwrap();
        assert_eq!(session.grid().mine_count(), params.mines);
        assert_eq!(session.cells_remaining(), params.cells() - params.mines);
    }
}

#[test]
fn test_win_after_opening_every_safe_cell() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    assert_eq!(session.open(pos(1, 1)), RevealOutcome::Opened(1));
    assert_eq!(session.status(), GameStatus::Running);
    assert_eq!(session.cells_remaining(), 2);

    session.open(pos(0, 1));
    assert_eq!(session.status(), GameStatus::Running);
    session.open(pos(1, 0));

    assert_eq!(session.cells_remaining(), 0);
    assert_eq!(session.status(), GameStatus::Won);
    assert_eq!(outcomes.wins(), 1);
    assert_eq!(outcomes.losses(), 0);

    // The remaining mine is flagged automatically.
    assert!(session.cell(pos(0, 0)).unwrap().is_flagged());
    assert_eq!(session.flag_count(), 1);
    assert_eq!(session.mines_left(), 0);
}

#[test]
fn test_loss_on_mine() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    assert_eq!(session.open(pos(0, 0)), RevealOutcome::Exploded);
    assert_eq!(session.status(), GameStatus::Lost);
    assert_eq!(outcomes.losses(), 1);
    assert_eq!(outcomes.wins(), 0);
    assert_eq!(session.view(pos(0, 0)), Some(CellView::Bomb));
    assert_eq!(session.cells_remaining(), 3);
}

#[test]
fn test_loss_reveals_every_unflagged_mine() {
    let mut session = Session::with_mines(3, 3, &[pos(0, 0), pos(0, 2), pos(2, 2)]).unwrap();
    session.toggle_flag(pos(0, 2));

    session.open(pos(2, 2));

    assert_eq!(session.status(), GameStatus::Lost);
    assert!(session.cell(pos(0, 0)).unwrap().is_revealed());
    assert!(session.cell(pos(0, 2)).unwrap().is_flagged());
    assert!(!session.cell(pos(1, 1)).unwrap().is_revealed());
}

#[test]
fn test_single_open_can_win_through_cascade() {
    let outcomes = Outcomes::default();
    let mut session = outcomes.attach(Session::with_mines(3, 3, &[pos(2, 2)]).unwrap());

    assert_eq!(session.open(pos(0, 0)), RevealOutcome::Opened(8));
    assert_eq!(session.status(), GameStatus::Won);
    assert_eq!(outcomes.wins(), 1);
}

#[test]
fn test_cascade_from_zero_cell_never_explodes() {
    let mines = [pos(0, 4), pos(3, 0), pos(4, 4)];
    let mut session = Session::with_mines(5, 5, &mines).unwrap();
    assert_eq!(session.cell(pos(1, 1)).unwrap().neighbor_mines(), 0);

    let outcome = session.open(pos(1, 1));

    assert!(matches!(outcome, RevealOutcome::Opened(n) if n > 1));
    assert_ne!(session.status(), GameStatus::Lost);
    for mine in mines {
        assert!(!session.cell(mine).unwrap().is_revealed());
    }
}

#[test]
fn test_open_twice_is_noop() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);
    session.toggle_flag(pos(0, 0));
    session.open(pos(1, 1));
    let remaining = session.cells_remaining();

    assert_eq!(session.open(pos(1, 1)), RevealOutcome::NoOp);
    assert_eq!(session.cells_remaining(), remaining);
    assert_eq!(session.flag_count(), 1);
}

#[test]
fn test_open_on_flagged_cell_is_noop() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);
    session.toggle_flag(pos(0, 0));

    assert_eq!(session.open(pos(0, 0)), RevealOutcome::NoOp);
    assert_eq!(session.status(), GameStatus::Running);
    assert_eq!(outcomes.losses(), 0);
}

#[test]
fn test_out_of_range_calls_are_absorbed() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    assert_eq!(session.open(pos(2, 0)), RevealOutcome::NoOp);
    assert_eq!(session.toggle_flag(pos(0, 7)), None);
    assert_eq!(session.view(pos(9, 9)), None);
    // Stray clicks do not start the game.
    assert_eq!(session.status(), GameStatus::NotStarted);
}

#[test]
fn test_terminal_state_is_immutable() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);
    session.toggle_flag(pos(0, 1));
    session.open(pos(0, 0));
    assert_eq!(session.status(), GameStatus::Lost);

    let before = session.snapshot();
    assert_eq!(session.open(pos(1, 1)), RevealOutcome::NoOp);
    assert_eq!(session.toggle_flag(pos(1, 0)), None);
    assert_eq!(session.toggle_flag(pos(0, 1)), None);
    assert_eq!(session.open(pos(0, 1)), RevealOutcome::NoOp);

    assert_eq!(session.snapshot(), before);
    assert_eq!(outcomes.losses(), 1);
    assert_eq!(outcomes.wins(), 0);
}

#[test]
fn test_flag_toggle_restores_count() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    assert_eq!(session.toggle_flag(pos(1, 0)), Some(true));
    assert_eq!(session.flag_count(), 1);
    assert_eq!(session.toggle_flag(pos(1, 0)), Some(false));
    assert_eq!(session.flag_count(), 0);
}

#[test]
fn test_flag_survives_other_opens() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    session.toggle_flag(pos(0, 1));
    session.open(pos(1, 1));

    assert!(session.cell(pos(0, 1)).unwrap().is_flagged());
    assert_eq!(session.view(pos(0, 1)), Some(CellView::Flagged));
}

#[test]
fn test_flag_on_revealed_cell_is_absorbed() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);
    session.open(pos(1, 1));

    assert_eq!(session.toggle_flag(pos(1, 1)), None);
    assert_eq!(session.flag_count(), 0);
}

#[test]
fn test_flags_may_exceed_mines() {
    let mut session = Session::with_mines(2, 2, &[pos(0, 0)]).unwrap();
    session.toggle_flag(pos(0, 0));
    session.toggle_flag(pos(0, 1));
    session.toggle_flag(pos(1, 0));

    assert_eq!(session.flag_count(), 3);
    assert_eq!(session.mines_left(), 0);
}

#[test]
fn test_ticks_before_first_action_do_not_count() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    session.tick(500);
    session.tick(5_000);
    assert_eq!(session.elapsed_seconds(), 0);

    // The clock starts at the latest sample.
    session.toggle_flag(pos(0, 0));
    session.tick(5_999);
    assert_eq!(session.elapsed_seconds(), 0);
    session.tick(6_000);
    assert_eq!(session.elapsed_seconds(), 1);
    session.tick(17_450);
    assert_eq!(session.elapsed_seconds(), 12);
}

#[test]
fn test_clock_freezes_when_game_ends() {
    let outcomes = Outcomes::default();
    let mut session = small_game(&outcomes);

    session.open(pos(1, 1));
    session.tick(3_200);
    assert_eq!(session.elapsed_seconds(), 3);

    session.open(pos(0, 0));
    session.tick(60_000);
    assert_eq!(session.elapsed_seconds(), 3);
}

#[test]
fn test_clock_ignores_samples_before_start() {
    let mut session = Session::with_mines(2, 2, &[pos(0, 0)]).unwrap();
    session.tick(10_000);
    session.open(pos(1, 1));

    session.tick(4_000);
    assert_eq!(session.elapsed_seconds(), 0);
}

#[test]
fn test_snapshot_serializes_for_renderers() {
    let mut session = Session::with_mines(2, 2, &[pos(0, 0)]).unwrap();
    session.open(pos(1, 1));
    session.toggle_flag(pos(0, 0));
    session.tick(2_500);

    let json = serde_json::to_value(session.snapshot()).unwrap();

    assert_eq!(json["status"], "running");
    assert_eq!(json["flags"], 1);
    assert_eq!(json["mines_left"], 0);
    assert_eq!(json["cells_remaining"], 2);
    assert_eq!(json["elapsed_seconds"], 2);
    assert_eq!(json["field"][0][0], serde_json::json!({"state": "flagged"}));
    assert_eq!(
        json["field"][1][1],
        serde_json::json!({"state": "revealed", "adjacent": 1})
    );
    assert_eq!(json["field"][1][0], serde_json::json!({"state": "hidden"}));
}
