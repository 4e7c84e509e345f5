//! A table of live sessions for hosts that touch games from several threads.
//!
//! The engine itself is single-threaded; here every session sits behind its own
//! exclusive async lock so calls into one game never interleave.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::{DashMap, Entry};
use minesweeper_common::models::{GameParams, Pos};
use nanoid::nanoid;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::{data::RevealOutcome, error::Result, logic::Session};

/// A session plus the bookkeeping the host needs to expire it.
#[derive(Debug)]
pub struct HostedSession {
    session: Session,
    last_activity: Instant,
}

impl HostedSession {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            last_activity: Instant::now(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn open(&mut self, pos: Pos) -> RevealOutcome {
        self.last_activity = Instant::now();
        self.session.open(pos)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Option<bool> {
        self.last_activity = Instant::now();
        self.session.toggle_flag(pos)
    }

    /// Clock samples are not player activity and do not keep a game alive.
    pub fn tick(&mut self, now_millis: u64) {
        self.session.tick(now_millis)
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn should_cleanup(&self, inactive_timeout: Duration) -> bool {
        self.idle_for() >= inactive_timeout
    }
}

pub type SessionHandle = Arc<Mutex<HostedSession>>;

#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: Arc<DashMap<String, SessionHandle>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a random game and stores it under a fresh id.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&self, params: GameParams) -> Result<String> {
        let session = Session::new(params)?;
        Ok(self.insert(session))
    }

    /// Stores an already-built session under a fresh id.
    ///
    /// Ids start five characters long and grow by one after ten collisions in
    /// a row.
    pub fn insert(&self, session: Session) -> String {
        let mut id_length = 5;
        let max_attempts_per_length = 10;
        let handle = Arc::new(Mutex::new(HostedSession::new(session)));

        loop {
            for _ in 0..max_attempts_per_length {
                let id = nanoid!(id_length);
                match self.sessions.entry(id.clone()) {
                    Entry::Occupied(_) => continue,
                    Entry::Vacant(entry) => {
                        entry.insert(handle);
                        info!("Hosting game {}, {} live games", id, self.sessions.len());
                        return id;
                    }
                }
            }

            id_length += 1;
        }
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Swaps the game under `id` for a brand new one.
    ///
    /// The new session is built before anything is touched, so a bad
    /// configuration leaves the old game in place. Returns `Ok(false)` when no
    /// game has that id.
    #[instrument(level = "trace", skip(self))]
    pub async fn restart(&self, id: &str, params: GameParams) -> Result<bool> {
        let session = Session::new(params)?;
        let Some(handle) = self.get(id) else {
            debug!("Restart requested for unknown game {}", id);
            return Ok(false);
        };

        let mut hosted = handle.lock().await;
        *hosted = HostedSession::new(session);
        info!(
            "Restarted game {}: {}x{} with {} mines",
            id, params.rows, params.columns, params.mines
        );
        Ok(true)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub(crate) fn sessions(&self) -> &DashMap<String, SessionHandle> {
        &self.sessions
    }
}
