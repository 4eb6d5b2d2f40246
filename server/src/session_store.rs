//! Server-side storage for per-player game sessions
//!
//! This module handles the lifecycle of player sessions, including:
//! - Session creation with a freshly drawn secret
//! - Token lookup and activity tracking
//! - Idle expiry and automatic cleanup
//! - Capacity management
//!
//! Sessions are keyed by a random token the browser keeps in a cookie. The
//! store owns the random generator used to draw secrets so tests can seed it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{GameRules, GameSession};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Idle time after which a session is swept
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// Live sessions allowed before new players are turned away
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// A stored game together with its bookkeeping
#[derive(Debug)]
pub struct Session {
    /// Token handed to the browser
    pub id: Uuid,
    /// Current game for this player
    pub game: GameSession,
    /// Last time any request touched this session
    pub last_seen: Instant,
}

impl Session {
    /// Wraps a game under the given token
    ///
    /// The session starts out as recently active, so a freshly created
    /// session survives at least one full timeout period.
    pub fn new(id: Uuid, game: GameSession) -> Self {
        Self {
            id,
            game,
            last_seen: Instant::now(),
        }
    }

    /// Marks the session as active right now
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Returns true if the session has been idle longer than `timeout`
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Holds every live session and the rules they are played under
///
/// The store enforces a capacity limit so an unbounded stream of cookie-less
/// requests cannot grow memory without bound; idle sessions are reclaimed by
/// [`SessionStore::check_timeouts`].
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    rules: GameRules,
    max_sessions: usize,
    timeout: Duration,
    rng: StdRng,
}

impl SessionStore {
    /// Creates an empty store with an entropy-seeded generator
    ///
    /// Every game in the store is played under `rules`. At most
    /// `max_sessions` sessions live at once, and sessions idle longer than
    /// `timeout` are dropped on the next sweep.
    pub fn new(rules: GameRules, max_sessions: usize, timeout: Duration) -> Self {
        Self::with_rng(rules, max_sessions, timeout, StdRng::from_entropy())
    }

    /// Creates a store drawing secrets from the given generator
    pub fn with_rng(rules: GameRules, max_sessions: usize, timeout: Duration, rng: StdRng) -> Self {
        Self {
            sessions: HashMap::new(),
            rules,
            max_sessions,
            timeout,
            rng,
        }
    }

    /// Returns the rules every game in this store is played under
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Returns the idle time after which sessions expire
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts a new game under a new token
    ///
    /// Returns None if the store is at capacity.
    pub fn create_session(&mut self) -> Option<Uuid> {
        if self.sessions.len() >= self.max_sessions {
            return None;
        }

        let id = Uuid::new_v4();
        let game = GameSession::start(&self.rules, &mut self.rng);
        info!("Session {} started", id);
        self.sessions.insert(id, Session::new(id, game));

        Some(id)
    }

    /// Returns the token of a live session, creating one if `id` is unknown
    pub fn ensure_session(&mut self, id: Option<Uuid>) -> Option<Uuid> {
        if let Some(session) = id.and_then(|id| self.sessions.get_mut(&id)) {
            session.touch();
            return Some(session.id);
        }

        self.create_session()
    }

    /// Replaces the game behind `id` with a fresh one
    ///
    /// The token is kept when the session still exists; otherwise a new
    /// session is created.
    pub fn reset_session(&mut self, id: Option<Uuid>) -> Option<Uuid> {
        if let Some(session) = id.and_then(|id| self.sessions.get_mut(&id)) {
            session.game = GameSession::start(&self.rules, &mut self.rng);
            session.touch();
            info!("Session {} reset", session.id);
            return Some(session.id);
        }

        self.create_session()
    }

    /// Looks up a session without refreshing its activity
    ///
    /// Returns None if the token is unknown or has already expired.
    pub fn get(&self, id: &Uuid) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Looks up a session for mutation and marks it as active
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Session> {
        let session = self.sessions.get_mut(id)?;
        session.touch();
        Some(session)
    }

    /// Removes a session from the store
    ///
    /// Returns true if the session was found and removed, false if it was
    /// already gone. Used by the expiry sweep.
    pub fn remove_session(&mut self, id: &Uuid) -> bool {
        if self.sessions.remove(id).is_some() {
            info!("Session {} removed", id);
            true
        } else {
            false
        }
    }

    /// Removes sessions idle longer than the configured timeout
    ///
    /// Returns the removed tokens.
    pub fn check_timeouts(&mut self) -> Vec<Uuid> {
        let timeout = self.timeout;
        let timed_out: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.is_timed_out(timeout))
            .map(|(id, _)| *id)
            .collect();

        for id in &timed_out {
            debug!("Session {} expired", id);
            self.remove_session(id);
        }

        timed_out
    }

    /// Returns the number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
