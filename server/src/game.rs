//! Game handler operations: view, guess and reset
//!
//! Each operation takes the session store by mutable reference, resolves the
//! caller's token into a live session and returns the token to hand back along
//! with what should be shown. Nothing here awaits, so callers can run these
//! while holding the store lock and release it before rendering.

use crate::session_store::SessionStore;
use log::{debug, warn};
use shared::{AlertLevel, GameRules, GameSession};
use uuid::Uuid;

/// Failures that stop a game operation from producing a page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The store is at capacity and cannot start another session
    #[error("Server full")]
    StoreFull,
    /// A token resolved a moment ago is no longer in the store
    #[error("Session {0} not found")]
    UnknownSession(Uuid),
}

/// Feedback shown above the form after a guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub level: AlertLevel,
}

/// Everything the page needs to draw one game
///
/// Built from a session snapshot, so rendering never needs the store lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    /// Lowest possible secret
    pub min: i64,
    /// Highest possible secret
    pub max: i64,
    /// Guesses left before the game is lost
    pub remaining: u32,
    /// Valid guesses so far, oldest first
    pub history: Vec<i64>,
    /// True once the secret was found or the attempts ran out
    pub finished: bool,
    /// Only revealed once the game is over
    pub secret: Option<i64>,
    /// Feedback for the request that produced this view, if any
    pub alert: Option<Alert>,
}

impl GameView {
    fn new(game: &GameSession, rules: &GameRules, alert: Option<Alert>) -> Self {
        Self {
            min: rules.min,
            max: rules.max,
            remaining: game.remaining(rules),
            history: game.history.clone(),
            finished: game.finished,
            secret: game.finished.then_some(game.secret),
            alert,
        }
    }
}

/// What a guess request should answer with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessResponse {
    /// Show the page with the guess feedback
    Render(GameView),
    /// The game already ended; the client should go back to the main page
    AlreadyFinished,
}

fn live_session(store: &mut SessionStore, id: Option<Uuid>) -> Result<Uuid, GameError> {
    store.ensure_session(id).ok_or_else(|| {
        warn!("Session store full, refusing new session");
        GameError::StoreFull
    })
}

/// Shows the current game without changing it
pub fn view(store: &mut SessionStore, id: Option<Uuid>) -> Result<(Uuid, GameView), GameError> {
    let id = live_session(store, id)?;
    let rules = *store.rules();
    let session = store.get(&id).ok_or(GameError::UnknownSession(id))?;
    Ok((id, GameView::new(&session.game, &rules, None)))
}

/// Applies one guess to the caller's game
pub fn guess(
    store: &mut SessionStore,
    id: Option<Uuid>,
    input: &str,
) -> Result<(Uuid, GuessResponse), GameError> {
    let id = live_session(store, id)?;
    let rules = *store.rules();

    let Some(session) = store.get_mut(&id) else {
        return Err(GameError::UnknownSession(id));
    };
    if session.game.finished {
        return Ok((id, GuessResponse::AlreadyFinished));
    }

    let alert = match session.game.guess(input, &rules) {
        Ok(outcome) => {
            debug!("Session {}: guess {:?} -> {:?}", id, input.trim(), outcome);
            Alert {
                message: outcome.to_string(),
                level: outcome.alert(),
            }
        }
        Err(e) => {
            debug!("Session {}: rejected guess {:?}: {}", id, input, e);
            Alert {
                message: e.to_string(),
                level: e.alert(),
            }
        }
    };

    let view = GameView::new(&session.game, &rules, Some(alert));
    Ok((id, GuessResponse::Render(view)))
}

/// Throws away the caller's game and starts a new one
pub fn reset(store: &mut SessionStore, id: Option<Uuid>) -> Result<Uuid, GameError> {
    store.reset_session(id).ok_or_else(|| {
        warn!("Session store full, refusing reset");
        GameError::StoreFull
    })
}
