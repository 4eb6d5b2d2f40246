//! Server network layer handling HTTP requests and session expiry

use crate::game::{self, GameError, GameView, GuessResponse};
use crate::page;
use crate::session_store::SessionStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::{Form, FormRejection};
use log::{debug, error, info};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "guess_session";

/// How often idle sessions are swept from the store
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<SessionStore>>,
}

/// Body of `POST /guess`
///
/// Browsers send one `guess` field, but hand-crafted requests may repeat it;
/// every value is collected and only the first one counts.
#[derive(Debug, Default, Deserialize)]
pub struct GuessForm {
    #[serde(default)]
    pub guess: Vec<String>,
}

impl GuessForm {
    /// Returns the first submitted guess, or an empty string when none was sent
    pub fn first_guess(&self) -> &str {
        self.guess.first().map(String::as_str).unwrap_or("")
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        match self {
            GameError::StoreFull => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
            }
            GameError::UnknownSession(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn with_session_cookie(jar: CookieJar, id: Uuid) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

fn render_page(view: &GameView) -> Response {
    match page::render(view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET / - show the current game
async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Response, GameError> {
    let (id, view) = {
        let mut store = state.store.write().await;
        game::view(&mut store, session_id(&jar))?
    };

    Ok((with_session_cookie(jar, id), render_page(&view)).into_response())
}

/// POST /guess - submit one guess
///
/// A body that cannot be read as a form counts as an empty guess, so the
/// player gets the usual warning instead of a bare error status.
async fn submit_guess(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<GuessForm>, FormRejection>,
) -> Result<Response, GameError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            debug!("Unreadable guess form: {}", e);
            GuessForm::default()
        }
    };

    let (id, response) = {
        let mut store = state.store.write().await;
        game::guess(&mut store, session_id(&jar), form.first_guess())?
    };

    let jar = with_session_cookie(jar, id);
    match response {
        GuessResponse::Render(view) => Ok((jar, render_page(&view)).into_response()),
        GuessResponse::AlreadyFinished => {
            debug!("Session {} guessed after the game ended", id);
            Ok((jar, Redirect::to("/")).into_response())
        }
    }
}

/// POST /reset - start over with a new secret
async fn reset_game(State(state): State<AppState>, jar: CookieJar) -> Result<Response, GameError> {
    let id = {
        let mut store = state.store.write().await;
        game::reset(&mut store, session_id(&jar))?
    };

    Ok((with_session_cookie(jar, id), Redirect::to("/")).into_response())
}

/// Builds the router serving the three game routes
pub fn router(store: Arc<RwLock<SessionStore>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/guess", post(submit_guess))
        .route("/reset", post(reset_game))
        .with_state(AppState { store })
}

/// HTTP server owning the listener and the session store
pub struct Server {
    listener: TcpListener,
    store: Arc<RwLock<SessionStore>>,
    sweep_interval: Duration,
}

impl Server {
    pub async fn new(addr: &str, store: SessionStore) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            store: Arc::new(RwLock::new(store)),
            sweep_interval: SWEEP_INTERVAL,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Spawns task that periodically removes idle sessions
    fn spawn_timeout_checker(&self) {
        let store = Arc::clone(&self.store);
        let sweep_interval = self.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);

            loop {
                interval.tick().await;

                let (expired, live) = {
                    let mut store = store.write().await;
                    let expired = store.check_timeouts();
                    (expired.len(), store.len())
                };

                if expired > 0 {
                    info!("Expired {} idle sessions, {} still active", expired, live);
                }
            }
        });
    }

    /// Serves requests until Ctrl+C
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_timeout_checker();

        let app = router(Arc::clone(&self.store));
        info!("Server started successfully");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Server shutting down");
            })
            .await?;

        Ok(())
    }
}
