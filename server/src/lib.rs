//! # Number Guessing Server Library
//!
//! This library provides the server for a browser-based number guessing game.
//! The server draws a secret number for each player, accepts guesses through
//! an HTML form and answers with a hint until the player either finds the
//! number or runs out of attempts.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Game State
//! The secret never leaves the server until the game is over. Clients only
//! hold an opaque session token in a cookie; every rule decision is made here.
//!
//! ### Session Management
//! Handles the lifecycle of player sessions:
//! - Session creation on first visit or reset
//! - Activity tracking on every request
//! - Idle expiry and cleanup
//! - A capacity limit on live sessions
//!
//! ## Module Organization
//!
//! ### Session Store Module (`session_store`)
//! Token-keyed storage of [`shared::GameSession`] values, with idle expiry and
//! the random generator secrets are drawn from.
//!
//! ### Game Module (`game`)
//! The three game operations, `view`, `guess` and `reset`, expressed over the
//! session store. These are synchronous and never await.
//!
//! ### Page Module (`page`)
//! Renders a [`game::GameView`] into the single HTML page.
//!
//! ### Network Module (`network`)
//! The HTTP layer:
//! - `GET /` renders the current game
//! - `POST /guess` submits the `guess` form field
//! - `POST /reset` starts a new game
//! - A background task sweeps idle sessions
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use server::session_store::SessionStore;
//! use shared::GameRules;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SessionStore::new(GameRules::default(), 10_000, Duration::from_secs(1800));
//!     let server = Server::new("127.0.0.1:5000", store).await?;
//!
//!     // Serves the game until Ctrl+C
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Requests run on the tokio runtime and share one store behind an async
//! read-write lock. Handlers take the lock, run one game operation and drop
//! the guard before rendering, so no guard is held across an await point.

pub mod game;
pub mod network;
pub mod page;
pub mod session_store;
