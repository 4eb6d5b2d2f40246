use clap::Parser;
use log::info;
use server::network::Server;
use server::session_store::{SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TIMEOUT};
use shared::{GameRules, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Lowest number the secret can be
    #[arg(long, default_value_t = MIN_NUMBER, allow_negative_numbers = true)]
    min: i64,

    /// Highest number the secret can be
    #[arg(long, default_value_t = MAX_NUMBER, allow_negative_numbers = true)]
    max: i64,

    /// Guesses allowed per game
    #[arg(short = 'a', long, default_value_t = MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Seconds of inactivity before a session is dropped
    #[arg(long, default_value_t = DEFAULT_SESSION_TIMEOUT.as_secs())]
    session_timeout_secs: u64,

    /// Maximum number of concurrent sessions
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    max_sessions: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let rules = GameRules::new(args.min, args.max, args.max_attempts)?;

    info!("Starting server...");
    info!(
        "Numbers {}..={}, {} attempts per game",
        rules.min, rules.max, rules.max_attempts
    );

    let store = SessionStore::new(
        rules,
        args.max_sessions,
        Duration::from_secs(args.session_timeout_secs),
    );

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::new(&address, store).await?;
    info!("Open http://{} in a browser to play", server.local_addr()?);

    server.run().await?;

    Ok(())
}
