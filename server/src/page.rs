//! HTML rendering of a game view

use crate::game::GameView;
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    min: i64,
    max: i64,
    remaining: u32,
    message: &'a str,
    alert_level: &'static str,
    finished: bool,
    secret: i64,
    history: String,
}

fn format_history(history: &[i64]) -> String {
    if history.is_empty() {
        return "none yet".to_string();
    }

    history
        .iter()
        .map(|guess| guess.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render(view: &GameView) -> Result<String, askama::Error> {
    let (message, alert_level) = match &view.alert {
        Some(alert) => (alert.message.as_str(), alert.level.as_str()),
        None => ("", "info"),
    };

    IndexPage {
        min: view.min,
        max: view.max,
        remaining: view.remaining,
        message,
        alert_level,
        finished: view.finished,
        secret: view.secret.unwrap_or_default(),
        history: format_history(&view.history),
    }
    .render()
}
