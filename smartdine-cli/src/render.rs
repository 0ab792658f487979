//! Plain-text rendering of the search view model.

use smartdine_core::view::{
    CardView, ViewState, APP_NAME, LOADING_MESSAGE, NO_MATCHES_MESSAGE, PROMPT_MESSAGE,
};
use smartdine_core::{HealthStatus, Mood, SearchSession};
use std::fmt::Write;

pub fn header() -> String {
    format!("== {} ==", APP_NAME)
}

/// Render the city selector line: the selected city marked, all upper-cased.
pub fn cities(session: &SearchSession) -> String {
    if session.cities().is_empty() {
        return "No cities available.".to_string();
    }
    session
        .cities()
        .iter()
        .map(|c| {
            if c == session.city() {
                format!("[{}]", c.to_uppercase())
            } else {
                c.to_uppercase()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn card(card: &CardView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  [* {} ({})]",
        card.title,
        card.badge.label(),
        card.badge.tier_name()
    );
    let _ = writeln!(out, "  {}", card.restaurant);
    if !card.explanation.is_empty() {
        let _ = writeln!(out, "  \"{}\"", card.explanation);
    }
    if !card.tags.is_empty() {
        let tags: Vec<&str> = card.tags.iter().map(|t| t.label()).collect();
        let _ = writeln!(out, "  {}", tags.join(" | "));
    }
    out
}

/// Detected mood line, with the score when the backend sent one.
pub fn mood(mood: &Mood) -> String {
    match mood.score {
        Some(score) => format!("Mood: {} ({:.2})", mood.label, score),
        None => format!("Mood: {}", mood.label),
    }
}

/// Render the results area for the session's current state.
///
/// A city-list failure shows before any search, so the prompt follows it.
pub fn results(session: &SearchSession) -> String {
    let state = session.state();
    match state.view() {
        ViewState::Loading => LOADING_MESSAGE.to_string(),
        ViewState::Error(message) if !state.has_searched => {
            format!("Error: {}\n{}", message, PROMPT_MESSAGE)
        }
        ViewState::Error(message) => format!("Error: {}", message),
        ViewState::NoMatches => NO_MATCHES_MESSAGE.to_string(),
        ViewState::Prompt => PROMPT_MESSAGE.to_string(),
        ViewState::Results(recs) => {
            let mut out = String::new();
            if let Some(banner) = session.weather_banner() {
                let _ = writeln!(out, "{}\n", banner);
            }
            if let Some(detected) = &state.mood {
                let _ = writeln!(out, "{}\n", mood(detected));
            }
            for rec in recs {
                let _ = writeln!(out, "{}", card(&CardView::new(rec)));
            }
            out.trim_end().to_string()
        }
    }
}

pub fn health(status: &HealthStatus) -> String {
    format!("{} [{}]: {}", status.service, status.status, status.message)
}
