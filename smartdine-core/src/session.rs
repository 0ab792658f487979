//! Search lifecycle state machine.
//!
//! A [`SearchSession`] owns the one piece of mutable state a front-end has:
//! the city list, the current query and the outcome of the latest search.
//! Searches move it through `Idle -> Loading -> Success | Error`, and the
//! terminal phases can start another search.
//!
//! Starting a search is synchronous. [`SearchSession::begin_search`] flips
//! the phase to `Loading` and hands back a [`PendingSearch`] ticket; the
//! caller runs it and feeds the [`CompletedSearch`] back through
//! [`SearchSession::resolve`]. While a ticket is outstanding new searches
//! are ignored, so at most one request is ever in flight.

use crate::config::ClientConfig;
use crate::error::RecommendError;
use crate::http::HttpClient;
use crate::recommend::{fetch_cities, fetch_recommendation};
use crate::types::{Mood, Recommendation, SearchOutcome, SearchRequest, WeatherInfo};
use crate::view::ViewState;

/// Shown when the city list cannot be fetched.
pub const CITIES_UNAVAILABLE_MESSAGE: &str = "Unable to load cities.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable search state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub phase: Phase,
    pub results: Vec<Recommendation>,
    pub weather: Option<WeatherInfo>,
    pub mood: Option<Mood>,
    /// Empty when there is nothing to report.
    pub error_message: String,
    /// Set by the first search and never cleared.
    pub has_searched: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            results: Vec::new(),
            weather: None,
            mood: None,
            error_message: String::new(),
            has_searched: false,
        }
    }
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// A finished search that matched nothing, as opposed to one that failed.
    pub fn is_no_matches(&self) -> bool {
        self.has_searched && self.results.is_empty() && self.error_message.is_empty()
    }

    /// The single block the page body should render.
    pub fn view(&self) -> ViewState<'_> {
        if self.is_loading() {
            ViewState::Loading
        } else if !self.error_message.is_empty() {
            ViewState::Error(&self.error_message)
        } else if self.is_no_matches() {
            ViewState::NoMatches
        } else if !self.has_searched {
            ViewState::Prompt
        } else {
            ViewState::Results(&self.results)
        }
    }
}

/// Ticket for a search that has entered `Loading` but not settled.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    ticket: u64,
    request: SearchRequest,
}

impl PendingSearch {
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Issue the request. Never fails; errors come back as a failure outcome.
    pub async fn run(&self, client: &dyn HttpClient, config: &ClientConfig) -> CompletedSearch {
        let outcome = fetch_recommendation(client, config, &self.request).await;
        self.complete(outcome)
    }

    /// Pair an outcome obtained elsewhere with this ticket.
    pub fn complete(&self, outcome: SearchOutcome) -> CompletedSearch {
        CompletedSearch {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// A settled search, ready to be applied with [`SearchSession::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSearch {
    ticket: u64,
    pub outcome: SearchOutcome,
}

/// Front-end session: city selection, query text and search state.
#[derive(Debug, Default)]
pub struct SearchSession {
    state: SearchState,
    cities: Vec<String>,
    city: String,
    query: String,
    session_id: Option<String>,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a backend session id to every request this session sends.
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Currently selected city, empty until a city list loads.
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Apply the result of fetching the city list.
    ///
    /// Success selects the first city. Failure leaves the list empty and
    /// reports a fixed message without blocking searches.
    pub fn load_cities(&mut self, result: Result<Vec<String>, RecommendError>) {
        match result {
            Ok(cities) => {
                self.city = cities.first().cloned().unwrap_or_default();
                self.cities = cities;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load cities");
                self.cities.clear();
                self.state.error_message = CITIES_UNAVAILABLE_MESSAGE.to_string();
            }
        }
    }

    /// Fetch and apply the city list.
    pub async fn init_cities(&mut self, client: &dyn HttpClient, config: &ClientConfig) {
        let result = fetch_cities(client, config).await;
        self.load_cities(result);
    }

    /// Start a search with the current query and city.
    ///
    /// Returns `None` without touching any state while another search is
    /// loading.
    pub fn begin_search(&mut self, surprise: bool) -> Option<PendingSearch> {
        if self.state.is_loading() {
            tracing::debug!("search already in flight, ignoring trigger");
            return None;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(ticket);

        self.state.phase = Phase::Loading;
        self.state.error_message.clear();
        self.state.results.clear();
        self.state.weather = None;
        self.state.mood = None;
        self.state.has_searched = true;

        let request = SearchRequest::new(self.query.clone(), &self.city, surprise)
            .with_session_id(self.session_id.clone());

        tracing::debug!(ticket, city = %request.city, surprise, "search started");
        Some(PendingSearch { ticket, request })
    }

    /// Apply a settled search. Returns false, changing nothing, when the
    /// completion does not belong to the search currently loading.
    pub fn resolve(&mut self, completed: CompletedSearch) -> bool {
        if !self.state.is_loading() || self.in_flight != Some(completed.ticket) {
            tracing::debug!(ticket = completed.ticket, "ignoring stale search result");
            return false;
        }
        self.in_flight = None;

        match completed.outcome {
            SearchOutcome::Success {
                results,
                weather,
                mood,
            } => {
                tracing::debug!(ticket = completed.ticket, results = results.len(), "search succeeded");
                self.state.phase = Phase::Success;
                self.state.results = results;
                self.state.weather = weather;
                self.state.mood = mood;
            }
            SearchOutcome::Failure { message } => {
                tracing::debug!(ticket = completed.ticket, %message, "search failed");
                self.state.phase = Phase::Error;
                self.state.results.clear();
                self.state.error_message = message;
            }
        }
        true
    }

    /// Run one full search lifecycle. Returns false if the trigger was
    /// ignored because a search was already loading.
    pub async fn run_search(
        &mut self,
        client: &dyn HttpClient,
        config: &ClientConfig,
        surprise: bool,
    ) -> bool {
        let Some(pending) = self.begin_search(surprise) else {
            return false;
        };
        let completed = pending.run(client, config).await;
        self.resolve(completed)
    }

    /// "Based on current rainy weather in pune", shown only next to results.
    pub fn weather_banner(&self) -> Option<String> {
        let weather = self.state.weather.as_ref()?;
        if self.state.results.is_empty() {
            return None;
        }
        Some(format!(
            "Based on current {} weather in {}",
            weather.category, self.city
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(name: &str) -> Recommendation {
        serde_json::from_value(serde_json::json!({
            "Item_Name": name,
            "Restaurant_Name": "Corner Cafe",
            "Average_Rating": 4.1,
            "explanation": "Tasty.",
            "Is_Bestseller": 0,
            "Is_Expensive": 1
        }))
        .unwrap()
    }

    fn success(results: Vec<Recommendation>) -> SearchOutcome {
        SearchOutcome::Success {
            results,
            weather: Some(WeatherInfo::new("cloudy")),
            mood: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let session = SearchSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.state().has_searched);
        assert_eq!(session.state().view(), ViewState::Prompt);
    }

    #[test]
    fn test_begin_search_enters_loading_synchronously() {
        let mut session = SearchSession::new();
        session.load_cities(Ok(vec!["Pune".to_string(), "delhi".to_string()]));
        session.set_query("biryani");

        let pending = session.begin_search(false).unwrap();
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.state().has_searched);
        assert_eq!(session.state().view(), ViewState::Loading);
        assert_eq!(pending.request().query, "biryani");
        assert_eq!(pending.request().city, "pune");
        assert!(!pending.request().surprise);
    }

    #[test]
    fn test_mood_is_stored_then_cleared_by_next_search() {
        let mut session = SearchSession::new();
        let pending = session.begin_search(true).unwrap();
        session.resolve(pending.complete(SearchOutcome::Success {
            results: vec![dish("Dal Makhani")],
            weather: None,
            mood: Some(Mood {
                label: "comfort".to_string(),
                score: Some(0.74),
            }),
        }));
        let mood = session.state().mood.as_ref().unwrap();
        assert_eq!(mood.label, "comfort");
        assert_eq!(mood.score, Some(0.74));

        session.begin_search(false).unwrap();
        assert!(session.state().mood.is_none());
    }

    #[test]
    fn test_second_trigger_while_loading_is_ignored() {
        let mut session = SearchSession::new();
        let first = session.begin_search(false).unwrap();

        assert!(session.begin_search(true).is_none());
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.state().has_searched);

        assert!(session.resolve(first.complete(success(vec![dish("Idli")]))));
        assert_eq!(session.phase(), Phase::Success);
    }

    #[test]
    fn test_success_stores_results_and_weather() {
        let mut session = SearchSession::new();
        session.select_city("goa");
        let pending = session.begin_search(false).unwrap();
        session.resolve(pending.complete(success(vec![dish("Fish Thali")])));

        let state = session.state();
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.weather.as_ref().unwrap().category, "cloudy");
        assert_eq!(
            session.weather_banner().as_deref(),
            Some("Based on current cloudy weather in goa")
        );
        assert!(matches!(state.view(), ViewState::Results(r) if r.len() == 1));
    }

    #[test]
    fn test_empty_results_is_no_matches() {
        let mut session = SearchSession::new();
        let pending = session.begin_search(false).unwrap();
        session.resolve(pending.complete(success(vec![])));

        assert_eq!(session.phase(), Phase::Success);
        assert!(session.state().is_no_matches());
        assert_eq!(session.state().view(), ViewState::NoMatches);
        assert_eq!(session.weather_banner(), None);
    }

    #[test]
    fn test_failure_clears_results() {
        let mut session = SearchSession::new();
        let pending = session.begin_search(false).unwrap();
        session.resolve(pending.complete(SearchOutcome::failure("city not supported")));

        let state = session.state();
        assert_eq!(state.phase, Phase::Error);
        assert!(state.results.is_empty());
        assert!(!state.is_no_matches());
        assert_eq!(state.view(), ViewState::Error("city not supported"));
    }

    #[test]
    fn test_late_completion_does_not_overwrite() {
        let mut session = SearchSession::new();
        let pending = session.begin_search(false).unwrap();

        assert!(session.resolve(pending.complete(SearchOutcome::failure("timed out"))));
        assert!(!session.resolve(pending.complete(success(vec![dish("Late")]))));

        assert_eq!(session.phase(), Phase::Error);
        assert!(session.state().results.is_empty());
        assert_eq!(session.state().error_message, "timed out");
    }

    #[test]
    fn test_stale_ticket_ignored_after_rearm() {
        let mut session = SearchSession::new();
        let old = session.begin_search(false).unwrap();
        session.resolve(old.complete(SearchOutcome::failure("nope")));

        let _current = session.begin_search(false).unwrap();
        assert!(!session.resolve(old.complete(success(vec![dish("Stale")]))));
        assert_eq!(session.phase(), Phase::Loading);
    }

    #[test]
    fn test_rearm_clears_previous_error_and_results() {
        let mut session = SearchSession::new();
        let pending = session.begin_search(false).unwrap();
        session.resolve(pending.complete(success(vec![dish("Poha")])));

        let _pending = session.begin_search(true).unwrap();
        assert!(session.state().results.is_empty());
        assert!(session.state().weather.is_none());

        let mut session = SearchSession::new();
        let pending = session.begin_search(false).unwrap();
        session.resolve(pending.complete(SearchOutcome::failure("boom")));
        let _pending = session.begin_search(false).unwrap();
        assert!(session.state().error_message.is_empty());
        assert!(session.state().has_searched);
    }

    #[test]
    fn test_city_load_failure() {
        let mut session = SearchSession::new();
        session.load_cities(Err(RecommendError::Timeout));

        assert!(session.cities().is_empty());
        assert_eq!(session.city(), "");
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(
            session.state().view(),
            ViewState::Error(CITIES_UNAVAILABLE_MESSAGE)
        );

        // A search is still possible and clears the message.
        let _pending = session.begin_search(true).unwrap();
        assert!(session.state().error_message.is_empty());
    }

    #[test]
    fn test_city_load_selects_first() {
        let mut session = SearchSession::new();
        session.load_cities(Ok(vec!["bangalore".to_string(), "chennai".to_string()]));
        assert_eq!(session.city(), "bangalore");
        assert_eq!(session.cities().len(), 2);

        session.load_cities(Ok(vec![]));
        assert_eq!(session.city(), "");
    }

    #[test]
    fn test_session_id_is_forwarded() {
        let mut session = SearchSession::new().with_session_id(Some("s-42".to_string()));
        let pending = session.begin_search(false).unwrap();
        assert_eq!(pending.request().session_id.as_deref(), Some("s-42"));
    }
}
