//! Calls against the SmartDine backend.
//!
//! [`fetch_recommendation`] is the only entry point the search state machine
//! uses. It never returns an error: every failure is folded into
//! [`SearchOutcome::Failure`] carrying the text the user should see.

use crate::config::ClientConfig;
use crate::error::{FetchError, RecommendError, GENERIC_FAILURE_MESSAGE};
use crate::http::{HttpClient, HttpResponse};
use crate::types::{
    CitiesResponse, ErrorBody, HealthStatus, RecommendResponse, SearchOutcome, SearchRequest,
};

/// Request recommendations and collapse the result into a [`SearchOutcome`].
pub async fn fetch_recommendation(
    client: &dyn HttpClient,
    config: &ClientConfig,
    request: &SearchRequest,
) -> SearchOutcome {
    match try_fetch_recommendation(client, config, request).await {
        Ok(body) => body.into(),
        Err(err) => {
            tracing::warn!(
                city = %request.city,
                surprise = request.surprise,
                status = ?err.status(),
                error = %err,
                "recommendation failed"
            );
            SearchOutcome::failure(err.to_string())
        }
    }
}

/// Same call as [`fetch_recommendation`], keeping the error classification.
///
/// The transport future races the configured deadline. Whichever settles
/// first wins and the other is dropped, which cancels the in-flight request
/// on expiry and disarms the timer on completion.
pub async fn try_fetch_recommendation(
    client: &dyn HttpClient,
    config: &ClientConfig,
    request: &SearchRequest,
) -> Result<RecommendResponse, RecommendError> {
    let url = config
        .endpoint("recommend")
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    let mut request = request.clone();
    request.city = request.city.to_lowercase();
    let body = serde_json::to_value(&request)?;

    tracing::debug!(
        city = %request.city,
        surprise = request.surprise,
        query_len = request.query.len(),
        "requesting recommendations"
    );

    let response = tokio::time::timeout(config.timeout, client.post_json(&url, &body))
        .await
        .map_err(|_| RecommendError::Timeout)??;

    if !response.is_success() {
        return Err(status_failure(&response));
    }

    let parsed: RecommendResponse = serde_json::from_str(&response.body)?;
    tracing::debug!(
        status = response.status,
        results = parsed.results.as_ref().map_or(0, Vec::len),
        "recommendations received"
    );
    Ok(parsed)
}

/// Fetch the list of supported cities, bounded by the configured deadline.
pub async fn fetch_cities(
    client: &dyn HttpClient,
    config: &ClientConfig,
) -> Result<Vec<String>, RecommendError> {
    let url = config
        .endpoint("cities")
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    let response = tokio::time::timeout(config.timeout, client.get(&url))
        .await
        .map_err(|_| RecommendError::Timeout)??;
    if !response.is_success() {
        return Err(status_failure(&response));
    }

    let body: CitiesResponse = serde_json::from_str(&response.body)?;
    let cities = body.cities.unwrap_or_default();
    tracing::info!(count = cities.len(), "loaded cities");
    Ok(cities)
}

/// Ask the backend whether it is up.
pub async fn fetch_health(
    client: &dyn HttpClient,
    config: &ClientConfig,
) -> Result<HealthStatus, RecommendError> {
    let url = config
        .endpoint("health")
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    let response = tokio::time::timeout(config.timeout, client.get(&url))
        .await
        .map_err(|_| RecommendError::Timeout)??;
    if !response.is_success() {
        return Err(status_failure(&response));
    }

    Ok(serde_json::from_str(&response.body)?)
}

/// Pull a readable reason out of a non-2xx response.
///
/// JSON bodies contribute `message` or `error`; anything else falls back to
/// the raw text as sent, then to the generic message when it is blank.
fn status_failure(response: &HttpResponse) -> RecommendError {
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => body.reason().map(str::to_string),
        Err(_) => Some(response.body.clone()).filter(|s| !s.trim().is_empty()),
    };

    RecommendError::HttpStatus {
        status: response.status,
        message: message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
    }
}
