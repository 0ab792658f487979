use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Body of a `POST /recommend` call.
///
/// Built fresh for every search and never mutated after it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub city: String,
    pub surprise: bool,
    /// Key for the backend's per-session memory. Omitted from the body when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl SearchRequest {
    /// Build a request. The city is always lowercased, whatever casing the
    /// selector displayed.
    pub fn new(query: impl Into<String>, city: &str, surprise: bool) -> Self {
        Self {
            query: query.into(),
            city: city.to_lowercase(),
            surprise,
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

/// A single recommended dish as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "Item_Name", default, deserialize_with = "text_or_empty")]
    pub item_name: String,
    #[serde(rename = "Restaurant_Name", default, deserialize_with = "text_or_empty")]
    pub restaurant_name: String,
    /// Raw rating. Non-numeric values deserialize as `None`; out-of-range
    /// values are kept and clamped at display time.
    #[serde(
        rename = "Average_Rating",
        default,
        deserialize_with = "number_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub explanation: String,
    #[serde(
        rename = "Is_Bestseller",
        default,
        deserialize_with = "flag",
        serialize_with = "flag_as_int"
    )]
    pub is_bestseller: bool,
    #[serde(
        rename = "Is_Expensive",
        default = "default_expensive",
        deserialize_with = "expensive_flag",
        serialize_with = "flag_as_int"
    )]
    pub is_expensive: bool,
}

/// Weather context the backend used when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl WeatherInfo {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            city: None,
            temp_c: None,
            condition: None,
        }
    }
}

/// Success body of `POST /recommend`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub results: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub weather: Option<WeatherInfo>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub mood_score: Option<f64>,
}

/// Error body of a non-2xx response. Either field may carry the reason.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// First non-empty of `message` and `error`.
    pub fn reason(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

/// Body of `GET /cities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitiesResponse {
    #[serde(default)]
    pub cities: Option<Vec<String>>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

/// The backend's reading of the query's mood.
#[derive(Debug, Clone, PartialEq)]
pub struct Mood {
    pub label: String,
    pub score: Option<f64>,
}

/// What a finished recommendation call hands back to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success {
        results: Vec<Recommendation>,
        weather: Option<WeatherInfo>,
        mood: Option<Mood>,
    },
    Failure {
        message: String,
    },
}

impl SearchOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        SearchOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }
}

impl From<RecommendResponse> for SearchOutcome {
    fn from(body: RecommendResponse) -> Self {
        SearchOutcome::Success {
            results: body.results.unwrap_or_default(),
            weather: body.weather,
            mood: body.mood.map(|label| Mood {
                label,
                score: body.mood_score,
            }),
        }
    }
}

fn default_expensive() -> bool {
    true
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| !v.is_nan()))
}

/// Missing, null or non-string values render as empty text.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// True only for the backend's `1` or JSON `true`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    })
}

/// False only for an explicit `0` or `false`; anything else counts as expensive.
fn expensive_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    })
}

fn flag_as_int<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}
