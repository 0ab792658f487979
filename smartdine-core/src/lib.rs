pub mod config;
pub mod error;
pub mod http;
pub mod rating;
pub mod recommend;
pub mod session;
pub mod types;
pub mod view;

pub use config::{ClientConfig, ConfigError};
pub use error::{FetchError, RecommendError};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
pub use rating::{RatingBadge, RatingTier};
pub use recommend::{fetch_cities, fetch_health, fetch_recommendation, try_fetch_recommendation};
pub use session::{CompletedSearch, PendingSearch, Phase, SearchSession, SearchState};
pub use types::{
    HealthStatus, Mood, Recommendation, RecommendResponse, SearchOutcome, SearchRequest, WeatherInfo,
};
pub use view::{CardView, Tag, ViewState};
