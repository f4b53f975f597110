//! Trait definitions for the remote services.
//!
//! Controllers only talk to these traits, so tests can swap in scripted
//! services and the concrete clients stay interchangeable.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Movie search and lookup.
///
/// Every call takes a cancellation token. Implementations must stop as soon
/// as it fires and return an error that classifies as
/// [`FetchFailure::Cancelled`].
pub trait MovieService: Send + Sync {
    type Error: Classify + std::error::Error + Send + Sync + 'static;

    /// Search movies by free-text title.
    fn search_movies(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send;

    /// Fetch full details for a single movie id.
    fn get_movie(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<MovieDetail, Self::Error>> + Send;
}

/// Currency conversion at current exchange rates.
pub trait ExchangeService: Send + Sync {
    type Error: Classify + std::error::Error + Send + Sync + 'static;

    fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<f64, Self::Error>> + Send;
}

/// How a failed fetch should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The caller cancelled the request. Never shown to the user.
    Cancelled,
    /// The service could not be reached.
    Offline,
    /// The service answered but reported a failure of its own.
    Provider(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Anything else, with its message.
    Other(String),
}

/// Map a service error onto [`FetchFailure`].
pub trait Classify {
    fn classify(&self) -> FetchFailure;
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full movie details.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// Runtime as reported, e.g. `"148 min"`.
    pub runtime: String,
    pub runtime_minutes: Option<u32>,
    pub release_date: String,
    pub genre: String,
    pub external_rating: Option<f32>,
    pub plot: String,
    pub cast: String,
    pub director: String,
}

/// Currencies offered by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Currency {
    Usd,
    Eur,
    Cad,
    Inr,
}

impl Currency {
    pub const ALL: &[Currency] = &[Self::Usd, Self::Eur, Self::Cad, Self::Inr];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Cad => "CAD",
            Self::Inr => "INR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
