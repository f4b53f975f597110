use serde::Deserialize;

use crate::traits::{MovieDetail, MovieSummary};

// ── Response types ──────────────────────────────────────────────

/// `?s=` reply. Failures come back as `{"Response":"False","Error":...}`
/// with HTTP 200, so every field is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchResponse {
    #[serde(default)]
    pub search: Vec<OmdbSearchItem>,
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// `?i=` reply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OmdbDetailResponse {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub runtime: Option<String>,
    pub released: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub response: Option<String>,
    pub error: Option<String>,
}

/// The provider's own failure message, if the reply is a logical failure.
pub fn provider_error(response: Option<&str>, error: Option<&str>) -> Option<String> {
    if response.is_some_and(|r| r.eq_ignore_ascii_case("false")) {
        Some(error.unwrap_or("Unknown error").to_string())
    } else {
        None
    }
}

/// Leading integer of a runtime string such as `"148 min"`.
pub fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    let digits: String = runtime
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// ── Conversions ─────────────────────────────────────────────────

impl OmdbSearchItem {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: self.poster,
        }
    }
}

impl OmdbDetailResponse {
    /// Normalize into a [`MovieDetail`]. `fallback_id` is used when the reply
    /// omits `imdbID`.
    pub fn into_detail(self, fallback_id: &str) -> MovieDetail {
        let runtime = self.runtime.unwrap_or_default();
        MovieDetail {
            id: self.imdb_id.unwrap_or_else(|| fallback_id.to_string()),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            poster_url: self.poster.unwrap_or_default(),
            runtime_minutes: parse_runtime_minutes(&runtime),
            runtime,
            release_date: self.released.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            external_rating: self
                .imdb_rating
                .as_deref()
                .and_then(|r| r.trim().parse::<f32>().ok()),
            plot: self.plot.unwrap_or_default(),
            cast: self.actors.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
        }
    }
}
