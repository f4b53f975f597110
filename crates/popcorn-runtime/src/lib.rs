pub mod converter;
mod failure;
pub mod logging;
pub mod search;
pub mod selection;
pub mod session;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use popcorn_api::frankfurter::{FrankfurterClient, FrankfurterConfig};
use popcorn_api::omdb::{OmdbClient, OmdbConfig};
use popcorn_core::config::AppConfig;
use popcorn_core::storage::Storage;
use popcorn_core::watched::WatchedList;

pub use converter::{ConversionDispatch, ConversionState, Converter};
pub use failure::OFFLINE_MESSAGE;
pub use search::{SearchDispatch, SearchState};
pub use selection::{DetailState, RatingSubmit, SelectOutcome};
pub use session::{MovieSession, SessionEvent};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(String),
}

/// Everything the movie screen and the converter widget need, wired to the
/// real HTTP clients.
pub struct Runtime {
    pub movies: MovieSession<OmdbClient>,
    pub converter: Converter<FrankfurterClient>,
}

impl Runtime {
    /// Load the user config and open the database in the data directory.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<Self, RuntimeError> {
        let config = AppConfig::load().map_err(|e| RuntimeError::Config(e.to_string()))?;
        let db_path =
            AppConfig::ensure_db_path().map_err(|e| RuntimeError::Config(e.to_string()))?;
        let storage =
            Storage::open(&db_path).map_err(|e| RuntimeError::Database(e.to_string()))?;

        tracing::info!(path = %db_path.display(), "Opened watched-list database");
        Ok(Self::from_config(&config, storage))
    }

    pub fn from_config(config: &AppConfig, storage: Storage) -> Self {
        let omdb = OmdbClient::new(OmdbConfig {
            base_url: config.omdb.base_url.clone(),
            api_key: config.omdb.api_key.clone(),
            timeout: Duration::from_secs(config.omdb.timeout_secs),
        });
        let exchange = FrankfurterClient::new(FrankfurterConfig {
            base_url: config.exchange.base_url.clone(),
            timeout: Duration::from_secs(config.exchange.timeout_secs),
        });

        let watched = WatchedList::load(storage, config.storage.watched_key.clone());
        Self {
            movies: MovieSession::new(Arc::new(omdb), watched, config.search.min_query_len),
            converter: Converter::new(Arc::new(exchange)),
        }
    }
}
