use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::error::OmdbError;
use super::types::{provider_error, OmdbDetailResponse, OmdbSearchResponse};
use crate::traits::{MovieDetail, MovieService, MovieSummary};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Connection settings, injected at construction.
#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// OMDb REST client.
pub struct OmdbClient {
    config: OmdbConfig,
    http: Client,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Self {
        if config.api_key.is_empty() {
            tracing::warn!("OMDb API key is empty, requests will be rejected");
        }
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, OmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "OMDb API error");
            Err(OmdbError::Api {
                status,
                message: body,
            })
        }
    }

    /// GET the endpoint with `params`, racing the whole exchange against `cancel`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, OmdbError> {
        let request = async {
            let resp = self
                .http
                .get(&self.config.base_url)
                .timeout(self.config.timeout)
                .query(&[("apikey", self.config.api_key.as_str())])
                .query(params)
                .send()
                .await?;

            let resp = Self::check_response(resp).await?;
            resp.json::<T>()
                .await
                .map_err(|e| OmdbError::Parse(e.to_string()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OmdbError::Cancelled),
            result = request => result,
        }
    }
}

impl MovieService for OmdbClient {
    type Error = OmdbError;

    async fn search_movies(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, OmdbError> {
        let body: OmdbSearchResponse = self.get_json(&[("s", query)], cancel).await?;

        if let Some(message) = provider_error(body.response.as_deref(), body.error.as_deref()) {
            return Err(OmdbError::NotFound(message));
        }

        Ok(body
            .search
            .into_iter()
            .map(|item| item.into_summary())
            .collect())
    }

    async fn get_movie(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<MovieDetail, OmdbError> {
        let body: OmdbDetailResponse = self.get_json(&[("i", id)], cancel).await?;

        if let Some(message) = provider_error(body.response.as_deref(), body.error.as_deref()) {
            return Err(OmdbError::NotFound(message));
        }

        Ok(body.into_detail(id))
    }
}
