use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::error::FrankfurterError;
use super::types::LatestResponse;
use crate::traits::{Currency, ExchangeService};

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Clone)]
pub struct FrankfurterConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Frankfurter exchange-rate client.
pub struct FrankfurterClient {
    config: FrankfurterConfig,
    http: Client,
}

impl FrankfurterClient {
    pub fn new(config: FrankfurterConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn check_response(
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, FrankfurterError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Frankfurter API error");
            Err(FrankfurterError::Api {
                status,
                message: body,
            })
        }
    }

    async fn latest(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<LatestResponse, FrankfurterError> {
        let url = format!("{}/latest", self.config.base_url.trim_end_matches('/'));
        let amount = amount.to_string();
        let resp = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .query(&[
                ("amount", amount.as_str()),
                ("from", from.code()),
                ("to", to.code()),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| FrankfurterError::Parse(e.to_string()))
    }
}

impl ExchangeService for FrankfurterClient {
    type Error = FrankfurterError;

    async fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
        cancel: &CancellationToken,
    ) -> Result<f64, FrankfurterError> {
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FrankfurterError::Cancelled),
            result = self.latest(amount, from, to) => result?,
        };

        body.rate_for(to.code())
            .ok_or_else(|| FrankfurterError::Parse(format!("no rate for {to} in response")))
    }
}
