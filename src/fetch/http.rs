//! HTTP access to the dashboard backend.
//!
//! Endpoints, relative to the configured base URL:
//! - `GET stock/{symbol}?period={period}`: raw stock payload
//! - `GET metrics/{api_name}`: rate-limit usage counters

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{StockSource, UsageSource};
use crate::StockmeterError;
use crate::config::BackendConfig;
use crate::models::usage::UsageSnapshot;
use crate::models::{ApiName, Period};

/// Backend client implementing both [`StockSource`] and [`UsageSource`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Builds a client for the configured base URL with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StockmeterError::Config`] if the base URL is not a valid
    /// hierarchical URL, or [`StockmeterError::Http`] if the underlying
    /// client cannot be built.
    pub fn new(config: &BackendConfig) -> crate::Result<Self> {
        let base_url = Url::parse(&config.api_url).map_err(|e| {
            StockmeterError::Config(format!("invalid API URL {:?}: {e}", config.api_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StockmeterError::Config(format!(
                "API URL {:?} cannot be used as a base",
                config.api_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// URL of the stock history endpoint for `symbol` over `period`.
    pub fn stock_url(&self, symbol: &str, period: Period) -> Url {
        let mut url = self.endpoint(&["stock", symbol]);
        url.query_pairs_mut().append_pair("period", period.as_str());
        url
    }

    /// URL of the usage metrics endpoint for `api`.
    pub fn metrics_url(&self, api: ApiName) -> Url {
        self.endpoint(&["metrics", api.as_str()])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> crate::Result<T> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockmeterError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl StockSource for HttpClient {
    async fn fetch_stock(&self, symbol: &str, period: Period) -> crate::Result<Value> {
        self.get_json(self.stock_url(symbol, period)).await
    }
}

impl UsageSource for HttpClient {
    async fn fetch_usage(&self, api: ApiName) -> crate::Result<UsageSnapshot> {
        self.get_json(self.metrics_url(api)).await
    }
}
