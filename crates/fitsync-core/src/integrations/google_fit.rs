//! Google Fit integration -- reads aggregated step deltas for a dataset key.
//!
//! Uses OAuth2 with the fitness read scopes. The token is resolved on every
//! fetch, so an expired token is refreshed before the dataset request.

use reqwest::Client;

use super::oauth::{self, OAuthConfig};
use super::traits::FitnessSource;
use super::endpoint;
use crate::error::{ApiError, Result};
use crate::models::PointSeries;
use crate::storage::TokenCache;
use crate::window::TimeWindow;

const SERVICE: &str = "Google Fit";

/// Google Fit REST client.
pub struct GoogleFitClient {
    base_url: String,
    oauth: OAuthConfig,
    cache: TokenCache,
    http: Client,
}

impl GoogleFitClient {
    pub fn new(base_url: impl Into<String>, oauth: OAuthConfig, cache: TokenCache) -> Self {
        Self {
            base_url: base_url.into(),
            oauth,
            cache,
            http: Client::new(),
        }
    }
}

impl FitnessSource for GoogleFitClient {
    async fn fetch_dataset(&self, data_source_id: &str, window: &TimeWindow) -> Result<PointSeries> {
        let token = oauth::access_token(&self.oauth, &self.cache).await?;
        let dataset_id = window.dataset_id();
        let url = endpoint(
            &self.base_url,
            &["users", "me", "dataSources", data_source_id, "datasets", &dataset_id],
        )?;

        tracing::debug!(%url, "Fetching fitness dataset");
        let resp = self
            .http
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(ApiError::http(SERVICE))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                service: SERVICE,
                status: status.as_u16(),
            }
            .into());
        }

        let body = resp.text().await.map_err(ApiError::http(SERVICE))?;
        let series: PointSeries =
            serde_json::from_str(&body).map_err(ApiError::malformed(SERVICE))?;

        tracing::info!(points = series.point.len(), "Fetched fitness dataset {dataset_id}");
        Ok(series)
    }
}
