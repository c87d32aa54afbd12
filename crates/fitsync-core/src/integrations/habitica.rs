//! Habitica integration -- task listing and scoring via the v3 REST API.
//!
//! Every request carries the static `x-api-key` / `x-api-user` headers read
//! from the local credential file.

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::endpoint;
use super::traits::{HabitTracker, TaskListing};
use crate::credentials::HabitCredentials;
use crate::error::{ApiError, Result};
use crate::models::Task;
use crate::replay::SuccessPolicy;

const SERVICE: &str = "Habitica";

/// Habitica serves `{"success": true, "data": [...]}`; older deployments
/// and proxies answer with the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Envelope { data: Vec<Task> },
    Bare(Vec<Task>),
}

impl From<ListingBody> for Vec<Task> {
    fn from(body: ListingBody) -> Self {
        match body {
            ListingBody::Envelope { data } => data,
            ListingBody::Bare(tasks) => tasks,
        }
    }
}

pub struct HabiticaClient {
    base_url: String,
    credentials: HabitCredentials,
    policy: SuccessPolicy,
    http: Client,
}

impl HabiticaClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: HabitCredentials,
        policy: SuccessPolicy,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            policy,
            http: Client::new(),
        }
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("x-api-key", &self.credentials.api_key)
            .header("x-api-user", &self.credentials.api_user)
    }
}

impl HabitTracker for HabiticaClient {
    async fn list_tasks(&self) -> Result<TaskListing> {
        let url = endpoint(&self.base_url, &["tasks", "user"])?;
        let resp = self
            .authed(self.http.get(url))
            .send()
            .await
            .map_err(ApiError::http(SERVICE))?;

        let status = resp.status().as_u16();
        if !self.policy.is_success(status) {
            return Ok(TaskListing::Rejected { status });
        }

        let body = resp.text().await.map_err(ApiError::http(SERVICE))?;
        let listing: ListingBody =
            serde_json::from_str(&body).map_err(ApiError::malformed(SERVICE))?;
        Ok(TaskListing::Tasks(listing.into()))
    }

    async fn score_up(&self, task_id: &str) -> Result<u16> {
        let url = endpoint(&self.base_url, &["tasks", task_id, "score", "up"])?;
        let resp = self
            .authed(self.http.post(url))
            .send()
            .await
            .map_err(ApiError::http(SERVICE))?;
        Ok(resp.status().as_u16())
    }
}
