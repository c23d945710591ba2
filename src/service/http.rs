//! HTTP client for the federation REST API.
//!
//! Thin [`RatingService`] implementation over the portal's upstream
//! endpoints. Batch endpoints take comma-separated id lists and answer
//! with an order-aligned array of envelopes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::RatingService;
use crate::period::RatingPeriod;
use crate::types::{FetchEnvelope, GroupId, PlayerId, PlayerRecord, TournamentRecord};
use crate::{CaissaError, Result};

/// Default base URL for the federation API proxy.
const DEFAULT_BASE_URL: &str = "https://api.caissa-portal.org";

/// Request timeout for upstream calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the federation REST API.
#[derive(Clone)]
pub struct HttpRatingService {
    http: Client,
    base_url: String,
}

impl HttpRatingService {
    /// Create a client against the default federation API URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock,
    /// or self-hosted proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T>(&self, url: String) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CaissaError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CaissaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CaissaError::Http(e.to_string()))
    }

    fn join_ids<I: ToString>(ids: &[I]) -> String {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for HttpRatingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RatingService for HttpRatingService {
    async fn fetch_player(
        &self,
        id: PlayerId,
        period: Option<RatingPeriod>,
    ) -> Result<FetchEnvelope<PlayerRecord>> {
        let url = match period {
            Some(period) => format!("{}/api/player/{}?date={}", self.base_url, id, period),
            None => format!("{}/api/player/{}", self.base_url, id),
        };
        self.get_json(url).await
    }

    async fn fetch_players_batch(
        &self,
        ids: &[PlayerId],
    ) -> Result<Vec<FetchEnvelope<PlayerRecord>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/api/players?ids={}", self.base_url, Self::join_ids(ids));
        self.get_json(url).await
    }

    async fn fetch_tournaments_batch(
        &self,
        group_ids: &[GroupId],
    ) -> Result<Vec<FetchEnvelope<TournamentRecord>>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/api/tournaments?groups={}",
            self.base_url,
            Self::join_ids(group_ids)
        );
        self.get_json(url).await
    }
}
