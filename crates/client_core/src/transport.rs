use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{NewRound, Round},
    protocol::{HandicapResponse, ServerErrorBody, HANDICAP_PATH, ROUNDS_PATH},
};
use tracing::debug;

use crate::{config::ClientSettings, error::TransportError, HandicapApi};

/// [`HandicapApi`] over the backend's JSON HTTP endpoints.
pub struct HttpHandicapApi {
    http: Client,
    base_url: String,
}

impl HttpHandicapApi {
    pub fn new(settings: &ClientSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &ClientSettings) -> Self {
        Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn ensure_success(url: &str, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ServerErrorBody>(&body)
        .ok()
        .and_then(|body| body.summary())
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        });

    Err(TransportError::Status {
        url: url.to_string(),
        status,
        detail,
    })
}

#[async_trait]
impl HandicapApi for HttpHandicapApi {
    async fn submit_round(&self, round: &NewRound) -> Result<Round, TransportError> {
        let url = self.endpoint(ROUNDS_PATH);
        debug!(%url, score = round.score, "posting round");

        let response = self
            .http
            .post(&url)
            .json(round)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(&url, response).await?;

        response
            .json::<Round>()
            .await
            .map_err(|source| TransportError::Decode { url, source })
    }

    async fn fetch_handicap(&self) -> Result<Option<f64>, TransportError> {
        let url = self.endpoint(HANDICAP_PATH);
        debug!(%url, "fetching handicap");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(&url, response).await?;

        response
            .json::<HandicapResponse>()
            .await
            .map_err(|source| TransportError::Decode { url, source })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
