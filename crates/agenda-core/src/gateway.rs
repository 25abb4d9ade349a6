//! Remote visit service client.
//!
//! The backend exposes one collection endpoint:
//!
//! - `POST {base_url}` with a [`VisitPayload`] body records a visit. Any 2xx
//!   status is success.
//! - `GET {base_url}?limit=N` returns the most recent payloads as a JSON
//!   array.
//!
//! Non-2xx answers become [`AgendaError::ServerError`] carrying the response
//! body text, which is what gets shown to the user.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, Url};

use crate::{
    error::{AgendaError, Result},
    models::VisitPayload,
};

/// Remote side of visit submission.
#[async_trait]
pub trait RemoteVisitGateway: Send + Sync {
    /// Records one visit.
    async fn submit_visit(&self, payload: &VisitPayload) -> Result<()>;

    /// Fetches up to `limit` recently recorded visits.
    async fn fetch_recent_visits(&self, limit: u32) -> Result<Vec<VisitPayload>>;
}

/// Connection settings for the visit service.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Collection endpoint, e.g. `http://host/visits`
    pub base_url: String,
    /// Identifier of the field representative submitting visits
    pub commercial_id: i64,
    /// Bearer token obtained upstream, if the service requires one
    pub auth_token: Option<String>,
    /// Overall request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, commercial_id: i64) -> Self {
        Self {
            base_url: base_url.into(),
            commercial_id,
            auth_token: None,
            timeout: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// [`RemoteVisitGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVisitGateway {
    base_url: Url,
    auth_token: Option<String>,
    http: Client,
}

impl HttpVisitGateway {
    /// Creates a gateway for the configured endpoint.
    ///
    /// # Errors
    ///
    /// `AgendaError::InvalidUrl` when the base URL is not an absolute http(s)
    /// URL, `AgendaError::Network` when the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| AgendaError::InvalidUrl {
                url: config.base_url.clone(),
            })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url,
            auth_token: config.auth_token.clone(),
            http,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turns a non-2xx response into a server error carrying the body text.
    async fn validate(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("Visit service answered {status}")
        } else {
            body
        };
        Err(AgendaError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteVisitGateway for HttpVisitGateway {
    async fn submit_visit(&self, payload: &VisitPayload) -> Result<()> {
        debug!(
            "POST {} visit_id={} clients={:?}",
            self.base_url, payload.visit_id, payload.client_ids
        );
        let request = self.authorize(self.http.post(self.base_url.clone()).json(payload));
        let response = request.send().await?;
        Self::validate(response).await?;
        Ok(())
    }

    async fn fetch_recent_visits(&self, limit: u32) -> Result<Vec<VisitPayload>> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        debug!("GET {url}");

        let response = self.authorize(self.http.get(url)).send().await?;
        let body = Self::validate(response).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| AgendaError::Decoding { source })
    }
}
