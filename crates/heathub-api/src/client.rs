// Hub HTTP client
//
// Wraps `reqwest::Client` with hub URL construction, the shared-secret
// header, status checking, and a request budget. Endpoint helpers live
// in `endpoints.rs` as inherent methods so this module stays focused on
// transport mechanics.

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Header carrying the hub's shared secret on every request.
pub const SECRET_HEADER: &str = "SECRET";

/// Body of a PATCH request.
///
/// Most endpoints take a small JSON object; a few (`WindowDetectionActive`,
/// `DeviceLockEnabled`) take a bare boolean, and schedules are caller-supplied
/// JSON that we forward without reinterpreting.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchBody {
    /// Structured JSON payload.
    Json(serde_json::Value),
    /// Pre-serialized JSON text, sent verbatim.
    Raw(String),
}

impl PatchBody {
    /// A bare `true` / `false` body.
    pub fn flag(value: bool) -> Self {
        Self::Json(serde_json::Value::Bool(value))
    }
}

impl fmt::Display for PatchBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

impl From<serde_json::Value> for PatchBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Raw HTTP client for one hub.
///
/// Every request is authenticated with [`SECRET_HEADER`], bounded by the
/// configured deadline, and must pass through a semaphore sized to the
/// transport's connection budget. Only HTTP 200 counts as success.
#[derive(Debug)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
    secret: SecretString,
    permits: Semaphore,
    timeout: Duration,
}

impl HubClient {
    /// Create a client for the hub at `address`.
    ///
    /// `address` is either a bare host (`192.168.1.20`, `hub.local:8080`),
    /// which is reached over plain HTTP, or a full base URL.
    pub fn new(
        address: &str,
        secret: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = base_url_for(address)?;
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, secret, transport))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The client's own timeout (if any) still applies; `transport` only
    /// contributes the request budget and the deadline reported in errors.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        secret: SecretString,
        transport: &TransportConfig,
    ) -> Self {
        Self {
            http,
            base_url,
            secret,
            permits: Semaphore::new(transport.max_connections.max(1)),
            timeout: transport.timeout,
        }
    }

    /// The hub base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path (`rooms/7`) against the hub base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let _permit = self.permit().await;
        let resp = self.send(self.http.get(url)).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Send a PATCH request. The response body is ignored.
    pub async fn patch(&self, path: &str, body: &PatchBody) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PATCH {}", url);
        trace!(%body, "patch payload");

        let builder = self
            .http
            .patch(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());

        let _permit = self.permit().await;
        let resp = self.send(builder).await?;
        // Drain the body so the connection is released before the permit.
        // The status already decided the outcome.
        let _ = resp.bytes().await;
        Ok(())
    }

    /// Wait for a slot in the request budget. Hold the permit until the
    /// response body has been read.
    async fn permit(&self) -> Option<SemaphorePermit<'_>> {
        // The semaphore is never closed, so a failed acquire cannot happen.
        self.permits.acquire().await.ok()
    }

    /// Attach the secret, send, and check the status.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = builder
            .header(SECRET_HEADER, self.secret.expose_secret())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        check_status(resp)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Only 200 is success; 401 means the shared secret is wrong.
fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    match resp.status() {
        reqwest::StatusCode::OK => Ok(resp),
        reqwest::StatusCode::UNAUTHORIZED => Err(Error::Authentication {
            message: "Invalid authorization token".into(),
        }),
        status => Err(Error::Status {
            status: status.as_u16(),
        }),
    }
}

/// Turn a configured hub address into a base URL ending in `/`.
fn base_url_for(address: &str) -> Result<Url, Error> {
    let address = address.trim();
    let mut url = if address.contains("://") {
        Url::parse(address)?
    } else {
        Url::parse(&format!("http://{address}/"))?
    };
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
