//! Core API client
//!
//! Holds the HTTP session (TLS, credentials, default headers) and the shared
//! request/response handling used by every endpoint group.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use crate::actions::Actions;
use crate::auth::{load_ca_certificate, Credentials};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::events::Events;
use crate::objects::Objects;
use crate::status::Status;
use crate::VERSION;

/// Icinga 2 tunnels every verb through POST with this header
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";

/// Client for one Icinga 2 API endpoint
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    base_url: Url,
    credentials: Credentials,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("No \"url\" defined.".to_string()))?;
        let base_url = Url::parse(url)?;
        let credentials = Credentials::from_config(&config);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("rust-icinga2api/{VERSION}"))
            .default_headers(headers);

        // Not a whole-request timeout: event stream bodies stay open indefinitely
        if let Some(timeout) = config.timeout() {
            builder = builder.connect_timeout(timeout);
        }

        builder = match &config.ca_certificate {
            Some(path) => builder.add_root_certificate(load_ca_certificate(path)?),
            None => {
                warn!("No CA certificate configured, server certificate will not be verified");
                builder.danger_accept_invalid_certs(true)
            }
        };

        if let Some(identity) = credentials.identity()? {
            builder = builder.identity(identity);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("cannot build HTTP client: {e}")))?;

        info!("Icinga 2 API client for {} ({:?})", base_url, credentials);

        Ok(Self {
            config,
            base_url,
            credentials,
            http,
        })
    }

    /// Create a client from a config file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Self::new(ClientConfig::from_file(path)?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub fn objects(&self) -> Objects<'_> {
        Objects::new(self)
    }

    pub fn actions(&self) -> Actions<'_> {
        Actions::new(self)
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn status(&self) -> Status<'_> {
        Status::new(self)
    }

    /// Build an authenticated POST carrying the real method in the override header
    pub(crate) fn build_request(&self, method: &Method, url: Url) -> RequestBuilder {
        let request = self
            .http
            .post(url)
            .header(METHOD_OVERRIDE, method.as_str());
        self.credentials.apply(request)
    }

    /// Send a request and decode the JSON response body
    pub async fn request(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!("Request URL: {} ({})", url, method);

        let mut request = self.build_request(&method, url);
        if let Some(payload) = payload.filter(|p| !is_empty_payload(p)) {
            request = request.json(payload);
        }
        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let response = handle_error_response(response).await?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Open a long-lived POST whose body is read incrementally by the caller
    ///
    /// `timeout` bounds the wait for the response headers, not the body.
    pub(crate) async fn open_stream(&self, path: &str, payload: &Value) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!("Stream URL: {}", url);

        let send = self.build_request(&Method::POST, url).json(payload).send();
        let response = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, send).await.map_err(|_| {
                ApiError::Timeout(format!("no response to event stream request within {limit:?}"))
            })??,
            None => send.await?,
        };

        handle_error_response(response).await
    }
}

/// Turn a non-2xx response into [`ApiError::Http`]
async fn handle_error_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    warn!("Request to {} failed with status {}", url, status);

    Err(ApiError::Http {
        url,
        status: status.as_u16(),
        body,
    })
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
