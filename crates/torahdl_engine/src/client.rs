use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use torahdl_logging::{torahdl_debug, torahdl_trace};
use url::Url;

use crate::types::ExtractRequest;
use crate::{ApiError, ExtractionRecord, FailureKind, SiteRecord};

pub const DEFAULT_API_BASE_URL: &str = "https://api.sofer.ai";

const SITES_PATH: &str = "/v1/link/sites";
const EXTRACT_PATH: &str = "/v1/link/extract";

/// Connection settings for the remote extraction API.
///
/// Timeouts are `None` by default, leaving the transport defaults in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// The two calls the session makes against the remote API.
#[async_trait::async_trait]
pub trait LinkApi: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, ApiError>;

    async fn extract(&self, url: &str) -> Result<ExtractionRecord, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestLinkApi {
    sites_url: Url,
    extract_url: Url,
    client: reqwest::Client,
}

impl ReqwestLinkApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = settings.base_url.trim_end_matches('/');
        let sites_url = endpoint(base, SITES_PATH)?;
        let extract_url = endpoint(base, EXTRACT_PATH)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            sites_url,
            extract_url,
            client,
        })
    }
}

#[async_trait::async_trait]
impl LinkApi for ReqwestLinkApi {
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, ApiError> {
        torahdl_debug!("GET {}", self.sites_url);
        let request = self
            .client
            .get(self.sites_url.clone())
            .header(ACCEPT, "application/json");
        send_and_decode(request).await
    }

    async fn extract(&self, url: &str) -> Result<ExtractionRecord, ApiError> {
        torahdl_debug!("POST {} url_len={}", self.extract_url, url.len());
        let body = serde_json::to_vec(&ExtractRequest { url })
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(self.extract_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body);
        send_and_decode(request).await
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, ApiError> {
    Url::parse(&format!("{base}{path}"))
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{base}: {err}")))
}

async fn send_and_decode<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    let body = response.bytes().await.map_err(map_reqwest_error)?;
    torahdl_trace!("response body {} bytes", body.len());
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
