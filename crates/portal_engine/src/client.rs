use futures_util::StreamExt;
use portal_logging::{portal_debug, portal_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};
use url::Url;

use crate::{ApiError, ApiSettings, FailureKind};

/// The backend as seen by the job board. Every call answers with raw JSON;
/// interpreting its shape is the caller's business.
#[async_trait::async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn matches(&self) -> Result<Value, ApiError>;

    async fn search(&self, query: &[(String, String)]) -> Result<Value, ApiError>;

    async fn public_listing(&self) -> Result<Value, ApiError>;

    async fn filter_options(&self) -> Result<Value, ApiError>;

    async fn my_applications(&self) -> Result<Value, ApiError>;

    async fn apply(&self, job_id: &str) -> Result<Value, ApiError>;
}

/// reqwest-backed client. One `reqwest::Client` is shared by every call so
/// the session cookie survives between requests.
#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_store(settings.cookie_store)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let mut url = self.endpoint_url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        portal_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            portal_warn!("{} answered {}", response.url(), status);
            return Err(ApiError::new(
                FailureKind::from_status(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_body_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        // Some endpoints answer 201/204 without a body.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobBoardApi for ReqwestApi {
    async fn matches(&self) -> Result<Value, ApiError> {
        self.get_json(&self.settings.endpoints.matches, &[]).await
    }

    async fn search(&self, query: &[(String, String)]) -> Result<Value, ApiError> {
        self.get_json(&self.settings.endpoints.search, query).await
    }

    async fn public_listing(&self) -> Result<Value, ApiError> {
        self.get_json(&self.settings.endpoints.public_listing, &[]).await
    }

    async fn filter_options(&self) -> Result<Value, ApiError> {
        self.get_json(&self.settings.endpoints.filter_options, &[]).await
    }

    async fn my_applications(&self) -> Result<Value, ApiError> {
        self.get_json(&self.settings.endpoints.my_applications, &[]).await
    }

    async fn apply(&self, job_id: &str) -> Result<Value, ApiError> {
        let mut url = self.endpoint_url(&self.settings.endpoints.apply)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot carry a path"))?
            .pop_if_empty()
            .push(job_id);
        portal_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(json!({ "jobId": job_id }).to_string())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }
}

fn too_large(max_bytes: u64, actual: u64) -> ApiError {
    ApiError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if let Some(status) = err.status() {
        return ApiError::new(FailureKind::from_status(status.as_u16()), err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
