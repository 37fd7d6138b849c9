use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use analyzer_core::{Resource, ResourceCounts, ValidationReport, PACKAGE_CONTENT_TYPE};
use analyzer_logging::{analyzer_debug, analyzer_info};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::{FailureKind, ServiceEndpoints, ServiceError};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Bound on every remote call; expiry counts as a failure of that call.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// The remote extraction/validation/export service.
#[async_trait::async_trait]
pub trait AnalyzerService: Send + Sync {
    /// Submits a package; returns the service's plain-text result message.
    async fn upload_package(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<String, ServiceError>;

    async fn resource_counts(&self) -> Result<ResourceCounts, ServiceError>;

    async fn resources(&self) -> Result<Vec<Resource>, ServiceError>;

    async fn validate_urls(&self) -> Result<ValidationReport, ServiceError>;

    async fn export_csv(&self) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    settings: ServiceSettings,
    endpoints: ServiceEndpoints,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let endpoints = ServiceEndpoints::new(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoints,
            client,
        })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &url::Url) -> Result<T, ServiceError> {
        let body = self.send(self.client.get(url.clone()), url).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &url::Url,
    ) -> Result<Vec<u8>, ServiceError> {
        let started = Instant::now();
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        analyzer_info!(
            "{} -> {} in {} ms",
            url,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let body = read_body(response, self.settings.max_bytes).await?;
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        analyzer_debug!("{} returned {} bytes", url, body.len());
        Ok(body)
    }
}

#[async_trait::async_trait]
impl AnalyzerService for ReqwestService {
    async fn upload_package(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PACKAGE_CONTENT_TYPE)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("file", part);
        let url = self.endpoints.extract();
        let body = self
            .send(self.client.post(url.clone()).multipart(form), url)
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn resource_counts(&self) -> Result<ResourceCounts, ServiceError> {
        let raw: BTreeMap<String, u64> = self.get_json(self.endpoints.counts()).await?;
        ResourceCounts::from_wire(raw)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
    }

    async fn resources(&self) -> Result<Vec<Resource>, ServiceError> {
        self.get_json(self.endpoints.resources()).await
    }

    async fn validate_urls(&self) -> Result<ValidationReport, ServiceError> {
        self.get_json(self.endpoints.validate_urls()).await
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoints.csv_export();
        self.send(self.client.get(url.clone()), url).await
    }
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, ServiceError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(ServiceError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ServiceError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
