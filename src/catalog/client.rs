//! HTTP access to the India-WRIS catalog and export endpoints.

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, Url,
};
use serde_json::Value;
use tracing::debug;

use crate::{config::Settings, error::TransportError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Raw answer from the export endpoint; status is not checked here.
#[derive(Debug, Clone)]
pub struct ExportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ExportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The remote catalog as seen by the pipeline.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// POSTs `filter` to a listing endpoint and returns the parsed JSON body.
    async fn query_list(&self, endpoint: &str, filter: &Value) -> Result<Value, TransportError>;

    /// POSTs to an export resource with query parameters and returns the raw response.
    async fn query_export(
        &self,
        resource: &[&str],
        params: &[(&str, String)],
    ) -> Result<ExportResponse, TransportError>;
}

/// `reqwest`-backed client, built once per run.
pub struct HttpCatalogClient {
    client: Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://indiawris.gov.in"));
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://indiawris.gov.in/dataSet/"),
        );

        if let Some(session_id) = &settings.session_id {
            let cookie = HeaderValue::from_str(&format!("JSESSIONID={}", session_id))
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            headers.insert(header::COOKIE, cookie);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        let mut base_url = settings.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(HttpCatalogClient { client, base_url })
    }

    fn export_url(&self, resource: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(resource);

        Ok(url)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn query_list(&self, endpoint: &str, filter: &Value) -> Result<Value, TransportError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| TransportError::Url(e.to_string()))?;
        debug!(%url, %filter, "querying catalog");

        let response = self.client.post(url).json(filter).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn query_export(
        &self,
        resource: &[&str],
        params: &[(&str, String)],
    ) -> Result<ExportResponse, TransportError> {
        let url = self.export_url(resource)?;
        debug!(%url, "requesting export");

        let response = self
            .client
            .post(url)
            .query(params)
            .header(header::ACCEPT, "text/csv")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ExportResponse { status, body })
    }
}
