//! Builds the bulk export request for a resolved filter chain and saves the
//! response to disk.

use std::{fs, path::PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    catalog::{CatalogClient, ResolvedFilterChain},
    config::Settings,
    error::{DownloadFailure, Result},
    select::DATE_FORMAT,
};

/// Characters of the response body kept in a failure report
const EXCERPT_CHARS: usize = 300;

/// One export request. Start after end is passed through as-is; the remote
/// service decides what that means.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub chain: ResolvedFilterChain,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DownloadRequest {
    pub fn new(chain: ResolvedFilterChain, start: NaiveDate, end: NaiveDate) -> Self {
        DownloadRequest { chain, start, end }
    }

    /// Path segments of the export resource. A `/` in the dataset name stays a
    /// path separator; each segment is percent-encoded by the client.
    pub fn resource(&self) -> Vec<&str> {
        std::iter::once("Dataset")
            .chain(self.chain.dataset().name.split('/'))
            .collect()
    }

    /// The export endpoint filters on region names, not codes.
    pub fn query_params(&self, agency: &str, page_size: u32) -> Vec<(&'static str, String)> {
        vec![
            ("stateName", self.chain.state().name.clone()),
            ("districtName", self.chain.district().name.clone()),
            ("agencyName", agency.to_string()),
            ("startdate", self.start.format(DATE_FORMAT).to_string()),
            ("enddate", self.end.format(DATE_FORMAT).to_string()),
            ("download", "true".to_string()),
            ("page", "0".to_string()),
            ("size", page_size.to_string()),
        ]
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.csv",
            safe_file_component(&self.chain.dataset().name),
            safe_file_component(&self.chain.district().name),
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn safe_file_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}

fn excerpt(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(EXCERPT_CHARS).collect()
}

pub struct DownloadOrchestrator<'a> {
    client: &'a dyn CatalogClient,
    agency: String,
    page_size: u32,
    output_dir: PathBuf,
}

impl<'a> DownloadOrchestrator<'a> {
    pub fn new(client: &'a dyn CatalogClient, settings: &Settings) -> Self {
        DownloadOrchestrator {
            client,
            agency: settings.agency.clone(),
            page_size: settings.page_size,
            output_dir: settings.output_dir.clone(),
        }
    }

    /// Issues exactly one export request and writes the body verbatim. Nothing
    /// is written unless the response was a success.
    pub async fn download(&self, request: &DownloadRequest) -> Result<PathBuf> {
        if request.start > request.end {
            warn!(start = %request.start, end = %request.end, "start date is after end date");
        }

        let params = request.query_params(&self.agency, self.page_size);
        let response = self
            .client
            .query_export(&request.resource(), &params)
            .await
            .map_err(DownloadFailure::Transport)?;

        if !response.is_success() {
            return Err(DownloadFailure::Status {
                status: response.status,
                excerpt: excerpt(&response.body),
            }
            .into());
        }

        fs::create_dir_all(&self.output_dir)?;
        let file_path = self.output_dir.join(request.file_name());
        fs::write(&file_path, &response.body)?;

        info!(path = %file_path.display(), bytes = response.body.len(), "download saved");
        Ok(file_path)
    }
}

// -- Tests -------------------------------------------------------------------
