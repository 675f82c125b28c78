//! Runtime settings, taken from command line flags with environment fallbacks.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Args;
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://indiawris.gov.in";
pub const DEFAULT_AGENCY: &str = "CGWB";
pub const DEFAULT_PAGE_SIZE: u32 = 100_000;

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// India-WRIS base URL
    #[arg(long, global = true, env = "WRIS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value of the JSESSIONID cookie copied from a browser session
    #[arg(long, global = true, env = "WRIS_SESSION_ID", hide_env_values = true)]
    pub session_id: Option<String>,

    /// Agency filter sent with the export request
    #[arg(long, global = true, env = "WRIS_AGENCY", default_value = DEFAULT_AGENCY)]
    pub agency: String,

    /// Rows requested in the single export page
    #[arg(long, global = true, env = "WRIS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "WRIS_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Directory downloaded files are written to
    #[arg(long, global = true, env = "WRIS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

/// Immutable per-run configuration shared by the catalog client and the downloader.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub session_id: Option<String>,
    pub agency: String,
    pub page_size: u32,
    pub timeout: Duration,
    pub output_dir: PathBuf,
}

impl TryFrom<&SettingsArgs> for Settings {
    type Error = anyhow::Error;

    fn try_from(args: &SettingsArgs) -> Result<Self> {
        let base_url = Url::parse(&args.base_url)
            .with_context(|| format!("invalid base URL `{}`", args.base_url))?;
        let session_id = args
            .session_id
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Settings {
            base_url,
            session_id,
            agency: args.agency.clone(),
            page_size: args.page_size,
            timeout: Duration::from_secs(args.timeout_secs),
            output_dir: args.output_dir.clone(),
        })
    }
}
