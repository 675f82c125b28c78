//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use crate::{config::SettingsArgs, reading::DEFAULT_VALUE_COLUMN};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Downloads India-WRIS datasets and pivots them to monthly tables
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick dataset, state and district, then download a date range
    Download {
        /// Dataset name or code (prompted for if absent)
        #[arg(long)]
        dataset: Option<String>,
        /// State name or code (prompted for if absent)
        #[arg(long)]
        state: Option<String>,
        /// District name or code (prompted for if absent)
        #[arg(long)]
        district: Option<String>,
        /// First day of the range, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Last day of the range, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<NaiveDate>,
        /// Pivot the downloaded file straight away
        #[arg(long)]
        pivot: bool,
    },
    /// Pivot a downloaded file to one row per station, one column per month
    Pivot {
        /// CSV file produced by `download`
        file: PathBuf,
        /// Column averaged into each month
        #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
        value_column: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}
