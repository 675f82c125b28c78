//! Resolve the catalog chain, download the chosen range, and optionally pivot it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::ProgressBar;

use crate::{
    catalog::{
        CatalogClient, CatalogLevel, CatalogOption, CatalogResolver, HttpCatalogClient,
        ResolvedFilterChain,
    },
    cli::create_spinner,
    config::Settings,
    download::{DownloadOrchestrator, DownloadRequest},
    error::SelectionError,
    pivot,
    reading::DEFAULT_VALUE_COLUMN,
    select::{DateBound, InteractiveSelector, ScriptedSelector, SelectionProvider},
};

use super::report_reshape;

/// Answers given on the command line; anything missing is asked for interactively.
#[derive(Debug, Default, Clone)]
pub struct DownloadArgs {
    pub dataset: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pivot: bool,
}

impl DownloadArgs {
    fn selector(&self) -> ScriptedSelector {
        let answers = [
            (CatalogLevel::Dataset, &self.dataset),
            (CatalogLevel::State, &self.state),
            (CatalogLevel::District, &self.district),
        ];

        answers
            .into_iter()
            .filter_map(|(level, answer)| answer.clone().map(|a| (level, a)))
            .fold(ScriptedSelector::new(), |selector, (level, answer)| {
                selector.answer(level, answer)
            })
            .dates(self.start_date, self.end_date)
            .with_fallback(Box::new(InteractiveSelector::stdio()))
    }
}

pub async fn download(settings: &Settings, args: DownloadArgs) -> Result<String> {
    let client = HttpCatalogClient::new(settings).context("failed to build HTTP client")?;
    let mut selector = args.selector();

    let file_path = run(&client, settings, &mut selector).await?;

    if args.pivot {
        let bar = create_spinner("Pivoting to monthly table...".to_string());
        let summary = pivot::reshape(&file_path, DEFAULT_VALUE_COLUMN)
            .with_context(|| format!("raw download kept at `{}`", file_path.display()))?;
        bar.finish_with_message("Pivot complete");
        report_reshape(&summary);

        return Ok(summary.output.to_string_lossy().to_string());
    }

    Ok(file_path.to_string_lossy().to_string())
}

/// The headless pipeline: chain, dates, one export request.
pub async fn run(
    client: &dyn CatalogClient,
    settings: &Settings,
    selector: &mut dyn SelectionProvider,
) -> Result<PathBuf> {
    let chain = resolve_chain(client, selector).await?;

    println!("\n--- SELECT DATE RANGE ---");
    let start = selector.input_date(DateBound::Start)?;
    let end = selector.input_date(DateBound::End)?;
    let request = DownloadRequest::new(chain, start, end);

    let bar = create_spinner("Downloading data...".to_string());
    let orchestrator = DownloadOrchestrator::new(client, settings);
    let result = orchestrator.download(&request).await;
    match &result {
        Ok(_) => bar.finish_with_message("Download complete"),
        Err(_) => bar.abandon_with_message("Download failed"),
    }

    Ok(result?)
}

/// Hides the spinner for as long as the wrapped provider is prompting.
struct SuspendSpinner<'a, S: ?Sized> {
    bar: &'a ProgressBar,
    inner: &'a mut S,
}

impl<S: SelectionProvider + ?Sized> SelectionProvider for SuspendSpinner<'_, S> {
    fn choose(
        &mut self,
        level: CatalogLevel,
        options: &[CatalogOption],
    ) -> Result<CatalogOption, SelectionError> {
        let inner = &mut *self.inner;
        self.bar.suspend(|| inner.choose(level, options))
    }

    fn input_date(&mut self, bound: DateBound) -> Result<NaiveDate, SelectionError> {
        let inner = &mut *self.inner;
        self.bar.suspend(|| inner.input_date(bound))
    }
}

async fn resolve_chain(
    client: &dyn CatalogClient,
    selector: &mut dyn SelectionProvider,
) -> Result<ResolvedFilterChain> {
    let bar = create_spinner("Fetching catalog...".to_string());
    let resolver = CatalogResolver::new(client);
    let mut prompting = SuspendSpinner {
        bar: &bar,
        inner: selector,
    };
    let chain = resolver.resolve_chain(&mut prompting).await;
    bar.finish_and_clear();

    let chain = chain?;
    println!(
        "Selected: {} / {} / {}",
        chain.dataset(),
        chain.state().name,
        chain.district().name
    );

    Ok(chain)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::{fs, time::Duration};

    use reqwest::Url;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        catalog::{client::ExportResponse, resolver::tests::full_catalog},
        error::WrisError,
    };

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            base_url: Url::parse("https://indiawris.gov.in").unwrap(),
            session_id: None,
            agency: "CGWB".to_string(),
            page_size: 100_000,
            timeout: Duration::from_secs(5),
            output_dir: dir.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn should_run_pipeline_headless() {
        let dir = TempDir::new().unwrap();
        let client = crate::catalog::resolver::tests::StubClient {
            export: Some(ExportResponse {
                status: 200,
                body: b"stationCode\n".to_vec(),
            }),
            ..full_catalog()
        };
        let mut selector = ScriptedSelector::new()
            .answer(CatalogLevel::Dataset, "Ground Water Level")
            .answer(CatalogLevel::State, "punjab")
            .answer(CatalogLevel::District, "Ludhiana")
            .dates(
                NaiveDate::from_ymd_opt(2020, 1, 1),
                NaiveDate::from_ymd_opt(2020, 12, 31),
            );

        let path = run(&client, &settings(&dir), &mut selector).await.unwrap();

        assert_eq!(
            path.file_name().unwrap(),
            "Ground_Water_Level_Ludhiana_2020-01-01_2020-12-31.csv"
        );
        assert_eq!(fs::read(&path).unwrap(), b"stationCode\n");

        let exports = client.export_calls.lock().unwrap();
        assert_eq!(exports[0].0, vec!["Dataset", "Ground Water Level"]);
        assert!(exports[0]
            .1
            .contains(&("districtName".to_string(), "Ludhiana".to_string())));
    }

    #[tokio::test]
    async fn should_not_download_when_chain_fails() {
        let dir = TempDir::new().unwrap();
        let client = full_catalog();
        let mut selector = ScriptedSelector::new().answer(CatalogLevel::Dataset, "Rainfall");

        let err = run(&client, &settings(&dir), &mut selector).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<WrisError>(),
            Some(WrisError::Selection(_))
        ));
        assert!(client.export_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn should_answer_through_suspended_spinner() {
        let bar = ProgressBar::hidden();
        let mut scripted = ScriptedSelector::new()
            .answer(CatalogLevel::District, "Ludhiana")
            .dates(NaiveDate::from_ymd_opt(2020, 1, 1), None);
        let mut prompting = SuspendSpinner {
            bar: &bar,
            inner: &mut scripted,
        };
        let options = vec![
            CatalogOption::new("Ludhiana", "41"),
            CatalogOption::new("SAS Nagar (Mohali)", "51"),
        ];

        let chosen = prompting.choose(CatalogLevel::District, &options).unwrap();
        let start = prompting.input_date(DateBound::Start).unwrap();
        let end = prompting.input_date(DateBound::End);

        assert_eq!(chosen.code, "41");
        assert_eq!(start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(matches!(end, Err(SelectionError::InputClosed)));
        assert!(!bar.is_finished());
    }

    #[test]
    fn should_build_selector_from_args() {
        let args = DownloadArgs {
            state: Some("Punjab".to_string()),
            ..Default::default()
        };
        let mut selector = args.selector();
        let options = vec![CatalogOption::new("Punjab", "03")];

        assert_eq!(
            selector.choose(CatalogLevel::State, &options).unwrap().code,
            "03"
        );
    }
}
