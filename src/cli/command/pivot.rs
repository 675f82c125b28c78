use std::path::Path;

use anyhow::{Context, Result};

use crate::{cli::create_spinner, pivot::reshape};

use super::report_reshape;

pub fn pivot(file: &Path, value_column: &str) -> Result<String> {
    let bar = create_spinner(format!("Pivoting {}...", file.display()));
    let summary = reshape(file, value_column);
    bar.finish_and_clear();

    let summary = summary.with_context(|| format!("failed to pivot `{}`", file.display()))?;
    report_reshape(&summary);

    Ok(summary.output.to_string_lossy().to_string())
}
