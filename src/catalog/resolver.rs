//! Walks the catalog one level at a time, each query filtered by the codes
//! chosen at the levels above it.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, WrisError},
    select::SelectionProvider,
};

use super::{CatalogClient, CatalogLevel, CatalogOption, ParentContext, ResolvedFilterChain};

pub struct CatalogResolver<'a> {
    client: &'a dyn CatalogClient,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(client: &'a dyn CatalogClient) -> Self {
        CatalogResolver { client }
    }

    /// Queries one level and returns its options deduplicated and sorted by name.
    pub async fn fetch_options(
        &self,
        level: CatalogLevel,
        parent: &ParentContext,
    ) -> Result<Vec<CatalogOption>> {
        let filter = level.filter(parent)?;
        let body = self
            .client
            .query_list(level.endpoint(), &filter)
            .await
            .map_err(|source| WrisError::CatalogUnavailable { level, source })?;

        let options = extract_options(&body, level);
        if options.is_empty() {
            warn!(%level, "catalog returned no usable options");
            return Err(WrisError::EmptyCatalog {
                level,
                body: serde_json::to_string_pretty(&body).ok(),
            });
        }

        debug!(%level, count = options.len(), "catalog options fetched");
        Ok(options)
    }

    /// Fetches a level's options and hands them to `selector` for a single choice.
    pub async fn resolve_level(
        &self,
        level: CatalogLevel,
        parent: &ParentContext,
        selector: &mut dyn SelectionProvider,
    ) -> Result<CatalogOption> {
        let options = self.fetch_options(level, parent).await?;
        let chosen = selector.choose(level, &options)?;
        info!(%level, name = %chosen.name, code = %chosen.code, "selected");

        Ok(chosen)
    }

    /// Resolves dataset, state and district in order. Any failure aborts the chain.
    pub async fn resolve_chain(
        &self,
        selector: &mut dyn SelectionProvider,
    ) -> Result<ResolvedFilterChain> {
        let mut parent = ParentContext::default();

        let dataset = self
            .resolve_level(CatalogLevel::Dataset, &parent, selector)
            .await?;
        parent.record(CatalogLevel::Dataset, &dataset);

        let state = self
            .resolve_level(CatalogLevel::State, &parent, selector)
            .await?;
        parent.record(CatalogLevel::State, &state);

        let district = self
            .resolve_level(CatalogLevel::District, &parent, selector)
            .await?;

        Ok(ResolvedFilterChain::new(dataset, state, district))
    }
}

/// Accepts either a bare list or an object wrapping the list under `data`.
fn response_items(body: &Value) -> &[Value] {
    match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

fn extract_options(body: &Value, level: CatalogLevel) -> Vec<CatalogOption> {
    let unique: BTreeSet<CatalogOption> = response_items(body)
        .iter()
        .filter_map(|item| CatalogOption::from_item(item, level))
        .collect();

    // Ord on CatalogOption compares name first, so the set is already in name order.
    unique.into_iter().collect()
}

// -- Tests -------------------------------------------------------------------
