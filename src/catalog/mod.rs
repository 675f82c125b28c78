//! The three-level India-WRIS catalog: dataset, then state, then district.

pub mod client;
pub mod resolver;

use std::fmt;

use serde_json::{json, Value};

use crate::error::{Result, WrisError};

pub use client::{CatalogClient, HttpCatalogClient};
pub use resolver::CatalogResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// One level of the catalog hierarchy, in resolution order.
pub enum CatalogLevel {
    Dataset,
    State,
    District,
}

impl CatalogLevel {
    /// Listing endpoint, relative to the catalog base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CatalogLevel::Dataset => "DataSet/DataSetList",
            CatalogLevel::State => "masterState/StateList",
            CatalogLevel::District => "masterDistrict/getDistrictbyState",
        }
    }

    /// Field spellings tried, in order, for an option's display name.
    pub fn name_fields(&self) -> &'static [&'static str] {
        match self {
            CatalogLevel::Dataset => &["datasetdescription", "dname", "dataSetName"],
            CatalogLevel::State => &["state", "stateName", "statename"],
            CatalogLevel::District => &["districtName", "districtname", "district"],
        }
    }

    /// Field spellings tried, in order, for an option's code.
    pub fn code_fields(&self) -> &'static [&'static str] {
        match self {
            CatalogLevel::Dataset => &["datasetcode", "dcode", "dataSetCode"],
            CatalogLevel::State => &["statecode", "stateCode"],
            CatalogLevel::District => &["districtCode", "districtcode", "districtId", "district_id"],
        }
    }

    /// Builds the JSON request body carrying the parent codes this level depends on.
    pub fn filter(&self, parent: &ParentContext) -> Result<Value> {
        let missing = || WrisError::MissingParent { level: *self };

        match self {
            CatalogLevel::Dataset => Ok(json!({
                "headers": { "normalizedNames": {}, "lazyUpdate": null }
            })),
            CatalogLevel::State => {
                let dataset = parent.dataset_code.as_ref().ok_or_else(missing)?;
                Ok(json!({ "datasetcode": dataset }))
            }
            CatalogLevel::District => {
                let dataset = parent.dataset_code.as_ref().ok_or_else(missing)?;
                let state = parent.state_code.as_ref().ok_or_else(missing)?;
                Ok(json!({ "statecode": state, "datasetcode": dataset }))
            }
        }
    }
}

impl fmt::Display for CatalogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogLevel::Dataset => "dataset",
            CatalogLevel::State => "state",
            CatalogLevel::District => "district",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A selectable (display name, code) entry at one catalog level.
pub struct CatalogOption {
    pub name: String,
    pub code: String,
}

impl CatalogOption {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        CatalogOption {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Extracts an option from one catalog item, or `None` if either the name
    /// or the code is absent under every known spelling.
    pub fn from_item(item: &Value, level: CatalogLevel) -> Option<Self> {
        let name = first_present(item, level.name_fields())?;
        let code = first_present(item, level.code_fields())?;

        Some(CatalogOption::new(name, code))
    }
}

impl fmt::Display for CatalogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

fn first_present(item: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match item.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Codes resolved so far, fed as filters into the next level's query.
pub struct ParentContext {
    pub dataset_code: Option<String>,
    pub state_code: Option<String>,
}

impl ParentContext {
    pub fn record(&mut self, level: CatalogLevel, option: &CatalogOption) {
        match level {
            CatalogLevel::Dataset => self.dataset_code = Some(option.code.clone()),
            CatalogLevel::State => self.state_code = Some(option.code.clone()),
            CatalogLevel::District => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The three selections needed to build an export request.
pub struct ResolvedFilterChain {
    dataset: CatalogOption,
    state: CatalogOption,
    district: CatalogOption,
}

impl ResolvedFilterChain {
    pub fn new(dataset: CatalogOption, state: CatalogOption, district: CatalogOption) -> Self {
        ResolvedFilterChain {
            dataset,
            state,
            district,
        }
    }

    pub fn dataset(&self) -> &CatalogOption {
        &self.dataset
    }

    pub fn state(&self) -> &CatalogOption {
        &self.state
    }

    pub fn district(&self) -> &CatalogOption {
        &self.district
    }
}

// -- Tests -------------------------------------------------------------------
