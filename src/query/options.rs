//! Typed query options and their value types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::config::MAX_PAGE_LENGTH;

/// Data columns requested when none are given.
pub const DEFAULT_DATA_FIELDS: &[&str] = &["cost-per-btu", "receipts-btu"];

/// First period requested when no start bound is given.
pub const DEFAULT_START: &str = "2001";

/// Error parsing a query value from text (CLI input).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseQueryValueError {
    #[error("unknown frequency '{0}': expected annual, quarterly or monthly")]
    Frequency(String),

    #[error("unknown sort direction '{0}': expected asc or desc")]
    Direction(String),

    #[error("invalid sort directive '{0}': expected COLUMN:DIRECTION")]
    Sort(String),

    #[error("invalid facet '{0}': expected NAME=VALUE[,VALUE...]")]
    Facet(String),
}

/// Time resolution of the returned series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Annual,
    Quarterly,
    Monthly,
}

impl Frequency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ParseQueryValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParseQueryValueError::Frequency(s.to_string())),
        }
    }
}

/// One allowed value of a facet filter. The API accepts codes as strings
/// (`"NG"`) and as integers (`98`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FacetValue {
    Text(String),
    Integer(i64),
}

impl FacetValue {
    /// Integers become [`FacetValue::Integer`], anything else stays text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Integer)
    }
}

/// Parses `name=v1,v2,...` into a facet name and its values.
///
/// # Errors
///
/// Returns [`ParseQueryValueError::Facet`] when the name or values are missing.
pub fn parse_facet(raw: &str) -> Result<(String, Vec<FacetValue>), ParseQueryValueError> {
    let (name, values) = raw
        .split_once('=')
        .ok_or_else(|| ParseQueryValueError::Facet(raw.to_string()))?;
    let name = name.trim();
    let values: Vec<FacetValue> = values
        .split(',')
        .filter(|value| !value.trim().is_empty())
        .map(FacetValue::parse)
        .collect();
    if name.is_empty() || values.is_empty() {
        return Err(ParseQueryValueError::Facet(raw.to_string()));
    }
    Ok((name.to_string(), values))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = ParseQueryValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseQueryValueError::Direction(s.to_string())),
        }
    }
}

/// One `{column, direction}` entry of the `sort` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortDirective {
    pub column: String,
    pub direction: SortDirection,
}

impl SortDirective {
    #[must_use]
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl FromStr for SortDirective {
    type Err = ParseQueryValueError;

    /// Parses `column:direction`, e.g. `period:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = s
            .split_once(':')
            .ok_or_else(|| ParseQueryValueError::Sort(s.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(ParseQueryValueError::Sort(s.to_string()));
        }
        Ok(Self::new(column, direction.parse()?))
    }
}

/// Named query options with API defaults.
///
/// Construct with struct-update syntax over [`Default`] and call
/// [`build`](Self::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub frequency: Frequency,
    /// Data columns to return.
    pub data: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub offset: u64,
    /// Rows per page; the server caps this at [`MAX_PAGE_LENGTH`].
    pub length: u64,
    pub facets: BTreeMap<String, Vec<FacetValue>>,
    pub sort: Vec<SortDirective>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            frequency: Frequency::Annual,
            data: DEFAULT_DATA_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            start: Some(DEFAULT_START.to_string()),
            end: None,
            offset: 0,
            length: MAX_PAGE_LENGTH,
            facets: BTreeMap::new(),
            sort: Vec::new(),
        }
    }
}
