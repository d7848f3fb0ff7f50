//! Query construction for the EIA v2 data routes.
//!
//! [`QueryOptions`] holds named, typed options with the API defaults. Building
//! it yields a [`QuerySpec`] whose serialized form is the `X-Params` header
//! payload. Empty options are dropped from that payload; integer zero is not
//! empty, so `offset: 0` is always sent.
//!
//! # Example
//!
//! ```
//! use eia_archiver_core::query::{Frequency, QueryOptions};
//!
//! let spec = QueryOptions {
//!     frequency: Frequency::Monthly,
//!     end: Some("2020".to_string()),
//!     ..QueryOptions::default()
//! }
//! .build();
//!
//! let params = spec.to_params();
//! assert_eq!(params["frequency"], "monthly");
//! assert_eq!(params["offset"], 0);
//! assert!(params.get("facets").is_none());
//! ```

mod options;

pub use options::{
    DEFAULT_DATA_FIELDS, DEFAULT_START, FacetValue, Frequency, ParseQueryValueError,
    QueryOptions, SortDirection, SortDirective, parse_facet,
};

use std::collections::BTreeMap;

use serde::Serialize;

/// Immutable, filtered query parameters for one logical fetch.
///
/// Only the offset varies between the pages of a fetch; see
/// [`with_offset`](Self::with_offset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    frequency: Frequency,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    data: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    offset: u64,
    length: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    facets: BTreeMap<String, Vec<FacetValue>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<SortDirective>,
}

impl QueryOptions {
    /// Builds the query, dropping unset and empty values.
    ///
    /// Never rejects input: out-of-range page lengths are left for the
    /// fetcher and the server to refuse.
    #[must_use]
    pub fn build(&self) -> QuerySpec {
        QuerySpec {
            frequency: self.frequency,
            data: self
                .data
                .iter()
                .filter(|field| !field.is_empty())
                .cloned()
                .collect(),
            start: non_empty(self.start.as_deref()),
            end: non_empty(self.end.as_deref()),
            offset: self.offset,
            length: self.length,
            facets: self.facets.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl QuerySpec {
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Requested data columns, in request order.
    #[must_use]
    pub fn data(&self) -> &[String] {
        &self.data
    }

    #[must_use]
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    #[must_use]
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Rows requested per page.
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    #[must_use]
    pub fn facets(&self) -> &BTreeMap<String, Vec<FacetValue>> {
        &self.facets
    }

    #[must_use]
    pub fn sort(&self) -> &[SortDirective] {
        &self.sort
    }

    /// Returns a copy of this query that differs only in its offset.
    #[must_use]
    pub fn with_offset(&self, offset: u64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    /// Parameter payload as a JSON value.
    #[must_use]
    pub fn to_params(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parameter payload encoded for the `X-Params` request header.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be encoded.
    pub fn to_header_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// File name of the aggregate document for this query:
    /// `<frequency>_<field>..._<start>.json`.
    #[must_use]
    pub fn aggregate_file_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.data.len() + 2);
        parts.push(self.frequency.as_str());
        parts.extend(self.data.iter().map(String::as_str));
        parts.push(self.start.as_deref().unwrap_or("None"));
        format!("{}.json", parts.join("_"))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
