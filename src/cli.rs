//! CLI argument definitions using clap derive macros.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use eia_archiver_core::query::{DEFAULT_START, FacetValue, parse_facet};
use eia_archiver_core::{Frequency, MAX_PAGE_LENGTH, QueryOptions, SortDirective};

/// Archive EIA API query results as compressed JSON.
///
/// Downloads every page of each query and writes one gzipped JSON array per
/// frequency into a fresh, numbered run directory.
#[derive(Parser, Debug)]
#[command(name = "eia-archiver")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Frequencies to archive, one file each (default: annual and monthly)
    #[arg(short, long = "frequency", value_name = "FREQUENCY")]
    pub frequencies: Vec<Frequency>,

    /// Data columns to request
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values_t = ["cost-per-btu".to_string(), "receipts-btu".to_string()]
    )]
    pub data: Vec<String>,

    /// First period to request
    #[arg(long, default_value = DEFAULT_START)]
    pub start: String,

    /// Last period to request
    #[arg(long)]
    pub end: Option<String>,

    /// Facet filter as NAME=VALUE[,VALUE...] (repeatable)
    #[arg(long = "facet", value_name = "NAME=VALUES", value_parser = parse_facet)]
    pub facets: Vec<(String, Vec<FacetValue>)>,

    /// Sort directive as COLUMN:asc|desc (repeatable)
    #[arg(long = "sort", value_name = "COLUMN:DIRECTION")]
    pub sort: Vec<SortDirective>,

    /// Rows per request (1-5000)
    #[arg(short, long, default_value_t = MAX_PAGE_LENGTH, value_parser = clap::value_parser!(u64).range(1..=5000))]
    pub length: u64,

    /// Root directory for run directories (overrides EIA_ARCHIVER_OUTPUT_DIR)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Frequencies to archive, in order.
    #[must_use]
    pub fn frequencies(&self) -> Vec<Frequency> {
        if self.frequencies.is_empty() {
            vec![Frequency::Annual, Frequency::Monthly]
        } else {
            self.frequencies.clone()
        }
    }

    /// Query options for one frequency.
    #[must_use]
    pub fn query_options(&self, frequency: Frequency) -> QueryOptions {
        let mut facets: BTreeMap<String, Vec<FacetValue>> = BTreeMap::new();
        for (name, values) in &self.facets {
            facets
                .entry(name.clone())
                .or_default()
                .extend(values.iter().cloned());
        }

        QueryOptions {
            frequency,
            data: self.data.clone(),
            start: Some(self.start.clone()),
            end: self.end.clone(),
            offset: 0,
            length: self.length,
            facets,
            sort: self.sort.clone(),
        }
    }
}
