//! LexML Harvester - Search Brazilian legislation over SRU.
//!
//! This crate pages through the result set of a CQL query against the LexML
//! SRU endpoint, keeps every fetched page, saves the pages as XML files and
//! converts saved pages into flat JSON records.
//!
//! # Example
//!
//! ```
//! use lexml_harvester::config::{resource_url, search_url, SRU_BASE_URL};
//!
//! let url = search_url(SRU_BASE_URL, "date=2019", 1, 10);
//! assert!(url.ends_with("query=date=2019&startRecord=1&maximumRecords=10"));
//! assert_eq!(
//!     resource_url("urn:lex:br:federal:lei:2019"),
//!     "https://www.lexml.gov.br/urn/urn:lex:br:federal:lei:2019"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Endpoint constants, URL building, validation, client settings
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP transport and response decoding
//! - [`xml`]: XML utilities
//! - [`sru`]: SRU response classification (results vs. diagnostics)
//! - [`types`]: Pages, fetch outcomes, extracted records
//! - [`session`]: Paginated search session
//! - [`extract`]: Record extraction from saved pages
//! - [`output`]: JSON output
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Search-and-save and convert services

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod http;
pub mod output;
pub mod session;
pub mod sru;
pub mod types;
pub mod xml;

// Re-export main functions
pub use harvester::{convert_file, harvest, HarvestReport, HarvestRequest};

// Re-export commonly used items
pub use config::ClientConfig;
pub use error::{HarvesterError, Result};
pub use extract::{Extraction, RecordExtractor};
pub use http::{HttpResponse, Transport};
pub use session::SearchSession;
pub use types::{ExtractedRecord, FetchOutcome, Page, PaginationSummary};
