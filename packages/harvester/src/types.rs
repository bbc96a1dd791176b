//! Core data types for the harvester.

use roxmltree::Document;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One fetched page of a search result set.
///
/// Holds the normalized XML text exactly as it was parsed, so saving a page
/// writes back the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    xml: String,
    start_record: u64,
    number_of_records: u64,
    records_returned: usize,
}

impl Page {
    pub(crate) fn new(
        xml: String,
        start_record: u64,
        number_of_records: u64,
        records_returned: usize,
    ) -> Self {
        Self {
            xml,
            start_record,
            number_of_records,
            records_returned,
        }
    }

    /// The normalized XML document text.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// 1-based position of the first record requested for this page.
    #[must_use]
    pub fn start_record(&self) -> u64 {
        self.start_record
    }

    /// Total result count reported by the service on this page.
    #[must_use]
    pub fn number_of_records(&self) -> u64 {
        self.number_of_records
    }

    /// Number of `record` elements present in this page.
    #[must_use]
    pub fn records_returned(&self) -> usize {
        self.records_returned
    }

    /// Parse the page into a navigable tree.
    pub fn parse(&self) -> Result<Document<'_>> {
        Ok(Document::parse(&self.xml)?)
    }
}

/// Result of a successful page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome<'a> {
    /// The page just appended to the session.
    pub page: &'a Page,
    /// Start record to pass to the next fetch.
    pub next_start_record: u64,
    /// Page size used for this fetch.
    pub page_size: u64,
}

/// Summary of an auto-pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Pages fetched by this run.
    pub pages_fetched: usize,
    /// Whether the session reached completion.
    pub completed: bool,
    /// Session cursor after the run.
    pub consumed_count: u64,
    /// Total count learned by the session, if any.
    pub total_count: Option<u64>,
}

/// Flat record extracted from one search result item.
///
/// Field names in the serialized form follow the LexML metadata vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "tipoDocumento")]
    pub document_type: String,

    #[serde(rename = "facet-tipoDocumento")]
    pub document_type_facet: String,

    #[serde(rename = "data")]
    pub date: String,

    pub urn: String,

    /// Public URL built from the URN.
    pub url: String,

    #[serde(rename = "localidade")]
    pub locality: String,

    #[serde(rename = "facet-localidade")]
    pub locality_facet: String,

    #[serde(rename = "autoridade")]
    pub authority: String,

    #[serde(rename = "facet-autoridade")]
    pub authority_facet: String,

    pub title: String,

    pub description: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub identifier: String,
}
