//! Paginated search session against the SRU endpoint.
//!
//! A [`SearchSession`] owns one query and walks its remote result set page by
//! page. The total size of the result set is learned from the first valid
//! response and never changes afterwards.
//!
//! The cursor advances by the requested page size, not by the number of
//! records a page actually carried. Requesting `P` records per page from a
//! result set of `T` records therefore completes after `ceil(T / P)` fetches.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use roxmltree::Document;

use crate::config::{search_url, validate_base_filename, validate_page_params, ClientConfig};
use crate::error::{HarvesterError, Result};
use crate::http::{create_client, decode_body, Transport};
use crate::output::write_atomic;
use crate::sru::{parse_diagnostic, parse_response, SruResponse};
use crate::types::{FetchOutcome, Page, PaginationSummary};

/// State of one pagination run over a query.
#[derive(Debug)]
pub struct SearchSession<T = Client> {
    transport: T,
    base_url: String,
    max_pages: usize,
    query: String,
    consumed_count: u64,
    total_count: Option<u64>,
    completed: bool,
    pages: Vec<Page>,
}

impl SearchSession<Client> {
    /// Create a session for `query` with the default configuration.
    ///
    /// No request is made until the first fetch.
    pub fn new(query: impl Into<String>) -> Result<Self> {
        Self::with_config(query, ClientConfig::default())
    }

    /// Create a session for `query` using `config`.
    pub fn with_config(query: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = create_client(config.timeout)?;
        Ok(Self::with_transport(query, client, config))
    }
}

impl<T: Transport> SearchSession<T> {
    /// Create a session that sends its requests through `transport`.
    pub fn with_transport(query: impl Into<String>, transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url,
            max_pages: config.max_pages,
            query: query.into(),
            consumed_count: 0,
            total_count: None,
            completed: false,
            pages: Vec::new(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Records requested so far across all pages.
    #[must_use]
    pub fn consumed_count(&self) -> u64 {
        self.consumed_count
    }

    /// Size of the remote result set, once known.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Records not yet requested, once the total is known.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.total_count
            .map(|total| total.saturating_sub(self.consumed_count))
    }

    /// Pages fetched so far, in fetch order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Fetch one page of `max_records` records starting at `start_record`.
    ///
    /// A diagnostics response yields [`HarvesterError::Diagnostic`] and
    /// leaves the session untouched. Fetching after completion is allowed;
    /// the request is still sent.
    pub fn fetch_page(&mut self, start_record: u64, max_records: u64) -> Result<FetchOutcome<'_>> {
        validate_page_params(start_record, max_records)?;

        if self.completed {
            tracing::info!(
                query = %self.query,
                "All records for this query have already been consumed"
            );
        }

        let url = search_url(&self.base_url, &self.query, start_record, max_records);
        let response = self.transport.get(&url)?;
        if !response.is_success() {
            tracing::warn!(status = response.status, url = %url, "SRU request returned an error status");
            return Err(error_from_failed_response(&response.body, response.status, url));
        }

        let xml = decode_body(&response.body, &url)?;

        let doc = Document::parse(&xml)?;
        let result_set = match parse_response(&doc)? {
            SruResponse::Diagnostic(diagnostic) => {
                let message = diagnostic.describe();
                tracing::warn!(query = %self.query, %message, "SRU diagnostic");
                return Err(HarvesterError::Diagnostic { message });
            }
            SruResponse::Results(result_set) => result_set,
        };
        drop(doc);

        let total = *self.total_count.get_or_insert(result_set.number_of_records);
        if result_set.number_of_records == 0 {
            tracing::info!(query = %self.query, "Query returned no results");
        }

        let index = self.pages.len();
        self.pages.push(Page::new(
            xml,
            start_record,
            result_set.number_of_records,
            result_set.records_returned,
        ));

        self.consumed_count = self.consumed_count.saturating_add(max_records);
        if self.consumed_count >= total && !self.completed {
            self.completed = true;
            tracing::info!(query = %self.query, total, "All records consumed, pagination finished");
        }

        if !self.completed {
            tracing::info!(
                from = start_record,
                to = self.consumed_count,
                remaining = total - self.consumed_count,
                "Fetched records"
            );
        }

        Ok(FetchOutcome {
            page: &self.pages[index],
            next_start_record: self.consumed_count.saturating_add(1),
            page_size: max_records,
        })
    }

    /// Fetch pages until the result set is consumed.
    ///
    /// Stops on completion, on the first error (which is returned), or after
    /// the configured maximum number of pages. Reaching the page limit is not
    /// an error; the summary reports `completed: false`.
    pub fn auto_paginate(&mut self, start_record: u64, max_records: u64) -> Result<PaginationSummary> {
        validate_page_params(start_record, max_records)?;

        let mut next_start = start_record;
        let mut pages_fetched = 0;

        while !self.completed {
            if pages_fetched >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    consumed = self.consumed_count,
                    total = ?self.total_count,
                    "Page limit reached before the result set was consumed"
                );
                break;
            }

            let outcome = self.fetch_page(next_start, max_records)?;
            next_start = outcome.next_start_record;
            pages_fetched += 1;
        }

        Ok(PaginationSummary {
            pages_fetched,
            completed: self.completed,
            consumed_count: self.consumed_count,
            total_count: self.total_count,
        })
    }

    /// Write every fetched page to `dir` as `{index}_{base_filename}.xml`.
    ///
    /// Creates `dir` and its parents as needed. Existing files with the same
    /// names are overwritten.
    ///
    /// # Returns
    /// Paths of the written files, in fetch order
    pub fn save_results(&self, dir: &Path, base_filename: &str) -> Result<Vec<PathBuf>> {
        validate_base_filename(base_filename)?;
        fs::create_dir_all(dir).map_err(|e| HarvesterError::at_path(dir, e))?;

        let mut written = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            let path = dir.join(format!("{index}_{base_filename}.xml"));
            write_atomic(&path, page.xml().as_bytes())
                .map_err(|e| HarvesterError::at_path(&path, e))?;
            tracing::debug!(path = %path.display(), "Saved page");
            written.push(path);
        }

        Ok(written)
    }
}

/// Turn a non-2xx response into an error.
///
/// The service sends a diagnostics document with some error statuses; its
/// message is preferred over the bare status.
fn error_from_failed_response(body: &[u8], status: u16, url: String) -> HarvesterError {
    let Ok(xml) = decode_body(body, &url) else {
        return HarvesterError::HttpStatus { status, url };
    };
    match Document::parse(&xml) {
        Ok(doc) if crate::sru::is_diagnostics(&doc) => HarvesterError::Diagnostic {
            message: parse_diagnostic(&doc).describe(),
        },
        _ => HarvesterError::HttpStatus { status, url },
    }
}
