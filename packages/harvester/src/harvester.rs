//! Main harvester service that ties all components together.

use std::path::{Path, PathBuf};

use crate::config::{validate_base_filename, validate_page_params, ClientConfig};
use crate::error::Result;
use crate::extract::RecordExtractor;
use crate::output::save_json;
use crate::session::SearchSession;
use crate::types::{ExtractedRecord, PaginationSummary};

/// Parameters of a full harvest run.
#[derive(Debug, Clone)]
pub struct HarvestRequest<'a> {
    pub query: &'a str,
    pub start_record: u64,
    pub page_size: u64,
    pub output_dir: &'a Path,
    pub base_filename: &'a str,
}

/// Outcome of a harvest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub summary: PaginationSummary,
    pub files: Vec<PathBuf>,
}

/// Page through all results of a query and save every page.
///
/// Inputs are validated before any request is sent. When pagination fails
/// part way, the pages fetched before the error are still saved and the
/// pagination error is returned.
pub fn harvest(request: &HarvestRequest<'_>, config: ClientConfig) -> Result<HarvestReport> {
    validate_page_params(request.start_record, request.page_size)?;
    validate_base_filename(request.base_filename)?;

    let mut session = SearchSession::with_config(request.query, config)?;
    let summary = match session.auto_paginate(request.start_record, request.page_size) {
        Ok(summary) => summary,
        Err(e) => {
            save_partial(&session, request);
            return Err(e);
        }
    };
    let files = session.save_results(request.output_dir, request.base_filename)?;

    tracing::info!(
        query = request.query,
        pages = files.len(),
        completed = summary.completed,
        "Harvest finished"
    );

    Ok(HarvestReport { summary, files })
}

/// Save whatever pages a failed run fetched. Save errors are only logged so
/// the pagination error reaches the caller.
fn save_partial(session: &SearchSession, request: &HarvestRequest<'_>) {
    if session.pages().is_empty() {
        return;
    }
    match session.save_results(request.output_dir, request.base_filename) {
        Ok(files) => tracing::warn!(
            query = request.query,
            pages = files.len(),
            "Harvest interrupted, saved pages fetched so far"
        ),
        Err(e) => tracing::error!(
            query = request.query,
            error = %e,
            "Harvest interrupted, could not save pages fetched so far"
        ),
    }
}

/// Extract records from a saved page, optionally writing them as JSON.
///
/// In lenient mode, items with missing fields are skipped and described in
/// the returned warnings.
pub fn convert_file(
    xml_path: &Path,
    json_path: Option<&Path>,
    lenient: bool,
) -> Result<(Vec<ExtractedRecord>, Vec<String>)> {
    let extractor = RecordExtractor::from_path(xml_path)?;

    let (records, warnings) = if lenient {
        let extraction = extractor.extract_lenient()?;
        (extraction.records, extraction.warnings)
    } else {
        (extractor.extract_all()?, Vec::new())
    };

    if let Some(path) = json_path {
        save_json(&records, path)?;
    }

    Ok((records, warnings))
}
