//! Parsing of SRU searchRetrieve responses.
//!
//! A response is either a diagnostics document (the query was rejected) or a
//! result set. Fields are located by name, never by position.

use roxmltree::{Document, Node};

use crate::error::{HarvesterError, Result};
use crate::xml::{child_text, find_child, find_children, get_tag_name};

/// Diagnostic reported by the SRU service instead of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic identifier, e.g. `info:srw/diagnostic/1/10`.
    pub uri: Option<String>,
    /// Error type or details reported alongside the message.
    pub details: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
}

impl Diagnostic {
    /// Human-readable description.
    ///
    /// `details: message` when both are present, otherwise whichever exists.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.details, &self.message) {
            (Some(details), Some(message)) => format!("{details}: {message}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => self
                .uri
                .clone()
                .unwrap_or_else(|| "unknown diagnostic".to_string()),
        }
    }
}

/// Counts read from a valid result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSet {
    /// Total size of the remote result set.
    pub number_of_records: u64,
    /// Records carried by this page.
    pub records_returned: usize,
}

/// Classified SRU response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SruResponse {
    Diagnostic(Diagnostic),
    Results(ResultSet),
}

/// Whether the document root is a diagnostics element.
pub fn is_diagnostics(doc: &Document<'_>) -> bool {
    get_tag_name(doc.root_element()).contains("diagnostics")
}

/// Classify a parsed response document.
pub fn parse_response(doc: &Document<'_>) -> Result<SruResponse> {
    if is_diagnostics(doc) {
        return Ok(SruResponse::Diagnostic(parse_diagnostic(doc)));
    }

    let root = doc.root_element();
    Ok(SruResponse::Results(ResultSet {
        number_of_records: parse_number_of_records(root)?,
        records_returned: count_records(root),
    }))
}

/// Extract the first diagnostic from a diagnostics document.
pub fn parse_diagnostic(doc: &Document<'_>) -> Diagnostic {
    let root = doc.root_element();
    let source = find_child(root, "diagnostic").unwrap_or(root);

    let field = |tag: &str| child_text(source, tag).filter(|s| !s.is_empty());

    Diagnostic {
        uri: field("uri"),
        details: field("details"),
        message: field("message"),
    }
}

fn parse_number_of_records(root: Node<'_, '_>) -> Result<u64> {
    let text = child_text(root, "numberOfRecords").ok_or_else(|| {
        HarvesterError::MissingElement {
            element: "numberOfRecords".to_string(),
            context: get_tag_name(root).to_string(),
        }
    })?;

    text.parse()
        .map_err(|_| HarvesterError::InvalidRecordCount(text))
}

fn count_records(root: Node<'_, '_>) -> usize {
    find_child(root, "records")
        .map(|records| find_children(records, "record").count())
        .unwrap_or(0)
}
