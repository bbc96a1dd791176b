//! Extraction of flat records from saved search result pages.
//!
//! Result items sit at a fixed depth in a searchRetrieve response
//! (`searchRetrieveResponse/records/record/recordData/dc`). Each item's
//! fields are looked up by local name.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::config::{resource_url, ITEM_DEPTH};
use crate::error::{HarvesterError, Result};
use crate::types::ExtractedRecord;
use crate::xml::{child_text, elements_at_depth};

/// Records extracted in lenient mode, plus one warning per skipped item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ExtractedRecord>,
    pub warnings: Vec<String>,
}

/// Reads a saved page and turns its result items into records.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    xml: String,
}

impl RecordExtractor {
    /// Read the whole file at `path`. Parsing is deferred to extraction.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HarvesterError::at_path(path, e),
            _ => HarvesterError::Io(e),
        })?;
        Ok(Self { xml })
    }

    /// Use XML text already in memory.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Extract every result item.
    ///
    /// Fails on the first item that lacks a field.
    pub fn extract_all(&self) -> Result<Vec<ExtractedRecord>> {
        let doc = Document::parse(&self.xml)?;
        result_items(&doc)
            .into_iter()
            .enumerate()
            .map(|(index, item)| extract_record(item, index))
            .collect()
    }

    /// Extract every complete result item, skipping the rest.
    pub fn extract_lenient(&self) -> Result<Extraction> {
        let doc = Document::parse(&self.xml)?;
        let mut extraction = Extraction::default();

        for (index, item) in result_items(&doc).into_iter().enumerate() {
            match extract_record(item, index) {
                Ok(record) => extraction.records.push(record),
                Err(e) => {
                    tracing::warn!(item = index, error = %e, "Skipping result item");
                    extraction.warnings.push(e.to_string());
                }
            }
        }

        Ok(extraction)
    }
}

fn result_items<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    elements_at_depth(doc.root_element(), ITEM_DEPTH)
}

fn extract_record(item: Node<'_, '_>, index: usize) -> Result<ExtractedRecord> {
    let field = |name: &str| {
        child_text(item, name).ok_or_else(|| HarvesterError::MissingField {
            field: name.to_string(),
            item: index,
        })
    };

    let urn = field("urn")?;
    Ok(ExtractedRecord {
        document_type: field("tipoDocumento")?,
        document_type_facet: field("facet-tipoDocumento")?,
        date: field("date")?,
        url: resource_url(&urn),
        urn,
        locality: field("localidade")?,
        locality_facet: field("facet-localidade")?,
        authority: field("autoridade")?,
        authority_facet: field("facet-autoridade")?,
        title: field("title")?,
        description: field("description")?,
        kind: field("type")?,
        identifier: field("identifier")?,
    })
}
