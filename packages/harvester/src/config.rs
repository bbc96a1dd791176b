//! Configuration constants and validation functions for the harvester.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// SRU endpoint of the LexML search service.
pub const SRU_BASE_URL: &str = "https://www.lexml.gov.br/busca/SRU";

/// SRU protocol version sent with every request.
pub const SRU_VERSION: &str = "1.1";

/// Base URL under which LexML resolves document URNs.
pub const RESOURCE_BASE_URL: &str = "https://www.lexml.gov.br/urn/";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Page size used by the CLI when none is given.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Upper bound on pages fetched by a single auto-pagination run.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Nesting depth of result items in a search response (root element = 1).
pub const ITEM_DEPTH: usize = 5;

/// Allowed characters for the base filename of saved pages.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid regex"));

/// Runtime settings for a search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// SRU endpoint, without query parameters.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Guard for auto-pagination.
    pub max_pages: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: SRU_BASE_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ClientConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Reads `LEXML_SRU_URL`, `LEXML_HTTP_TIMEOUT_SECS` and `LEXML_MAX_PAGES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("LEXML_SRU_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = std::env::var("LEXML_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_pages = std::env::var("LEXML_MAX_PAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_pages);

        Self {
            base_url,
            timeout,
            max_pages,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Validate the pagination parameters of a single request.
///
/// # Examples
/// ```
/// use lexml_harvester::config::validate_page_params;
///
/// assert!(validate_page_params(1, 10).is_ok());
/// assert!(validate_page_params(0, 10).is_err());
/// assert!(validate_page_params(1, 0).is_err());
/// ```
pub fn validate_page_params(start_record: u64, max_records: u64) -> Result<()> {
    if start_record < 1 {
        return Err(HarvesterError::InvalidStartRecord(start_record));
    }
    if max_records < 1 {
        return Err(HarvesterError::InvalidPageSize(max_records));
    }
    Ok(())
}

/// Validate the base filename used when saving pages.
///
/// # Examples
/// ```
/// use lexml_harvester::config::validate_base_filename;
///
/// assert!(validate_base_filename("leis_2019").is_ok());
/// assert!(validate_base_filename("../etc").is_err());
/// ```
pub fn validate_base_filename(name: &str) -> Result<()> {
    if FILENAME_PATTERN.is_match(name) && name != "." && name != ".." {
        Ok(())
    } else {
        Err(HarvesterError::InvalidFilename(name.to_string()))
    }
}

/// Escape a CQL query for embedding in the request URL.
///
/// Only spaces are escaped. Other CQL characters pass through unchanged.
///
/// # Examples
/// ```
/// use lexml_harvester::config::escape_query;
///
/// assert_eq!(escape_query("tipoDocumento = Lei"), "tipoDocumento%20=%20Lei");
/// ```
pub fn escape_query(query: &str) -> String {
    query.replace(' ', "%20")
}

/// Build a searchRetrieve URL for one page.
pub fn search_url(base_url: &str, query: &str, start_record: u64, max_records: u64) -> String {
    format!(
        "{base_url}?operation=searchRetrieve&version={SRU_VERSION}&query={}&startRecord={start_record}&maximumRecords={max_records}",
        escape_query(query)
    )
}

/// Build the public URL of a document from its URN.
///
/// # Examples
/// ```
/// use lexml_harvester::config::resource_url;
///
/// assert_eq!(
///     resource_url("urn:lex:br:federal:lei:2019"),
///     "https://www.lexml.gov.br/urn/urn:lex:br:federal:lei:2019"
/// );
/// ```
pub fn resource_url(urn: &str) -> String {
    format!("{RESOURCE_BASE_URL}{urn}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page_params() {
        assert!(validate_page_params(1, 1).is_ok());
        assert!(validate_page_params(21, 10).is_ok());
        assert!(matches!(
            validate_page_params(0, 10),
            Err(HarvesterError::InvalidStartRecord(0))
        ));
        assert!(matches!(
            validate_page_params(1, 0),
            Err(HarvesterError::InvalidPageSize(0))
        ));
    }

    #[test]
    fn test_validate_base_filename() {
        assert!(validate_base_filename("leis").is_ok());
        assert!(validate_base_filename("date-2019.v1").is_ok());
        assert!(validate_base_filename("").is_err());
        assert!(validate_base_filename("..").is_err());
        assert!(validate_base_filename("a/b").is_err());
        assert!(validate_base_filename("with space").is_err());
    }

    #[test]
    fn test_escape_query_only_spaces() {
        assert_eq!(escape_query("date=2019"), "date=2019");
        assert_eq!(
            escape_query("dc.title any \"saude\""),
            "dc.title%20any%20\"saude\""
        );
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url(SRU_BASE_URL, "date=2019", 11, 10),
            "https://www.lexml.gov.br/busca/SRU?operation=searchRetrieve&version=1.1&query=date=2019&startRecord=11&maximumRecords=10"
        );
    }

    #[test]
    fn test_search_url_escapes_spaces() {
        let url = search_url("http://localhost/SRU", "tipoDocumento = Lei", 1, 5);
        assert!(url.contains("query=tipoDocumento%20=%20Lei&"));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, SRU_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(HTTP_TIMEOUT_SECS));
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:9000/SRU")
            .with_timeout(Duration::from_secs(2))
            .with_max_pages(3);
        assert_eq!(config.base_url, "http://localhost:9000/SRU");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.max_pages, 3);
    }
}
