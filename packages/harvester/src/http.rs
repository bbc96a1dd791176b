//! HTTP transport for the SRU endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use unicode_normalization::UnicodeNormalization;

use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("lexml-harvester/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET request.
///
/// Non-2xx responses are returned as values; only failures to obtain a
/// response at all are errors.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl Transport for Client {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!(url, "GET");
        let response = Client::get(self, url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with the given timeout and the harvester user agent.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Decode a response body and apply NFKD normalization.
///
/// Invalid UTF-8 is rejected; `url` names the response in the error.
pub fn decode_body(bytes: &[u8], url: &str) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|source| HarvesterError::InvalidEncoding {
        url: url.to_string(),
        source,
    })?;
    Ok(text.nfkd().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_success() {
        let ok = HttpResponse {
            status: 200,
            body: Vec::new(),
        };
        let err = HttpResponse {
            status: 500,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn test_decode_body_applies_nfkd() {
        // U+00E7 decomposes to 'c' + U+0327, U+FB01 to "fi"
        let text = decode_body("Legisla\u{e7}\u{e3}o \u{fb01}scal".as_bytes(), "test").unwrap();
        assert_eq!(text, "Legislac\u{327}a\u{303}o fiscal");
    }

    #[test]
    fn test_decode_body_rejects_invalid_utf8() {
        let err = decode_body(&[b'a', 0xff, b'b'], "http://sru.test/SRU").unwrap_err();
        assert!(matches!(
            err,
            HarvesterError::InvalidEncoding { ref url, .. } if url == "http://sru.test/SRU"
        ));
    }
}
