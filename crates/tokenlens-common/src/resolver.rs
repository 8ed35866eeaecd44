//! Token URI resolution.
//!
//! A token's metadata pointer comes back from the contract in one of
//! four shapes: inline base64 JSON, inline plain text, an `ipfs://`
//! reference, or a plain HTTP(S) URL. Classification is a first-match
//! walk over those prefixes; the two remote shapes are fetched through
//! a public gateway or directly and parsed as JSON. Each resolution is
//! a single best-effort attempt: no retries, no caching, the HTTP
//! client's default timeout.

use base64::Engine;
use serde_json::Value;
use thiserror::Error;

/// Public gateway used to dereference `ipfs://` URIs.
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

const BASE64_JSON_PREFIX: &str = "data:application/json;base64,";
const PLAIN_TEXT_PREFIX: &str = "data:text/plain;charset=utf-8,";

/// A classified token URI, borrowing the payload slice of the input.
///
/// Produced by [`classify`] with first-match semantics: the order of
/// the prefix tests is fixed, so a URI matching several patterns takes
/// the earliest tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUriScheme<'a> {
    /// `data:application/json;base64,` — inline base64-encoded JSON.
    Base64Json(&'a str),
    /// `data:text/plain;charset=utf-8,` — the remainder IS the metadata.
    PlainText(&'a str),
    /// `ipfs://` — content path to rewrite onto an HTTP gateway.
    Ipfs(&'a str),
    /// `http://` or `https://` — fetch the URI as-is.
    Http(&'a str),
}

/// Classify a raw token URI. Returns `None` when no known prefix matches.
pub fn classify(uri: &str) -> Option<TokenUriScheme<'_>> {
    if let Some(payload) = uri.strip_prefix(BASE64_JSON_PREFIX) {
        return Some(TokenUriScheme::Base64Json(payload));
    }
    if let Some(payload) = uri.strip_prefix(PLAIN_TEXT_PREFIX) {
        return Some(TokenUriScheme::PlainText(payload));
    }
    if let Some(path) = uri.strip_prefix("ipfs://") {
        return Some(TokenUriScheme::Ipfs(path));
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Some(TokenUriScheme::Http(uri));
    }
    None
}

/// Decoded token metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataPayload {
    /// Parsed JSON document (base64, IPFS, and HTTP schemes).
    Json(Value),
    /// Verbatim text (plain-text scheme, e.g. Autoglyphs-style art).
    Text(String),
}

/// Malformed payload inside an otherwise-recognized scheme.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport-level failure while dereferencing a remote URI.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Why a token URI could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The URI matched none of the recognized schemes.
    #[error("unrecognized token URI scheme: {0:?}")]
    UnrecognizedScheme(String),
    /// The scheme was recognized but its payload was malformed.
    #[error("failed to decode token metadata: {0}")]
    Decode(#[from] DecodeError),
    /// The network fetch for an IPFS or HTTP reference failed.
    #[error("failed to fetch {url}: {source}")]
    RemoteFetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Resolves token URIs into decoded metadata.
///
/// Holds the HTTP client for the remote schemes and the IPFS gateway
/// base. Stateless across calls: one URI in, one payload or error out.
pub struct MetadataResolver {
    client: reqwest::Client,
    ipfs_gateway: String,
}

impl MetadataResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            ipfs_gateway: IPFS_GATEWAY.to_string(),
        }
    }

    /// Override the IPFS gateway base (must end with a path separator,
    /// e.g. `https://ipfs.io/ipfs/`).
    pub fn with_ipfs_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.ipfs_gateway = gateway.into();
        self
    }

    /// Resolve a raw token URI into its decoded metadata.
    pub async fn resolve(&self, uri: &str) -> Result<MetadataPayload, ResolveError> {
        match classify(uri) {
            Some(TokenUriScheme::Base64Json(payload)) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(payload)
                    .map_err(DecodeError::from)?;
                let text = String::from_utf8(bytes).map_err(DecodeError::from)?;
                let value: Value = serde_json::from_str(&text).map_err(DecodeError::from)?;
                Ok(MetadataPayload::Json(value))
            }
            Some(TokenUriScheme::PlainText(payload)) => {
                Ok(MetadataPayload::Text(payload.to_string()))
            }
            Some(TokenUriScheme::Ipfs(path)) => {
                let url = format!("{}{}", self.ipfs_gateway, path);
                self.fetch_json(&url).await
            }
            Some(TokenUriScheme::Http(url)) => self.fetch_json(url).await,
            None => Err(ResolveError::UnrecognizedScheme(uri.to_string())),
        }
    }

    /// GET a URL and parse the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<MetadataPayload, ResolveError> {
        tracing::debug!(
            target: "tokenlens_common::resolver",
            url = %url,
            "fetching token metadata"
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::RemoteFetch {
                url: url.to_string(),
                source: FetchError::Transport(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::RemoteFetch {
                url: url.to_string(),
                source: FetchError::Status(status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::RemoteFetch {
                url: url.to_string(),
                source: FetchError::Transport(e),
            })?;

        let value: Value = serde_json::from_str(&body).map_err(DecodeError::from)?;
        Ok(MetadataPayload::Json(value))
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_order_and_payloads() {
        assert_eq!(
            classify("data:application/json;base64,eyJ9"),
            Some(TokenUriScheme::Base64Json("eyJ9"))
        );
        assert_eq!(
            classify("data:text/plain;charset=utf-8,hello"),
            Some(TokenUriScheme::PlainText("hello"))
        );
        assert_eq!(
            classify("ipfs://bafybeigdyrzt/1.json"),
            Some(TokenUriScheme::Ipfs("bafybeigdyrzt/1.json"))
        );
        assert_eq!(
            classify("https://example.com/meta/1.json"),
            Some(TokenUriScheme::Http("https://example.com/meta/1.json"))
        );
        assert_eq!(
            classify("http://example.com/meta/1.json"),
            Some(TokenUriScheme::Http("http://example.com/meta/1.json"))
        );
        assert_eq!(classify("ar://abc123"), None);
        assert_eq!(classify(""), None);
    }

    #[tokio::test]
    async fn test_resolve_base64_json() {
        let resolver = MetadataResolver::new();
        // {"name":"test"}
        let payload = resolver
            .resolve("data:application/json;base64,eyJuYW1lIjoidGVzdCJ9")
            .await
            .unwrap();
        assert_eq!(payload, MetadataPayload::Json(json!({"name": "test"})));
    }

    #[tokio::test]
    async fn test_resolve_base64_round_trip() {
        let original = json!({
            "name": "Glyph #7",
            "attributes": [{"trait_type": "Symmetry", "value": "X/Y"}],
            "count": 42,
        });
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(serde_json::to_string(&original).unwrap());
        let uri = format!("data:application/json;base64,{encoded}");

        let resolver = MetadataResolver::new();
        let payload = resolver.resolve(&uri).await.unwrap();
        assert_eq!(payload, MetadataPayload::Json(original));
    }

    #[tokio::test]
    async fn test_resolve_plain_text_verbatim() {
        let resolver = MetadataResolver::new();
        // Remainder is used as-is, commas and all.
        let payload = resolver
            .resolve("data:text/plain;charset=utf-8,.X./.\\.O,#.#")
            .await
            .unwrap();
        assert_eq!(payload, MetadataPayload::Text(".X./.\\.O,#.#".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_malformed_base64_is_decode_error() {
        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve("data:application/json;base64,!!!not-base64!!!")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(DecodeError::Base64(_))));
    }

    #[tokio::test]
    async fn test_resolve_base64_of_invalid_json_is_decode_error() {
        // "not json" in base64
        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve("data:application/json;base64,bm90IGpzb24=")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(DecodeError::Json(_))));
    }

    #[tokio::test]
    async fn test_resolve_base64_of_invalid_utf8_is_decode_error() {
        // 0xFF 0xFE is not UTF-8
        let encoded = base64::engine::general_purpose::STANDARD.encode([0xFFu8, 0xFE]);
        let resolver = MetadataResolver::new();
        let err = resolver
            .resolve(&format!("data:application/json;base64,{encoded}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(DecodeError::Utf8(_))));
    }

    #[tokio::test]
    async fn test_resolve_unrecognized_scheme_is_an_error() {
        let resolver = MetadataResolver::new();
        let err = resolver.resolve("ar://abc123").await.unwrap_err();
        match err {
            ResolveError::UnrecognizedScheme(uri) => assert_eq!(uri, "ar://abc123"),
            other => panic!("expected UnrecognizedScheme, got {other:?}"),
        }
    }
}
