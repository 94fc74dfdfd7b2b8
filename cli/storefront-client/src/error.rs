//! Error handling for storefront API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Common error type for storefront API operations.
///
/// Every request can fail in one of three ways:
/// the request never completed ([`Self::Transport`]),
/// the service answered with a non-2xx status ([`Self::Status`]),
/// or the body did not have the expected shape ([`Self::Decode`]).
#[derive(Debug, Error)]
pub enum StorefrontClientError {
    #[error("invalid storefront url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("could not reach the storefront service")]
    Transport(#[source] reqwest::Error),
    #[error("storefront service responded with {status}{}", fmt_body(.body))]
    Status { status: StatusCode, body: String },
    #[error("unexpected response from the storefront service")]
    Decode(#[source] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl StorefrontClientError {
    /// The HTTP status of a rejected request, if the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StorefrontClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error bodies may be HTML error pages, only show them when they are short.
fn fmt_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.len() > 200 || body.starts_with('<') {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Format an error and all of its sources on a single line.
pub fn display_chain(mut err: &dyn std::error::Error) -> String {
    let mut fmt = err.to_string();
    while let Some(source) = err.source() {
        fmt = format!("{fmt}: {source}");
        err = source;
    }

    fmt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_short_body() {
        let err = StorefrontClientError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "{\"message\":\"name is required\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "storefront service responded with 400 Bad Request: {\"message\":\"name is required\"}"
        );
    }

    #[test]
    fn status_error_omits_html_body() {
        let err = StorefrontClientError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "<html><body>Bad Gateway</body></html>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "storefront service responded with 502 Bad Gateway"
        );
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn display_chain_joins_sources() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StorefrontClientError::Decode(source);
        let chain = display_chain(&err);
        assert!(chain.starts_with("unexpected response from the storefront service: "));
        assert!(chain.len() > "unexpected response from the storefront service: ".len());
    }
}
