use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

/// Request header that asks for the list fragment instead of the full page.
pub const FRAGMENT_HEADER: &str = "x-fragment";

/// How a list endpoint should wrap its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Full,
    Fragment,
}

impl RenderMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_fragment = headers
            .get(FRAGMENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        if wants_fragment {
            Self::Fragment
        } else {
            Self::Full
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RenderMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_is_full() {
        assert_eq!(RenderMode::from_headers(&HeaderMap::new()), RenderMode::Full);
    }

    #[test]
    fn test_truthy_header_is_fragment() {
        for value in ["true", "1", "TRUE", " true "] {
            let mut headers = HeaderMap::new();
            headers.insert(FRAGMENT_HEADER, HeaderValue::from_str(value).unwrap());
            assert_eq!(RenderMode::from_headers(&headers), RenderMode::Fragment, "{value}");
        }
    }

    #[test]
    fn test_other_values_are_full() {
        let mut headers = HeaderMap::new();
        headers.insert(FRAGMENT_HEADER, HeaderValue::from_static("false"));
        assert_eq!(RenderMode::from_headers(&headers), RenderMode::Full);
    }

    #[test]
    fn test_library_specific_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert_eq!(RenderMode::from_headers(&headers), RenderMode::Full);
    }
}
