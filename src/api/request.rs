//! Request construction: URLs, bodies, and the wrap flag.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::api::error::{ApiError, ApiResult};

/// Path segment every admin resource lives under.
pub const API_ENDPOINT: &str = "api";

/// How a property value is placed in a write request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueEncoding {
    /// Sent unmodified.
    Raw,
    /// Sent as `{"value": <value>}`.
    #[default]
    Wrapped,
}

impl From<bool> for ValueEncoding {
    fn from(wrap: bool) -> Self {
        if wrap {
            ValueEncoding::Wrapped
        } else {
            ValueEncoding::Raw
        }
    }
}

/// Query parameters appended to a resource URL, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build `<base>/api/<resource>` plus URL-encoded query parameters.
///
/// Slashes in `resource` separate path segments; every other reserved
/// character is percent-encoded. `.` and `..` segments would be collapsed
/// by URL normalization, so a resource containing one is rejected.
/// `base` must be able to carry a path.
pub fn build_api_url(base: &Url, resource: &str, params: &QueryParams) -> ApiResult<Url> {
    if resource.split('/').any(is_dot_segment) {
        return Err(ApiError::InvalidPropertyName {
            name: resource.to_string(),
        });
    }

    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push(API_ENDPOINT)
            .extend(resource.split('/'));
    }

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Payload of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content: String,
    pub content_type: &'static str,
}

impl RequestBody {
    pub fn raw(value: &str) -> Self {
        Self {
            content: value.to_string(),
            content_type: "text/plain; charset=utf-8",
        }
    }

    /// `{"value": <value>}` with the value JSON-escaped.
    pub fn wrapped(value: &str) -> Self {
        let escaped = Value::String(value.to_string());
        Self {
            content: format!("{{\"value\": {}}}", escaped),
            content_type: "application/json",
        }
    }

    pub fn encode(value: &str, encoding: ValueEncoding) -> Self {
        match encoding {
            ValueEncoding::Raw => Self::raw(value),
            ValueEncoding::Wrapped => Self::wrapped(value),
        }
    }
}

/// A fully built admin API request, handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<RequestBody>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://10.129.0.1/admin").unwrap()
    }

    #[test]
    fn test_url_without_params() {
        let url = build_api_url(&base(), "ssid", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://10.129.0.1/admin/api/ssid");
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let base = Url::parse("http://10.129.0.1/admin/").unwrap();
        let url = build_api_url(&base, "hostname", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://10.129.0.1/admin/api/hostname");
    }

    #[test]
    fn test_url_with_root_base() {
        let base = Url::parse("http://box.local").unwrap();
        let url = build_api_url(&base, "staticsite", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "http://box.local/api/staticsite");
    }

    #[test]
    fn test_url_params_are_encoded() {
        let mut params = QueryParams::new();
        params.insert("since", "2024-01-01 10:00").insert("a", "x&y");
        let url = build_api_url(&base(), "logs", &params).unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.129.0.1/admin/api/logs?a=x%26y&since=2024-01-01+10%3A00"
        );
    }

    #[test]
    fn test_resource_segments_are_escaped() {
        let url = build_api_url(&base(), "wifi/pass word", &QueryParams::new()).unwrap();
        assert_eq!(url.path(), "/admin/api/wifi/pass%20word");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        for resource in ["..", ".", "a/../b", "../secret", "ssid/."] {
            let err = build_api_url(&base(), resource, &QueryParams::new()).unwrap_err();
            assert_eq!(
                err,
                ApiError::InvalidPropertyName {
                    name: resource.to_string()
                }
            );
        }
    }

    #[test]
    fn test_dots_inside_names_are_kept() {
        let url = build_api_url(&base(), "v1.2/...x", &QueryParams::new()).unwrap();
        assert_eq!(url.path(), "/admin/api/v1.2/...x");
    }

    #[test]
    fn test_wrapped_body_layout() {
        let body = RequestBody::wrapped("v");
        assert_eq!(body.content, r#"{"value": "v"}"#);
        assert_eq!(body.content_type, "application/json");
    }

    #[test]
    fn test_wrapped_body_escapes_quotes_and_controls() {
        let body = RequestBody::wrapped("say \"hi\"\n");
        assert_eq!(body.content, r#"{"value": "say \"hi\"\n"}"#);

        let parsed: Value = serde_json::from_str(&body.content).unwrap();
        assert_eq!(parsed["value"], "say \"hi\"\n");
    }

    #[test]
    fn test_raw_body_is_unmodified() {
        let body = RequestBody::encode("v", ValueEncoding::Raw);
        assert_eq!(body.content, "v");
    }

    #[test]
    fn test_wrap_flag_conversion() {
        assert_eq!(ValueEncoding::from(true), ValueEncoding::Wrapped);
        assert_eq!(ValueEncoding::from(false), ValueEncoding::Raw);
    }
}
