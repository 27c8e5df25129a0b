//! HTTP method inference from call sites.

use crate::core::endpoint::HttpMethod;

/// Client calls whose callee name carries the method, as in `api.post(...)`.
pub const CALL_METHODS: &[(&str, HttpMethod)] = &[
    ("get", HttpMethod::Get),
    ("post", HttpMethod::Post),
    ("put", HttpMethod::Put),
    ("patch", HttpMethod::Patch),
    ("delete", HttpMethod::Delete),
    ("head", HttpMethod::Head),
    ("options", HttpMethod::Options),
];

/// Functions taking `(url, init?)` where a missing `init.method` means GET.
pub const FETCH_LIKE: &[&str] = &["fetch", "$fetch", "ofetch", "useFetch"];

/// Object keys holding the request path in config-style calls, as in
/// `axios({ url: '/users', method: 'post' })`.
pub const URL_KEYS: &[&str] = &["url", "path"];

pub const METHOD_KEY: &str = "method";

pub fn method_from_call_name(name: &str) -> Option<HttpMethod> {
    CALL_METHODS
        .iter()
        .find(|(call, _)| *call == name)
        .map(|(_, method)| *method)
}

pub fn is_fetch_like(name: &str) -> bool {
    FETCH_LIKE.contains(&name)
}

pub fn is_url_key(name: &str) -> bool {
    URL_KEYS.contains(&name)
}

/// Parse the value of a `method` option (`'POST'`, `"delete"`).
pub fn parse_method_value(value: &str) -> Option<HttpMethod> {
    value.trim().parse().ok()
}
