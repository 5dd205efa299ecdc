//! HTTP security utilities.

/// Maximum body preview size for error messages (4KB).
///
/// Open API error pages are short; the preview only has to carry enough of
/// the body to tell a gateway error page from a JSON envelope.
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 4 * 1024;

/// Query parameter names whose values must never appear in logs or errors.
pub const SENSITIVE_QUERY_PARAMS: &[&str] = &["access_token", "appsecret", "code"];

/// Return `url` with the values of sensitive query parameters replaced by
/// `[REDACTED]`.
///
/// Used wherever a request URL ends up in an error message, since open API
/// credentials travel in the query string.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };

    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if SENSITIVE_QUERY_PARAMS.contains(&name) => {
                format!("{name}=[REDACTED]")
            }
            _ => pair.to_owned(),
        })
        .collect();

    format!("{base}?{}", redacted.join("&"))
}
