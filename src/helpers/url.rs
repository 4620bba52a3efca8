//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::BlogConfig;

/// Characters left as-is in a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// URL schemes allowed in user content
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/write") // -> "/blog/write"
/// ```
pub fn url_for(config: &BlogConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Page URL of a post
pub fn post_url(config: &BlogConfig, id: &str) -> String {
    url_for(config, &format!("blog/{}", encode_segment(id)))
}

/// Percent-encode a value for use as one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Filter a URL taken from user content.
///
/// Relative URLs and fragments pass, as do absolute URLs with a scheme from
/// [`SAFE_SCHEMES`]. Anything else becomes an empty string.
pub fn safe_url(url: &str) -> String {
    let url = url.trim();
    let scheme_end = url.find(|c| matches!(c, ':' | '/' | '?' | '#'));

    match scheme_end {
        Some(pos) if url[pos..].starts_with(':') => {
            let scheme = url[..pos].to_ascii_lowercase();
            if SAFE_SCHEMES.contains(&scheme.as_str()) {
                url.to_string()
            } else {
                String::new()
            }
        }
        _ => url.to_string(),
    }
}

/// Whether a URL points off-site
pub fn is_external(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}
