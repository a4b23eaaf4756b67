use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a site base URL, accepting only HTTP(S) URLs with a host
///
/// # Arguments
///
/// * `base` - The base URL string, e.g. `https://example.com`
///
/// # Returns
///
/// * `Ok(Url)` - The parsed base URL
/// * `Err(UrlError)` - The URL is malformed, not HTTP(S), or has no host
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_scheme(&url)?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }
    Ok(url)
}

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_politeness::url::host_of;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(host_of(&url), Some("example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Resolves `target` against `base` and returns the path robots rules apply to
///
/// `target` may be an absolute URL or a reference relative to `base`. The
/// result is the path plus the query string, if any; the fragment is dropped.
/// Dot segments are resolved by URL parsing. Percent-encoding is left as is.
///
/// # Arguments
///
/// * `base` - The base URL of the host being crawled
/// * `target` - The URL or reference to resolve
///
/// # Returns
///
/// * `Ok(String)` - The request path, always starting with `/`
/// * `Err(UrlError)` - The target cannot be resolved, is not HTTP(S), or is on another host
///
/// # Examples
///
/// ```
/// use sumi_politeness::url::{parse_base_url, request_path};
///
/// let base = parse_base_url("https://example.com/").unwrap();
/// assert_eq!(request_path(&base, "/a/../b?x=1#top").unwrap(), "/b?x=1");
/// assert_eq!(request_path(&base, "https://example.com/c").unwrap(), "/c");
/// ```
pub fn request_path(base: &Url, target: &str) -> UrlResult<String> {
    let url = base
        .join(target)
        .map_err(|e| UrlError::Parse(format!("{}: {}", target, e)))?;
    check_scheme(&url)?;

    let expected = host_of(base).ok_or(UrlError::MissingHost)?;
    if host_of(&url).as_deref() != Some(expected.as_str()) {
        return Err(UrlError::ForeignHost {
            url: url.to_string(),
            expected,
        });
    }

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

fn check_scheme(url: &Url) -> UrlResult<()> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }
    Ok(())
}
