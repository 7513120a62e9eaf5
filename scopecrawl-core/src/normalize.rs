use crate::error::LinkError;
use url::Url;

/// Resolve a raw anchor `href` against the page's base URL.
///
/// Relative references are joined onto `base`, the fragment is dropped and
/// anything that is not `http`/`https` (`javascript:`, `mailto:`, `tel:`,
/// `data:` ...) is rejected. Failures are returned, never raised, so the
/// caller can skip the link and carry on with the rest of the page.
pub fn normalize_href(href: &str, base: &Url) -> Result<Url, LinkError> {
    let href = href.trim();
    let resolved = base
        .join(href)
        .map_err(|e| LinkError::Unparseable(format!("{}: {}", href, e)))?;
    into_crawlable(resolved)
}

/// Normalize an already absolute URL string (seeds, engine candidates).
pub fn normalize_url(raw: &str) -> Result<Url, LinkError> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).map_err(|e| LinkError::Unparseable(format!("{}: {}", raw, e)))?;
    into_crawlable(parsed)
}

fn into_crawlable(mut url: Url) -> Result<Url, LinkError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LinkError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
            url: url.to_string(),
        });
    }
    if url.host_str().is_none() {
        return Err(LinkError::Unparseable(url.to_string()));
    }
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/dubai/listing?page=2").unwrap()
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let url = normalize_href("villas/12", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dubai/villas/12");

        let url = normalize_href("/sharjah/", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/sharjah/");

        let url = normalize_href("../about", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_fragment_is_stripped() {
        let url = normalize_href("https://example.com/dubai/villas#gallery", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dubai/villas");

        let url = normalize_href("#top", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dubai/listing?page=2");
    }

    #[test]
    fn test_unsupported_schemes_are_rejected() {
        for href in [
            "javascript:void(0)",
            "mailto:sales@example.com",
            "tel:+971000000",
            "data:text/plain,hello",
            "ftp://example.com/file",
        ] {
            let err = normalize_href(href, &base()).unwrap_err();
            assert!(
                matches!(err, LinkError::UnsupportedScheme { .. }),
                "{} should be an unsupported scheme, got {:?}",
                href,
                err
            );
        }
    }

    #[test]
    fn test_malformed_href_is_unparseable() {
        let err = normalize_href("http://", &base()).unwrap_err();
        assert!(matches!(err, LinkError::Unparseable(_)));

        let err = normalize_url("not a url").unwrap_err();
        assert!(matches!(err, LinkError::Unparseable(_)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let url = normalize_href("  /dubai/villas \n", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dubai/villas");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in [
            "https://Example.com/Dubai/Villas#x",
            "http://example.com",
            "https://example.com/a/../b/./c?q=1#frag",
            "https://example.com:443/dubai/",
        ] {
            let once = normalize_url(raw).unwrap();
            let twice = normalize_url(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }
}
