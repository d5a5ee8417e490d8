//! Shape checks for caller-supplied links.

use url::Url;

use sourcebridge_shared::{Args, Result, SourceBridgeError};

/// The `name` argument, which must be an absolute http(s) URL with a host.
///
/// Returned exactly as given. Reachability is left to the platform.
pub fn http_url<'a>(args: &'a Args, name: &str) -> Result<&'a str> {
    let raw = args.str(name)?;
    check_http_url(raw).map_err(|reason| {
        SourceBridgeError::validation(format!(
            "parameter '{name}' must be an http(s) URL, got '{raw}' ({reason})"
        ))
    })?;
    Ok(raw)
}

fn check_http_url(raw: &str) -> std::result::Result<(), String> {
    // The URL parser silently strips tabs, newlines and edge spaces.
    if raw.chars().any(char::is_whitespace) {
        return Err("contains whitespace".into());
    }
    let parsed = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("scheme '{}' is not allowed", parsed.scheme()));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err("no host".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_arg(value: &str) -> Args {
        Args::new().with("url", value)
    }

    #[test]
    fn accepts_http_and_https_with_host() {
        for ok in [
            "https://example.com",
            "http://localhost:8080/feed.xml",
            "https://example.com/a?b=c#d",
        ] {
            let args = url_arg(ok);
            assert_eq!(http_url(&args, "url").unwrap(), ok);
        }
    }

    #[test]
    fn rejects_hostless_spaced_and_foreign_urls() {
        for bad in [
            "https://",
            "http:// not a host",
            "https://exa mple.com",
            " https://example.com",
            "ftp://example.com",
            "mailto:someone@example.com",
            "example.com",
            "",
        ] {
            let args = url_arg(bad);
            let err = http_url(&args, "url").unwrap_err();
            assert!(err.to_string().contains("http(s) URL"), "{bad:?}: {err}");
        }
    }

    #[test]
    fn missing_argument_names_the_parameter() {
        let err = http_url(&Args::new(), "webhook").unwrap_err();
        assert!(err.to_string().contains("'webhook'"));
    }
}
