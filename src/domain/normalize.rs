// src/domain/normalize.rs
// =============================================================================
// Turns URLs into the unit the graph is built on: the registrable domain.
//
// Two steps happen for every link the crawler sees:
// 1. extract_origin: "https://blog.example.co.uk/post?id=1" -> "https://blog.example.co.uk"
// 2. normalize:      "https://blog.example.co.uk"          -> "example.co.uk"
//
// Rules in normalize:
// - Only http and https are accepted
// - IP literals are returned as they are (there is no suffix to collapse to)
// - Otherwise: label in front of the longest public suffix + "." + suffix
//
// The public suffix list comes from the `psl` crate, which compiles Mozilla's
// list into the binary. Hostnames under an unknown TLD (like "root.test") use
// the list's implicit "*" rule, so their suffix is just the last label.
// =============================================================================

use url::{Host, Url};

use crate::error::NormalizeError;

// Reduces a URL to its registrable domain
//
// Examples:
//   "https://a.b.example.co.uk/x" -> "example.co.uk"
//   "https://192.168.0.1/x"       -> "192.168.0.1"
//   "ftp://example.com"           -> Err(Scheme)
//   "https://co.uk"               -> Err(Format)
pub fn normalize(url: &str) -> Result<String, NormalizeError> {
    let parsed = parse_web_url(url)?;

    let host = match parsed.host() {
        Some(Host::Domain(host)) => host,
        // The url crate already recognised an IP address
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Ok(parsed.host_str().unwrap_or_default().to_string());
        }
        None => {
            return Err(NormalizeError::Format {
                host: String::new(),
            })
        }
    };

    if is_numeric_host(host) {
        return Ok(host.to_string());
    }

    registrable_domain(host)
}

// Resolves an anchor's raw href into "scheme://host"
//
// Relative ("/docs"), scheme-less ("//cdn.example.com") and non-web
// ("mailto:...") hrefs are rejected; the crawler only follows links that
// leave for an absolute http(s) location.
//
// The URL parser is lenient and reads "https:example.com" or
// "https:/example.com" as if they had "//". A browser on an https page treats
// those as relative paths, so they are rejected too.
pub fn extract_origin(href: &str) -> Result<String, NormalizeError> {
    let href = href.trim();
    let parsed = parse_web_url(href)?;

    let after_scheme = href.split_once(':').map_or("", |(_, rest)| rest);
    if !after_scheme.starts_with("//") {
        return Err(NormalizeError::Parse {
            url: href.to_string(),
            reason: "expected '//' after the scheme".to_string(),
        });
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(format!("{}://{}", parsed.scheme(), host)),
        _ => Err(NormalizeError::Format {
            host: String::new(),
        }),
    }
}

// Parses an absolute URL and checks that it is http or https
fn parse_web_url(url: &str) -> Result<Url, NormalizeError> {
    let parsed = Url::parse(url).map_err(|e| NormalizeError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NormalizeError::Scheme {
            url: url.to_string(),
            scheme: other.to_string(),
        }),
    }
}

// A hostname that is all digits once the dots are removed is an IP literal
fn is_numeric_host(host: &str) -> bool {
    let mut digits = host.chars().filter(|c| *c != '.').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

// Finds the label right before the public suffix and glues the two together
fn registrable_domain(host: &str) -> Result<String, NormalizeError> {
    let format_error = || NormalizeError::Format {
        host: host.to_string(),
    };

    // Fully-qualified names may end in a dot; the suffix lookup should not see it
    let host = host.trim_end_matches('.');
    let suffix = psl::suffix_str(host).ok_or_else(format_error)?;

    // Position where the suffix starts. It has to leave room for at least a
    // one-character label and its dot, otherwise the host *is* the suffix.
    let boundary = host.len() - suffix.len();
    if boundary <= 1 {
        return Err(format_error());
    }

    let label = host[..boundary - 1]
        .rsplit('.')
        .next()
        .filter(|label| !label.is_empty())
        .ok_or_else(format_error)?;

    Ok(format!("{}.{}", label, suffix))
}
