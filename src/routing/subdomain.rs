//! Subdomain extraction module
//!
//! Derives the product subdomain label from the effective request host.
//! Only third-level-and-deeper hosts qualify: `app.example.com` yields `app`,
//! while `example.com`, `www.example.com`, IP literals and `localhost` yield nothing.

use std::net::SocketAddrV4;

/// Extract the subdomain label from a host
///
/// Rules, evaluated in order:
/// 1. First label parses as a number (IP literal) -> `None`
/// 2. `localhost` or `localhost:<port>` -> `None`
/// 3. Contains `localhost:` or is an IPv4 literal with port -> `None`
/// 4. More than two labels and first label is not `www` -> first label
/// 5. Otherwise -> `None`
///
/// A label that merely starts with a digit but is not a number (`3d.example.com`)
/// still counts as a subdomain; a purely numeric one (`42.example.com`) does not.
pub fn extract_subdomain(host: &str) -> Option<&str> {
    let labels: Vec<&str> = host.split('.').collect();

    if labels.first().is_some_and(|label| is_numeric_label(label)) {
        return None;
    }

    if host == "localhost" || host.starts_with("localhost:") {
        return None;
    }

    if host.contains("localhost:") || host.parse::<SocketAddrV4>().is_ok() {
        return None;
    }

    if labels.len() > 2 && labels[0] != "www" {
        return Some(labels[0]);
    }

    None
}

/// Check whether a label would be read as a number by a browser-side `Number()` call
///
/// Covers the empty label, decimal and exponent notation, `Infinity`,
/// and `0x`/`0o`/`0b` integer literals.
fn is_numeric_label(label: &str) -> bool {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return true;
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }

    // Radix literals are unsigned only
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    // f64 parsing also accepts "inf"/"nan" spellings, which are not numbers here
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && trimmed.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_level_host() {
        assert_eq!(extract_subdomain("app.example.com"), Some("app"));
        assert_eq!(extract_subdomain("moneytide.vastsilicon.com"), Some("moneytide"));
        assert_eq!(extract_subdomain("a.b.example.com"), Some("a"));
    }

    #[test]
    fn test_two_labels_or_fewer() {
        assert_eq!(extract_subdomain("example.com"), None);
        assert_eq!(extract_subdomain("localhost"), None);
        assert_eq!(extract_subdomain("com"), None);
        assert_eq!(extract_subdomain(""), None);
    }

    #[test]
    fn test_www_is_not_a_subdomain() {
        assert_eq!(extract_subdomain("www.example.com"), None);
        assert_eq!(extract_subdomain("www.a.example.com"), None);
    }

    #[test]
    fn test_numeric_first_label() {
        assert_eq!(extract_subdomain("127.0.0.1"), None);
        assert_eq!(extract_subdomain("10.0.0.1:8080"), None);
        assert_eq!(extract_subdomain("42.example.com"), None);
        assert_eq!(extract_subdomain("0x1f.example.com"), None);
        assert_eq!(extract_subdomain("1e400.example.com"), None);
    }

    #[test]
    fn test_digit_leading_label_that_is_not_a_number() {
        assert_eq!(extract_subdomain("3d.example.com"), Some("3d"));
        assert_eq!(extract_subdomain("inf.example.com"), Some("inf"));
        assert_eq!(extract_subdomain("nan.example.com"), Some("nan"));
    }

    #[test]
    fn test_localhost_variants() {
        assert_eq!(extract_subdomain("localhost:3000"), None);
        assert_eq!(extract_subdomain("app.localhost:3000"), None);
        assert_eq!(extract_subdomain("127.0.0.1:3000"), None);
    }

    #[test]
    fn test_port_on_real_host() {
        assert_eq!(extract_subdomain("app.example.com:8443"), Some("app"));
    }

    #[test]
    fn test_is_numeric_label() {
        assert!(is_numeric_label("0"));
        assert!(is_numeric_label("1e3"));
        assert!(is_numeric_label("1.5"));
        assert!(is_numeric_label("Infinity"));
        assert!(is_numeric_label("0b101"));
        assert!(!is_numeric_label("0b2"));
        assert!(!is_numeric_label("app"));
        assert!(!is_numeric_label("infinity"));
        assert!(!is_numeric_label("NaN"));
    }
}
