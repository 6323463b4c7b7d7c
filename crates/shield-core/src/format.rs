//! # Format Predicates
//!
//! Total predicates over a single string, one per format rule. Each returns
//! `true` when the string has the expected syntax. They check syntax only:
//! no DNS lookups, no routing checks, no reserved-range tables.
//!
//! Grammars:
//!
//! | Predicate | Accepts |
//! |---|---|
//! | [`is_fqdn`] | ≤253 chars, ≥2 dot-separated labels of 1–63 `[A-Za-z0-9-]`, no edge hyphen, alphabetic TLD of ≥2 chars |
//! | [`is_email`] | `local@fqdn`, local part 1–64 of `[A-Za-z0-9._%+-]` without edge or doubled dots |
//! | [`is_ipv4`] / [`is_ipv6`] | standard textual addresses |
//! | [`is_cidr_ipv4`] / [`is_cidr_ipv6`] | `address/prefix`, prefix ≤32 / ≤128 |
//! | [`is_as_code`] | `AS` + 1–10 digits, value in `1..=u32::MAX` |
//! | [`is_dda_instance`] | `<digits>/<2 digits>/DDA/<2 upper-case letters>` |
//! | [`is_hex_digest`] | exactly `len` hex digits |
//! | [`is_iso8601`] | RFC 3339 or naive `YYYY-MM-DDTHH:MM:SS[.f]` |

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDateTime};

const FQDN_MAX_LEN: usize = 253;
const LABEL_MAX_LEN: usize = 63;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

/// Fully qualified domain name.
pub fn is_fqdn(s: &str) -> bool {
    if s.is_empty() || s.len() > FQDN_MAX_LEN {
        return false;
    }

    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_label(label)) {
        return false;
    }

    match labels.last() {
        Some(tld) => tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic()),
        None => false,
    }
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > LABEL_MAX_LEN {
        return false;
    }
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// E-mail address with an FQDN domain part.
pub fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > EMAIL_LOCAL_MAX_LEN {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-'));

    local_ok && is_fqdn(domain)
}

/// Dotted-quad IPv4 address.
pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// Textual IPv6 address.
pub fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// IPv4 network in CIDR notation.
pub fn is_cidr_ipv4(s: &str) -> bool {
    match split_cidr(s, 32) {
        Some(address) => is_ipv4(address),
        None => false,
    }
}

/// IPv6 network in CIDR notation.
pub fn is_cidr_ipv6(s: &str) -> bool {
    match split_cidr(s, 128) {
        Some(address) => is_ipv6(address),
        None => false,
    }
}

/// Splits `address/prefix` and returns the address when the prefix is a
/// decimal number no greater than `max_prefix`.
fn split_cidr(s: &str, max_prefix: u8) -> Option<&str> {
    let (address, prefix) = s.split_once('/')?;
    if prefix.is_empty() || prefix.len() > 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let prefix: u8 = prefix.parse().ok()?;
    (prefix <= max_prefix).then_some(address)
}

/// Autonomous system number written as `AS<number>`.
pub fn is_as_code(s: &str) -> bool {
    let Some(digits) = s.strip_prefix("AS") else {
        return false;
    };
    if digits.is_empty() || digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match digits.parse::<u64>() {
        Ok(n) => (1..=u64::from(u32::MAX)).contains(&n),
        Err(_) => false,
    }
}

/// Blocking-order reference such as `123/24/DDA/CA`.
pub fn is_dda_instance(s: &str) -> bool {
    let parts: Vec<&str> = s.split('/').collect();
    let [number, year, tag, authority] = parts.as_slice() else {
        return false;
    };

    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && year.len() == 2
        && year.bytes().all(|b| b.is_ascii_digit())
        && *tag == "DDA"
        && authority.len() == 2
        && authority.bytes().all(|b| b.is_ascii_uppercase())
}

/// Hex string of exactly `len` digits, either case.
pub fn is_hex_digest(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// ISO-8601 date-time, with or without an offset.
pub fn is_iso8601(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqdn_accepts_common_names() {
        assert!(is_fqdn("example.com"));
        assert!(is_fqdn("sub.stream-site.example.co"));
        assert!(is_fqdn("a1.b2.io"));
        assert!(is_fqdn("EXAMPLE.COM"));
    }

    #[test]
    fn fqdn_rejects_bad_labels() {
        assert!(!is_fqdn("localhost"));
        assert!(!is_fqdn("-bad.example.com"));
        assert!(!is_fqdn("bad-.example.com"));
        assert!(!is_fqdn("double..dot.com"));
        assert!(!is_fqdn("example.c"));
        assert!(!is_fqdn("example.123"));
        assert!(!is_fqdn("under_score.com"));
        assert!(!is_fqdn("example.com."));
        assert!(!is_fqdn(""));
    }

    #[test]
    fn fqdn_length_limits() {
        let label = "a".repeat(63);
        assert!(is_fqdn(&format!("{label}.com")));
        let long_label = "a".repeat(64);
        assert!(!is_fqdn(&format!("{long_label}.com")));

        let long_name = format!("{}.com", ["a"; 126].join("."));
        assert!(long_name.len() > FQDN_MAX_LEN);
        assert!(!is_fqdn(&long_name));
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("jane@example.com"));
        assert!(is_email("jane.doe_1@mail.example.org"));
        assert!(!is_email("jane.example.com"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("jane@localhost"));
        assert!(!is_email(".jane@example.com"));
        assert!(!is_email("ja..ne@example.com"));
        assert!(!is_email("jane@"));
    }

    #[test]
    fn ip_addresses() {
        assert!(is_ipv4("8.8.8.8"));
        assert!(is_ipv4("255.255.255.255"));
        assert!(!is_ipv4("256.1.1.1"));
        assert!(!is_ipv4("1.2.3"));
        assert!(!is_ipv4("::1"));

        assert!(is_ipv6("::1"));
        assert!(is_ipv6("2001:db8::8a2e:370:7334"));
        assert!(!is_ipv6("2001:db8:::1"));
        assert!(!is_ipv6("8.8.8.8"));
    }

    #[test]
    fn cidr_notation() {
        assert!(is_cidr_ipv4("10.0.0.0/8"));
        assert!(is_cidr_ipv4("192.168.1.0/32"));
        assert!(is_cidr_ipv4("0.0.0.0/0"));
        assert!(!is_cidr_ipv4("10.0.0.0/33"));
        assert!(!is_cidr_ipv4("10.0.0.0"));
        assert!(!is_cidr_ipv4("10.0.0.0/"));
        assert!(!is_cidr_ipv4("10.0.0.0/+8"));

        assert!(is_cidr_ipv6("2001:db8::/32"));
        assert!(is_cidr_ipv6("::/128"));
        assert!(!is_cidr_ipv6("2001:db8::/129"));
        assert!(!is_cidr_ipv6("10.0.0.0/8"));
    }

    #[test]
    fn as_codes() {
        assert!(is_as_code("AS1"));
        assert!(is_as_code("AS12345"));
        assert!(is_as_code("AS4294967295"));
        assert!(!is_as_code("AS4294967296"));
        assert!(!is_as_code("AS0"));
        assert!(!is_as_code("AS"));
        assert!(!is_as_code("as123"));
        assert!(!is_as_code("12345"));
        assert!(!is_as_code("AS12a"));
    }

    #[test]
    fn dda_instances() {
        assert!(is_dda_instance("123/24/DDA/CA"));
        assert!(is_dda_instance("1/23/DDA/SP"));
        assert!(!is_dda_instance("123/2024/DDA/CA"));
        assert!(!is_dda_instance("123/24/dda/CA"));
        assert!(!is_dda_instance("123/24/DDA/ca"));
        assert!(!is_dda_instance("/24/DDA/CA"));
        assert!(!is_dda_instance("123/24/DDA/CA/extra"));
    }

    #[test]
    fn hex_digests() {
        assert!(is_hex_digest(&"a".repeat(64), 64));
        assert!(is_hex_digest(&"AbC0".repeat(16), 64));
        assert!(!is_hex_digest(&"a".repeat(63), 64));
        assert!(!is_hex_digest(&"g".repeat(64), 64));
    }

    #[test]
    fn iso8601_timestamps() {
        assert!(is_iso8601("2024-01-15T10:30:00Z"));
        assert!(is_iso8601("2024-01-15T10:30:00+01:00"));
        assert!(is_iso8601("2024-01-15T10:30:00"));
        assert!(is_iso8601("2024-01-15T10:30:00.123456"));
        assert!(!is_iso8601("2024-01-15"));
        assert!(!is_iso8601("15/01/2024 10:30"));
        assert!(!is_iso8601("2024-13-15T10:30:00Z"));
    }
}
