//! Built-in `"format"` checkers: `date-time`, `date`, `time`, `email`,
//! `ipv4`, `hostname`, `uuid`. Unknown format names are handled by the
//! caller (`checker(name)` returns `None`, which the evaluator treats as
//! vacuous success) rather than here.
use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)+$").unwrap();
    static ref IPV4_RE: Regex =
        Regex::new(r"^(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])$").unwrap();
}

/// A pluggable `(format_name, value) -> bool` check. `Validator` ships with
/// [`default_checker`] and can be handed a different implementation via
/// `set_format_checker`.
pub trait FormatChecker: Send + Sync {
    fn check(&self, format: &str, value: &str) -> bool;
}

/// The built-in checker covering every format name named in §4.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatChecker;

impl FormatChecker for DefaultFormatChecker {
    fn check(&self, format: &str, value: &str) -> bool {
        match format {
            "date-time" => date_time(value),
            "date" => date(value),
            "time" => time(value),
            "email" => email(value),
            "ipv4" => ipv4(value),
            "hostname" => hostname(value),
            "uuid" => uuid(value),
            // Unknown format names do not fail validation.
            _ => true,
        }
    }
}

pub(crate) fn date(instance: &str) -> bool {
    NaiveDate::parse_from_str(instance, "%Y-%m-%d").is_ok()
}

pub(crate) fn date_time(instance: &str) -> bool {
    DateTime::parse_from_rfc3339(instance).is_ok()
}

pub(crate) fn time(instance: &str) -> bool {
    // RFC 3339 `full-time`: accept either an RFC 3339 offset or a bare
    // local time, since `chrono::NaiveTime` alone can't parse the offset.
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", instance)).is_ok()
        || NaiveTime::parse_from_str(instance, "%H:%M:%S").is_ok()
}

pub(crate) fn email(instance: &str) -> bool {
    instance.matches('@').count() == 1 && EMAIL_RE.is_match(instance)
}

pub(crate) fn hostname(instance: &str) -> bool {
    !(instance.ends_with('-')
        || instance.starts_with('-')
        || instance.is_empty()
        || instance.chars().count() > 253
        || instance
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
        || instance.split('.').any(|part| part.is_empty() || part.chars().count() > 63))
}

pub(crate) fn ipv4(instance: &str) -> bool {
    IPV4_RE.is_match(instance)
}

/// Hand-rolled rather than delegated to the `uuid` crate: ports the check
/// used by `ks_json_schema_pure.c` directly — 36 characters, hyphens at
/// positions 8/13/18/23, hex digits everywhere else.
pub(crate) fn uuid(instance: &str) -> bool {
    let bytes = instance.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (i, &b) in bytes.iter().enumerate() {
        let expect_hyphen = matches!(i, 8 | 13 | 18 | 23);
        if expect_hyphen {
            if b != b'-' {
                return false;
            }
        } else if !(b as char).is_ascii_hexdigit() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2018-11-13T20:20:39+00:00", true)]
    #[test_case("not-a-date", false)]
    fn date_time_checks(value: &str, expected: bool) {
        assert_eq!(date_time(value), expected);
    }

    #[test_case("2018-11-13", true)]
    #[test_case("2018-13-13", false)]
    fn date_checks(value: &str, expected: bool) {
        assert_eq!(date(value), expected);
    }

    #[test_case("user@example.com", true)]
    #[test_case("user@@example.com", false)]
    #[test_case("no-at-sign", false)]
    #[test_case("user@localhost", false)]
    fn email_checks(value: &str, expected: bool) {
        assert_eq!(email(value), expected);
    }

    #[test_case("127.0.0.1", true)]
    #[test_case("256.0.0.1", false)]
    #[test_case("1.2.3", false)]
    fn ipv4_checks(value: &str, expected: bool) {
        assert_eq!(ipv4(value), expected);
    }

    #[test_case("example.com", true)]
    #[test_case("-example.com", false)]
    #[test_case("example-.com", false)]
    fn hostname_checks(value: &str, expected: bool) {
        assert_eq!(hostname(value), expected);
    }

    #[test_case("550e8400-e29b-41d4-a716-446655440000", true)]
    #[test_case("not-a-uuid", false)]
    #[test_case("550e8400e29b41d4a716446655440000", false)]
    fn uuid_checks(value: &str, expected: bool) {
        assert_eq!(uuid(value), expected);
    }

    #[test]
    fn unknown_format_passes() {
        assert!(DefaultFormatChecker.check("no-such-format", "anything"));
    }
}
