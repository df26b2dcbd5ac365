use std::sync::LazyLock;

use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::{Date, OffsetDateTime};

static DATE_ONLY: LazyLock<Vec<FormatItem<'static>>> =
    LazyLock::new(|| time::format_description::parse("[year]-[month]-[day]").unwrap());

/// Parse a timestamp string: RFC 3339 first, then a bare `YYYY-MM-DD`
/// (read as midnight UTC). Anything else is `None`, never an error;
/// sync sources drift formats and the dashboard must keep rendering.
pub fn parse_ts(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    let date = Date::parse(raw, &DATE_ONLY[..]).ok()?;
    Some(date.midnight().assume_utc())
}

/// Epoch milliseconds for a timestamp string, `None` when unparseable.
pub fn ts_millis(raw: &str) -> Option<i64> {
    parse_ts(raw).map(|dt| (dt.unix_timestamp_nanos() / 1_000_000) as i64)
}

/// Current wall-clock time as RFC 3339.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// `YYYY-MM-DD` prefix of a timestamp string for compact display.
pub fn short_date(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rfc3339() {
        let dt = parse_ts("2025-01-01T00:00:00Z").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.unix_timestamp(), 1735689600);
    }

    #[test]
    fn parse_with_fractional_seconds_and_offset() {
        assert!(parse_ts("2025-06-15T10:30:00.123Z").is_some());
        assert!(parse_ts("2025-06-15T10:30:00+02:00").is_some());
    }

    #[test]
    fn parse_date_only_is_midnight_utc() {
        let dt = parse_ts("2025-03-05").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.offset().whole_seconds(), 0);
    }

    #[test]
    fn parse_garbage_is_none() {
        assert!(parse_ts("").is_none());
        assert!(parse_ts("not a date").is_none());
        assert!(parse_ts("2025-13-99").is_none());
    }

    #[test]
    fn millis_round_values() {
        assert_eq!(ts_millis("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(ts_millis("junk"), None);
    }

    #[test]
    fn now_is_parseable() {
        assert!(parse_ts(&now_rfc3339()).is_some());
    }

    #[test]
    fn short_date_truncates_safely() {
        assert_eq!(short_date("2025-01-01T00:00:00Z"), "2025-01-01");
        assert_eq!(short_date("short"), "short");
    }
}
