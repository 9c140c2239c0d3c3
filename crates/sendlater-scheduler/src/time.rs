use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Render a UTC instant in the canonical stored form: RFC 3339, second
/// precision, `Z` suffix (`2026-08-30T12:00:00Z`).
///
/// Every timestamp written to the store goes through this function so that
/// SQL string comparison on the `scheduled_time` column is chronological.
pub fn canonical(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a user-supplied scheduled time.
///
/// Accepts full RFC 3339 (any offset, normalised to UTC) and the common
/// naive forms `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DDTHH:MM[:SS]`, which are
/// read as UTC. Returns `None` for anything else.
pub fn parse_scheduled_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn canonical_is_fixed_width_utc() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        assert_eq!(canonical(ts), "2026-08-30T12:00:00Z");
    }

    #[test]
    fn canonical_drops_subsecond_precision() {
        let ts = Utc
            .with_ymd_and_hms(2026, 8, 30, 12, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        assert_eq!(canonical(ts), "2026-08-30T12:00:00Z");
    }

    #[test]
    fn parses_rfc3339_with_offset_to_utc() {
        let dt = parse_scheduled_time("2026-08-30T14:00:00+02:00").unwrap();
        assert_eq!(canonical(dt), "2026-08-30T12:00:00Z");
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        for raw in [
            "2026-08-30T12:00:00",
            "2026-08-30T12:00",
            "2026-08-30 12:00:00",
            "2026-08-30 12:00",
        ] {
            let dt = parse_scheduled_time(raw).unwrap();
            assert_eq!(canonical(dt), "2026-08-30T12:00:00Z", "input: {raw}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "   ", "tomorrow", "2026-13-01T00:00:00Z", "1693", "30/08/2026"] {
            assert!(parse_scheduled_time(raw).is_none(), "input: {raw}");
        }
    }

    #[test]
    fn canonical_ordering_matches_time_ordering() {
        let early = Utc.with_ymd_and_hms(2026, 8, 30, 9, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 8, 30, 10, 0, 0).unwrap();
        assert!(canonical(early) < canonical(late));
    }
}
