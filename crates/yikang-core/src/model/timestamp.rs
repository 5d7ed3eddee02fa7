// Timestamps come back as RFC 3339 (`timestamptz`) or, for columns
// declared without a zone, as a bare `2024-05-01T08:00:00`. Date-only
// values (`2024-05-01`) are midnight. All are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// `deserialize_with` helper for optional, leniently formatted timestamps.
pub fn lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(parse))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zoned_and_naive_forms() {
        let zoned = parse("2024-05-01T08:00:00.123456+00:00").unwrap();
        let naive = parse("2024-05-01T08:00:00.123456").unwrap();
        assert_eq!(zoned, naive);
        assert!(parse("2024-05-01 16:00:00+08").is_some());
        assert_eq!(
            parse("2025-07-25").unwrap(),
            parse("2025-07-25T00:00:00Z").unwrap()
        );
        assert!(parse("yesterday").is_none());
    }
}
