use chrono::{DateTime, Utc};

/// Timestamps are stored as RFC3339 TEXT so raw SQL comparisons and
/// substring-based month bucketing stay lexicographically correct.
pub fn now() -> String {
    Utc::now().to_rfc3339()
}

pub fn parse_or_now(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub fn parse_opt(s: Option<&str>) -> Option<DateTime<Utc>> {
    s.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_rfc3339() {
        let s = "2025-03-14T12:00:00+00:00";
        let parsed = parse_or_now(s);
        assert_eq!(parsed.to_rfc3339(), s);
    }

    #[test]
    fn optional_parse_rejects_garbage() {
        assert!(parse_opt(Some("not a date")).is_none());
        assert!(parse_opt(None).is_none());
        assert!(parse_opt(Some("2025-01-01T00:00:00Z")).is_some());
    }
}
