use chrono::{DateTime, Utc};

// Parses an HTTP `Date` header (RFC 7231 IMF-fixdate, which is RFC 2822 compatible)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Midpoint of a request's send/receive instants, the best local estimate of
// when the device stamped its reply
pub fn midpoint(sent: DateTime<Utc>, received: DateTime<Utc>) -> DateTime<Utc> {
    sent + (received - sent) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_imf_fixdate() {
        let parsed = parse_http_date("Fri, 01 Mar 2024 12:00:05 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap());
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn midpoint_is_halfway() {
        let sent = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let received = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 2).unwrap();
        assert_eq!(midpoint(sent, received), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap());
    }
}
