//! Timestamp formatting shared by every writer.

use chrono::{DateTime, Utc};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now() -> String {
    format(Utc::now())
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format(instant: DateTime<Utc>) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// Current UTC date as `YYYYMMDD`.
pub fn today_compact() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_without_fraction() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format(instant), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn compact_date_has_eight_digits() {
        let date = today_compact();
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
    }
}
