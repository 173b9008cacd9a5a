//! Time utilities: timezone-aware "today" and ISO date parsing.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// On-disk and CLI date format
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Calendar date of `now` in an IANA tz like "America/Chicago".
pub fn local_date(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Today's date in the given timezone.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    local_date(Utc::now(), tz)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE)
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        // 03:30 UTC is still the previous evening in Chicago (CST, UTC-6)
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 3, 30, 0).unwrap();
        let d = local_date(now, "America/Chicago").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(local_date(Utc::now(), "Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-08-22").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 22).unwrap()
        );
        assert!(parse_iso_date("08/22/2024").is_err());
    }
}
