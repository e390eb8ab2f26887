//! Canonicalization of event dates and times.
//!
//! Dates are stored as `YYYY-MM-DD` (UTC calendar date) and times as a
//! zero-padded 12-hour clock, `HH:MM AM` / `HH:MM PM`. Both functions are
//! pure and only ever run on values that are part of the current write.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::GatewayError;

/// Date-only layouts accepted on input, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Date-time layouts without an offset; interpreted as UTC.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a date string to ISO `YYYY-MM-DD`.
///
/// Accepts ISO dates, RFC 3339 timestamps (converted to UTC before the
/// date is taken), naive date-times, `YYYY/MM/DD`, US-style `MM/DD/YYYY`
/// and spelled-out month names such as `January 5, 2026`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidDate`] when the input does not describe
/// a real calendar date.
pub fn normalize_date(input: &str) -> Result<String, GatewayError> {
    let trimmed = input.trim();
    parse_date(trimmed)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| GatewayError::InvalidDate(input.to_string()))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Meridiem marker of a 12-hour clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Am,
    Pm,
}

impl Period {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("am") {
            Some(Self::Am)
        } else if s.eq_ignore_ascii_case("pm") {
            Some(Self::Pm)
        } else {
            None
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// Normalizes a time string to zero-padded 12-hour `HH:MM AM/PM`.
///
/// Two shapes are accepted after trimming:
///
/// - 12-hour: `H:MM` or `HH:MM`, an optional single space, then `AM`/`PM`
///   in any case. The hour must be 1–12.
/// - 24-hour: `H:MM` or `HH:MM` with no marker. The hour must be 0–23 and
///   is converted (`00:15` → `12:15 AM`, `12:00` → `12:00 PM`,
///   `13:30` → `01:30 PM`).
///
/// Minutes must be 0–59 and keep their original two digits.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidTime`] for any other shape or for
/// out-of-range hours and minutes.
pub fn normalize_time(input: &str) -> Result<String, GatewayError> {
    let trimmed = input.trim();
    let invalid_format = || {
        GatewayError::InvalidTime(format!(
            "Invalid time format: {input}. Expected format: HH:MM AM/PM or HH:MM (24-hour)"
        ))
    };

    let (hour_digits, minute_digits, rest) = split_clock(trimmed).ok_or_else(invalid_format)?;
    let hours: u32 = hour_digits.parse().map_err(|_| invalid_format())?;
    let minutes: u32 = minute_digits.parse().map_err(|_| invalid_format())?;

    if rest.is_empty() {
        if hours > 23 {
            return Err(GatewayError::InvalidTime(format!(
                "Invalid hour value: {hours}. Hours must be between 0-23 for 24-hour format"
            )));
        }
        check_minutes(minutes)?;

        let period = if hours >= 12 { Period::Pm } else { Period::Am };
        let hours = match hours {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        return Ok(format!("{hours:02}:{minute_digits} {}", period.as_str()));
    }

    let marker = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
    let period = Period::parse(marker).ok_or_else(invalid_format)?;

    if !(1..=12).contains(&hours) {
        return Err(GatewayError::InvalidTime(format!(
            "Invalid hour value: {hours}. Hours must be between 1-12 for 12-hour format"
        )));
    }
    check_minutes(minutes)?;

    Ok(format!("{hours:02}:{minute_digits} {}", period.as_str()))
}

fn check_minutes(minutes: u32) -> Result<(), GatewayError> {
    if minutes > 59 {
        return Err(GatewayError::InvalidTime(format!(
            "Invalid minute value: {minutes}. Minutes must be between 0-59"
        )));
    }
    Ok(())
}

/// Splits `H:MM…` / `HH:MM…` into hour digits, minute digits and the
/// remaining suffix.
fn split_clock(s: &str) -> Option<(&str, &str, &str)> {
    let (hour, tail) = s.split_once(':')?;
    let minute = tail.get(..2)?;
    let rest = tail.get(2..)?;

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hour.len()) || !is_digits(hour) || !is_digits(minute) {
        return None;
    }
    Some((hour, minute, rest))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn time(input: &str) -> String {
        match normalize_time(input) {
            Ok(t) => t,
            Err(e) => panic!("{input:?} should normalize: {e}"),
        }
    }

    fn date(input: &str) -> String {
        match normalize_date(input) {
            Ok(d) => d,
            Err(e) => panic!("{input:?} should normalize: {e}"),
        }
    }

    fn assert_invalid_time(input: &str) {
        let Err(GatewayError::InvalidTime(_)) = normalize_time(input) else {
            panic!("{input:?} should be rejected as an invalid time");
        };
    }

    #[test]
    fn twelve_hour_is_padded_and_uppercased() {
        assert_eq!(time("9:05am"), "09:05 AM");
        assert_eq!(time("9:05 am"), "09:05 AM");
        assert_eq!(time("11:45 Pm"), "11:45 PM");
        assert_eq!(time("12:00 AM"), "12:00 AM");
        assert_eq!(time("  07:30 PM  "), "07:30 PM");
    }

    #[test]
    fn twenty_four_hour_converts_to_twelve_hour() {
        assert_eq!(time("13:30"), "01:30 PM");
        assert_eq!(time("00:15"), "12:15 AM");
        assert_eq!(time("12:00"), "12:00 PM");
        assert_eq!(time("9:00"), "09:00 AM");
        assert_eq!(time("23:59"), "11:59 PM");
    }

    #[test]
    fn normalized_time_is_a_fixed_point() {
        for input in ["9:05am", "13:30", "00:15", "12:00 pm"] {
            let once = time(input);
            assert_eq!(time(&once), once);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_invalid_time("25:00");
        assert_invalid_time("8:70 AM");
        assert_invalid_time("0:30 AM");
        assert_invalid_time("13:00 PM");
        assert_invalid_time("12:60");
    }

    #[test]
    fn rejects_other_shapes() {
        for input in ["", "noon", "9", "9:5", "123:00", "9:05  am", "9:05 xm", "9.05", "09:05:00"] {
            assert_invalid_time(input);
        }
    }

    #[test]
    fn out_of_range_messages_name_the_range() {
        let Err(err) = normalize_time("25:00") else {
            panic!("expected failure");
        };
        assert!(err.to_string().contains("between 0-23"));

        let Err(err) = normalize_time("8:70 AM") else {
            panic!("expected failure");
        };
        assert!(err.to_string().contains("between 0-59"));
    }

    #[test]
    fn iso_date_passes_through() {
        assert_eq!(date("2026-01-05"), "2026-01-05");
        assert_eq!(date(" 2026-1-5 "), "2026-01-05");
    }

    #[test]
    fn timestamps_use_the_utc_date() {
        assert_eq!(date("2026-01-05T23:30:00-05:00"), "2026-01-06");
        assert_eq!(date("2026-01-05T10:00:00Z"), "2026-01-05");
        assert_eq!(date("2026-01-05T10:00"), "2026-01-05");
        assert_eq!(date("2026-01-05 18:45"), "2026-01-05");
    }

    #[test]
    fn alternative_layouts() {
        assert_eq!(date("2026/03/09"), "2026-03-09");
        assert_eq!(date("03/09/2026"), "2026-03-09");
        assert_eq!(date("January 5, 2026"), "2026-01-05");
        assert_eq!(date("Jan 5, 2026"), "2026-01-05");
        assert_eq!(date("5 January 2026"), "2026-01-05");
    }

    #[test]
    fn rejects_invalid_dates() {
        for input in ["", "tomorrow", "2026-02-30", "2026-13-01", "13/45/2026"] {
            let Err(GatewayError::InvalidDate(raw)) = normalize_date(input) else {
                panic!("{input:?} should be rejected as an invalid date");
            };
            assert_eq!(raw, input);
        }
    }
}
