//! Date helper functions

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Convert Moment.js format to chrono format
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a UTC timestamp in the named IANA timezone.
///
/// An empty or unknown timezone formats in local time.
pub fn format_in_timezone(date: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    match parse_timezone(timezone) {
        Some(tz) => format_date(&date.with_timezone(&tz), format),
        None => format_date(&date.with_timezone(&Local), format),
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Option<chrono_tz::Tz> {
    let timezone = timezone.trim();
    if timezone.is_empty() {
        return None;
    }
    match timezone.parse::<chrono_tz::Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::warn!("Unknown timezone {:?}, using local time", timezone);
            None
        }
    }
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour 24h
        ("HH", "%H"),
        // Hour 12h
        ("hh", "%I"),
        // Minute, after MM is gone
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        // Timezone
        ("ZZ", "%z"),
        // Milliseconds
        ("SSS", "%3f"),
    ];

    // Literal percent signs must not reach chrono as specifiers
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
