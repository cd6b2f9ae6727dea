//! Date helper functions

use chrono::format::{Item, StrftimeItems};

use crate::content::PostDate;

const FALLBACK_FORMAT: &str = "%Y-%m-%d";

/// Format a post date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
///
/// A format chrono cannot render falls back to `YYYY-MM-DD`.
pub fn format_date(date: &PostDate, format: &str) -> String {
    let chrono_format = checked_format(moment_to_chrono_format(format));
    date.to_datetime().format(&chrono_format).to_string()
}

/// chrono panics while rendering a bad specifier, so reject it up front
fn checked_format(chrono_format: String) -> String {
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Unusable date format {:?}, using YYYY-MM-DD", chrono_format);
        return FALLBACK_FORMAT.to_string();
    }
    chrono_format
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml(date: &PostDate) -> String {
    date.to_datetime()
        .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        .to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    // A literal `%` must not start a chrono specifier
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date: PostDate = "2024-01-15 10:30:00".parse().unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "YYYY/MM/DD HH:mm"), "2024/01/15 10:30");
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 15, 2024");
    }

    #[test]
    fn test_format_keeps_local_time() {
        let date: PostDate = "2018-06-23 10:00:00 +0800".parse().unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD HH:mm"), "2018-06-23 10:00");
    }

    #[test]
    fn test_date_xml() {
        let date: PostDate = "2018-06-23 10:00:00 +0800".parse().unwrap();
        assert_eq!(date_xml(&date), "2018-06-23T10:00:00.000+08:00");

        let date: PostDate = "2018-06-23".parse().unwrap();
        assert_eq!(date_xml(&date), "2018-06-23T00:00:00.000+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("DD 100%"), "%d 100%%");
    }

    #[test]
    fn test_format_with_literal_percent() {
        let date: PostDate = "2024-01-15".parse().unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD 100%"), "2024-01-15 100%");
        assert_eq!(format_date(&date, "%"), "%");
        assert_eq!(format_date(&date, "%Y"), "%Y");
    }

    #[test]
    fn test_unusable_format_falls_back() {
        assert_eq!(checked_format("%Y %Q".to_string()), "%Y-%m-%d");
        assert_eq!(checked_format("%d %".to_string()), "%Y-%m-%d");
        assert_eq!(checked_format("%d %%".to_string()), "%d %%");
    }
}
