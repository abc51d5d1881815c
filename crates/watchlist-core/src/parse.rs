// Lenient parsing of the free-form runtime and release fields

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static MIN_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*min").expect("min suffix regex should compile"));

static HOURS_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*h").expect("hours regex should compile"));

static MINUTES_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*m").expect("minutes regex should compile"));

static FIRST_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("integer regex should compile"));

static STANDALONE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{4})\b").expect("year regex should compile"));

/// First capture of `pattern` that parses as a u64
fn first_number(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures_iter(text)
        .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
}

/// Convert a runtime description to minutes
///
/// Accepts a bare number ("148", "92.5"), "<n> min", "<h>h <m>m" and
/// falls back to the first integer found. Anything else is 0.
pub fn runtime_minutes(raw: &str) -> f64 {
    let text = raw.trim().to_ascii_lowercase();
    if text.is_empty() {
        return 0.0;
    }

    if let Ok(minutes) = text.parse::<f64>() {
        if minutes.is_finite() && minutes >= 0.0 {
            return minutes;
        }
    }

    if let Some(minutes) = first_number(&MIN_SUFFIX, &text) {
        return minutes as f64;
    }

    let hours = first_number(&HOURS_PART, &text).unwrap_or(0);
    let minutes = first_number(&MINUTES_PART, &text).unwrap_or(0);
    match hours.checked_mul(60).and_then(|h| h.checked_add(minutes)) {
        Some(0) => {}
        Some(total) => return total as f64,
        None => {
            debug!("Runtime {:?} is out of range, counting it as 0", raw);
            return 0.0;
        }
    }

    FIRST_INTEGER
        .find(&text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|n| n as f64)
        .unwrap_or(0.0)
}

/// First standalone four-digit number in a release indicator
///
/// "2010-07-16", "16/07/2010" and "2010" all give 2010; "20100" gives none.
pub fn extract_year(release: &str) -> Option<i32> {
    STANDALONE_YEAR.captures_iter(release).find_map(|caps| {
        caps.get(1)
            .and_then(|m| m.as_str().parse().ok())
            .filter(|year: &i32| *year > 0)
    })
}

pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_plain_minutes() {
        assert_eq!(runtime_minutes("148"), 148.0);
        assert_eq!(runtime_minutes("92.5"), 92.5);
        assert_eq!(runtime_minutes("  90 "), 90.0);
    }

    #[test]
    fn test_runtime_min_suffix() {
        assert_eq!(runtime_minutes("120 min"), 120.0);
        assert_eq!(runtime_minutes("120min"), 120.0);
        assert_eq!(runtime_minutes("142 MIN"), 142.0);
        assert_eq!(runtime_minutes("2h 30min"), 30.0);
    }

    #[test]
    fn test_runtime_hours_and_minutes() {
        assert_eq!(runtime_minutes("1h 30m"), 90.0);
        assert_eq!(runtime_minutes("2h"), 120.0);
        assert_eq!(runtime_minutes("2 h 5 m"), 125.0);
        assert_eq!(runtime_minutes("45m"), 45.0);
    }

    #[test]
    fn test_runtime_leading_integer() {
        assert_eq!(runtime_minutes("about 95, give or take"), 95.0);
    }

    #[test]
    fn test_runtime_unparseable_is_zero() {
        assert_eq!(runtime_minutes(""), 0.0);
        assert_eq!(runtime_minutes("N/A"), 0.0);
        assert_eq!(runtime_minutes("unknown"), 0.0);
    }

    #[test]
    fn test_runtime_out_of_range_is_zero() {
        assert_eq!(runtime_minutes("999999999999999999h"), 0.0);
        assert_eq!(runtime_minutes("999999999999999999h 1m"), 0.0);
        assert_eq!(runtime_minutes("99999999999999999999999h"), 0.0);
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2010-07-16"), Some(2010));
        assert_eq!(extract_year("16/07/2010"), Some(2010));
        assert_eq!(extract_year("1999"), Some(1999));
        assert_eq!(extract_year("Released 14 Jul 1995"), Some(1995));
        assert_eq!(extract_year("2019–2023"), Some(2019));
    }

    #[test]
    fn test_extract_year_rejects_non_standalone() {
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("20100"), None);
        assert_eq!(extract_year("tt2010"), None);
        assert_eq!(extract_year("99"), None);
        assert_eq!(extract_year("0000"), None);
    }

    #[test]
    fn test_decade_of() {
        assert_eq!(decade_of(2010), 2010);
        assert_eq!(decade_of(1999), 1990);
        assert_eq!(decade_of(2024), 2020);
    }
}
