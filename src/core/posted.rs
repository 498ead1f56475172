use regex::Regex;
use std::sync::LazyLock;

static POSTED_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(minute|hour|day|week|month)").expect("static pattern")
});

const POSTED_KEYWORDS: [&str; 6] = ["ago", "hour", "day", "week", "month", "minute"];

/// Whether an element's text reads like "3 days ago" / "Reposted 2 weeks ago".
pub fn looks_like_posted_time(text: &str) -> bool {
    let lower = text.to_lowercase();
    POSTED_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Converts a relative posting time to whole days. Anything younger than a day is 0,
/// a month counts as 30 days.
pub fn parse_posted_time(text: &str) -> Option<u32> {
    let caps = POSTED_AGO.captures(text)?;
    let amount: u32 = caps[1].parse().ok()?;

    match caps[2].to_lowercase().as_str() {
        "minute" | "hour" => Some(0),
        "day" => Some(amount),
        "week" => amount.checked_mul(7),
        "month" => amount.checked_mul(30),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_posted_time_units() {
        assert_eq!(parse_posted_time("45 minutes ago"), Some(0));
        assert_eq!(parse_posted_time("5 hours ago"), Some(0));
        assert_eq!(parse_posted_time("1 day ago"), Some(1));
        assert_eq!(parse_posted_time("Reposted 3 Weeks ago"), Some(21));
        assert_eq!(parse_posted_time("2 months ago"), Some(60));
    }

    #[test]
    fn test_parse_posted_time_without_number() {
        assert_eq!(parse_posted_time("Just now"), None);
        assert_eq!(parse_posted_time("Over 100 applicants"), None);
        assert_eq!(parse_posted_time(""), None);
    }

    #[test]
    fn test_looks_like_posted_time() {
        assert!(looks_like_posted_time("2 Weeks ago"));
        assert!(looks_like_posted_time("Posted today"));
        assert!(!looks_like_posted_time("Over 200 applicants"));
    }
}
