use chrono::NaiveDate;

pub fn extract_first_name(name: &str) -> &str {
    name.split_whitespace()
        .next()
        .unwrap_or(name)
}

/// Cut to at most `max_len` characters, ending in "..." when shortened.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// The first non-empty line, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Whole days from `today` until `end`; negative once the end has passed.
pub fn days_until(end: NaiveDate, today: NaiveDate) -> i64 {
    end.signed_duration_since(today).num_days()
}

/// Short relative form of a request's end date: "in 3d", "today", "ended".
pub fn describe_deadline(end: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(end) = end else {
        return "no end date".to_string();
    };
    match days_until(end, today) {
        d if d < 0 => "ended".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d > 60 => format!("in {}mo", d / 30),
        d => format!("in {}d", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer project name", 10), "a longe...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_describe_deadline() {
        let today = date(2024, 11, 28);
        assert_eq!(describe_deadline(Some(date(2024, 12, 1)), today), "in 3d");
        assert_eq!(describe_deadline(Some(today), today), "today");
        assert_eq!(describe_deadline(Some(date(2024, 11, 29)), today), "tomorrow");
        assert_eq!(describe_deadline(Some(date(2024, 11, 1)), today), "ended");
        assert_eq!(describe_deadline(Some(date(2025, 3, 1)), today), "in 3mo");
        assert_eq!(describe_deadline(None, today), "no end date");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  Need a designer  \nand more"), "Need a designer");
        assert_eq!(first_line(""), "");
    }
}
