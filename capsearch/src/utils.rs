use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_URL_RE: Regex = Regex::new(
        r"(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
    )
    .expect("video URL pattern is valid");
    static ref VIDEO_ID_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("video ID pattern is valid");
}

/// Seconds to `HH:MM:SS`, fractions truncated.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// `1234567` -> `1,234,567`
pub fn format_views(views: u64) -> String {
    let digits = views.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse ISO8601 date string and keep the calendar date.
pub fn format_upload_date(date_str: &str) -> String {
    match date_str.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => date_str.to_string(),
    }
}

pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns the video ID for either a bare ID or a video URL. Unknown input is passed through
/// trimmed so the transcript service can report it as unavailable.
pub fn normalize_video_input(input: &str) -> String {
    let input = input.trim();
    if VIDEO_ID_RE.is_match(input) {
        return input.to_string();
    }
    extract_youtube_video_id(input).unwrap_or_else(|| input.to_string())
}

/// File-name friendly form of a search phrase.
pub fn safe_file_stem(phrase: &str) -> String {
    let stem: String = phrase
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "search".to_string()
    } else {
        stem
    }
}

/// Collapse whitespace runs (including newlines) into single spaces.
pub fn flatten_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0.0), "00:00:00");
        assert_eq!(format_timestamp(65.9), "00:01:05");
        assert_eq!(format_timestamp(3725.0), "01:02:05");
        assert_eq!(format_timestamp(-3.0), "00:00:00");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00");
    }

    #[test]
    fn views_get_thousands_separators() {
        assert_eq!(format_views(0), "0");
        assert_eq!(format_views(999), "999");
        assert_eq!(format_views(1000), "1,000");
        assert_eq!(format_views(1234567), "1,234,567");
    }

    #[test]
    fn upload_dates() {
        assert_eq!(format_upload_date("2009-10-25T06:57:33Z"), "2009-10-25");
        assert_eq!(format_upload_date("sometime"), "sometime");
    }

    #[test]
    fn video_ids_from_urls() {
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_youtube_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_youtube_video_id("https://youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_youtube_video_id("https://example.com"), None);
    }

    #[test]
    fn normalize_passes_ids_through() {
        assert_eq!(normalize_video_input("  dQw4w9WgXcQ "), "dQw4w9WgXcQ");
        assert_eq!(
            normalize_video_input("https://youtu.be/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(normalize_video_input("a"), "a");
    }

    #[test]
    fn file_stems() {
        assert_eq!(safe_file_stem("hello world"), "hello_world");
        assert_eq!(safe_file_stem("what?/now"), "what__now");
        assert_eq!(safe_file_stem("  "), "search");
    }

    #[test]
    fn masking() {
        assert_eq!(mask_api_key("AIzaSyExampleKey1234"), "AIza...1234");
        assert_eq!(mask_api_key("short"), "*****");
    }
}
