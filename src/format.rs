//! Display Formatting
//!
//! Relative timestamps, remaining-time badges and small text helpers shared by
//! the pages. Server timestamps are naive ISO strings in the bot host's local
//! time; RFC 3339 strings are converted to local time first.

use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Relative time for recent timestamps, `MM-DD HH:MM` beyond a week
pub fn format_time(raw: Option<&str>, now: NaiveDateTime) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    let Some(at) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let diff = (now - at).num_seconds();
    match diff {
        d if d < 60 => "刚刚".to_string(),
        d if d < 3600 => format!("{} 分钟前", d / 60),
        d if d < 86_400 => format!("{} 小时前", d / 3600),
        d if d < 604_800 => format!("{} 天前", d / 86_400),
        _ => at.format("%m-%d %H:%M").to_string(),
    }
}

/// `format_time` against the browser clock
pub fn time_ago(raw: Option<&str>) -> String {
    format_time(raw, now())
}

/// Full local timestamp for detail rows
pub fn format_datetime(raw: Option<&str>) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => "-".to_string(),
        Some(s) => parse_timestamp(s)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remaining {
    pub text: String,
    pub urgent: bool,
}

/// Time left until a temp role expires. Urgent under an hour, and under two
/// hours while still shown in hours.
pub fn remaining(expire: Option<&str>, now: NaiveDateTime) -> Remaining {
    let Some(at) = expire.and_then(parse_timestamp) else {
        return Remaining { text: "-".to_string(), urgent: false };
    };
    let diff = (at - now).num_seconds();
    let (text, urgent) = match diff {
        d if d <= 0 => ("已过期".to_string(), true),
        d if d < 3600 => (format!("{} 分钟", d / 60), true),
        d if d < 86_400 => (format!("{} 小时", d / 3600), d < 7200),
        d => (format!("{} 天", d / 86_400), false),
    };
    Remaining { text, urgent }
}

pub fn file_icon(file_type: &str) -> &'static str {
    match file_type {
        "image" | "png" | "jpg" | "jpeg" => "🖼️",
        "json" => "📄",
        _ => "📎",
    }
}

pub const PREVIEW_CHARS: usize = 80;

/// First 80 characters of a message, with `...` when cut
pub fn content_preview(content: &str) -> String {
    let mut out = String::new();
    let mut chars = content.chars();
    for c in chars.by_ref().take(PREVIEW_CHARS) {
        out.push(c);
    }
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

/// `#rrggbb` → integer color; `None` for anything else
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

pub fn hex_color(color: u32) -> String {
    let mut out = String::with_capacity(7);
    let _ = write!(out, "#{:06x}", color & 0xff_ffff);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn missing_and_invalid_times() {
        let now = at("2024-06-10T12:00:00");
        assert_eq!(format_time(None, now), "-");
        assert_eq!(format_time(Some(""), now), "-");
        assert_eq!(format_time(Some("昨天"), now), "昨天");
    }

    #[test]
    fn relative_buckets() {
        let now = at("2024-06-10T12:00:00");
        assert_eq!(format_time(Some("2024-06-10T11:59:30"), now), "刚刚");
        assert_eq!(format_time(Some("2024-06-10T11:55:00"), now), "5 分钟前");
        assert_eq!(format_time(Some("2024-06-10 09:00:00"), now), "3 小时前");
        assert_eq!(format_time(Some("2024-06-08T11:00:00.123456"), now), "2 天前");
    }

    #[test]
    fn old_times_show_date() {
        let now = at("2024-06-10T12:00:00");
        assert_eq!(format_time(Some("2024-05-01T08:05:00"), now), "05-01 08:05");
    }

    #[test]
    fn future_times_read_as_now() {
        let now = at("2024-06-10T12:00:00");
        assert_eq!(format_time(Some("2024-06-10T12:30:00"), now), "刚刚");
    }

    #[test]
    fn remaining_bands() {
        let now = at("2024-06-10T12:00:00");
        let r = |s: &str| remaining(Some(s), now);
        assert_eq!(r("2024-06-10T11:00:00"), Remaining { text: "已过期".into(), urgent: true });
        assert_eq!(r("2024-06-10T12:45:00"), Remaining { text: "45 分钟".into(), urgent: true });
        assert_eq!(r("2024-06-10T13:30:00"), Remaining { text: "1 小时".into(), urgent: true });
        assert_eq!(r("2024-06-10T17:00:00"), Remaining { text: "5 小时".into(), urgent: false });
        assert_eq!(r("2024-06-13T12:00:00"), Remaining { text: "3 天".into(), urgent: false });
        assert_eq!(remaining(None, now), Remaining { text: "-".into(), urgent: false });
    }

    #[test]
    fn preview_truncates_by_chars() {
        assert_eq!(content_preview("短消息"), "短消息");
        let long: String = "鹅".repeat(81);
        let preview = content_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 83);
        assert_eq!(content_preview(&"a".repeat(80)), "a".repeat(80));
    }

    #[test]
    fn icons_and_colors() {
        assert_eq!(file_icon("image"), "🖼️");
        assert_eq!(file_icon("json"), "📄");
        assert_eq!(file_icon("zip"), "📎");
        assert_eq!(parse_hex_color("#88ccff"), Some(0x88ccff));
        assert_eq!(parse_hex_color("88ccff"), None);
        assert_eq!(parse_hex_color("#xyz"), None);
        assert_eq!(hex_color(0x0000ff), "#0000ff");
    }
}
