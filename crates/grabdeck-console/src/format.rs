/*
[INPUT]:  Task statuses, URLs, byte counts and durations
[OUTPUT]: Display strings for cards, tables and the new-download form
[POS]:    Presentation support - cosmetic formatting helpers
[UPDATE]: When a platform or status label is added
*/

use std::fmt;

use grabdeck_adapter::TaskStatus;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const UNKNOWN: &str = "unknown";

pub fn status_text(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::Downloading => "Downloading",
        TaskStatus::Paused => "Paused",
        TaskStatus::Completed => "Completed",
        TaskStatus::Failed => "Failed",
        TaskStatus::Cancelled => "Cancelled",
    }
}

pub fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "…",
        TaskStatus::Downloading => "↓",
        TaskStatus::Paused => "‖",
        TaskStatus::Completed => "✓",
        TaskStatus::Failed => "✗",
        TaskStatus::Cancelled => "⊘",
    }
}

/// Video site a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Bilibili,
    Douyin,
    Kuaishou,
    TikTok,
    Unknown,
}

const PLATFORM_DOMAINS: &[(Platform, &[&str])] = &[
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::Bilibili, &["bilibili.com", "b23.tv"]),
    (Platform::Douyin, &["douyin.com"]),
    (Platform::Kuaishou, &["kuaishou.com"]),
    (Platform::TikTok, &["tiktok.com"]),
];

impl Platform {
    /// Substring match on the lowercased link, first platform wins
    pub fn detect(url: &str) -> Self {
        let lower = url.to_lowercase();
        PLATFORM_DOMAINS
            .iter()
            .find(|(_, domains)| domains.iter().any(|domain| lower.contains(domain)))
            .map(|(platform, _)| *platform)
            .unwrap_or(Platform::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Bilibili => "bilibili",
            Self::Douyin => "douyin",
            Self::Kuaishou => "kuaishou",
            Self::TikTok => "tiktok",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `1536` -> `1.50 KB`; zero reads as unknown
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return UNKNOWN.to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// `m:ss` or `h:mm:ss`; zero reads as unknown
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return UNKNOWN.to_string();
    }
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Empty display strings from the service render as a dash
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

pub fn summary_label(count: usize) -> String {
    match count {
        1 => "1 task".to_string(),
        n => format!("{n} tasks"),
    }
}

/// Cut `text` to `max_width` terminal columns, ending in `…` when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}
