//! 时间展示模块
//!
//! 服务端返回的时间为字符串（RFC 3339 或无时区的 ISO 8601），
//! 此处统一解析并格式化为界面展示用的短日期。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// 解析服务端时间字符串，返回日期部分
///
/// 支持：
/// - `2024-03-01T10:00:00Z` / `2024-03-01T10:00:00.123+08:00`
/// - `2024-03-01T10:00:00.123456`
/// - `2024-03-01`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// 格式化为 `Mar 1, 2024`，无法解析时原样返回
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
