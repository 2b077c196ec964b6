//! 리포트 타임스탬프.

use chrono::{DateTime, Local, TimeZone};

/// 리포트 헤더에 쓰는 시각 형식 (분 단위)
pub const FETCH_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 현재 로컬 시각을 리포트 형식으로 반환합니다.
pub fn fetch_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// 주어진 시각을 리포트 형식으로 변환합니다.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(FETCH_TIME_FORMAT).to_string()
}
