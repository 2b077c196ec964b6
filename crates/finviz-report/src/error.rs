//! 리포트 입력 오류 타입.

use thiserror::Error;

/// 리포트 요청 오류.
#[derive(Debug, Error)]
pub enum ReportError {
    /// 필터 JSON 파싱 실패
    #[error("Invalid filters JSON: {0}")]
    InvalidFilters(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::InvalidFilters(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
