//! 공통 에러 타입.

use thiserror::Error;

/// 공통 모듈 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 전역 subscriber 설치 또는 필터 파싱 실패
    #[error("로깅 초기화 에러: {0}")]
    Logging(String),

    /// 환경변수/인자 값이 허용 범위 밖
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 공통 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CoreError::InvalidInput("LOG_FORMAT: xml".to_string()).to_string(),
            "잘못된 입력: LOG_FORMAT: xml"
        );
    }
}
