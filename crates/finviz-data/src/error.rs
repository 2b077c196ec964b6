//! finviz 데이터 모듈 오류 타입.

use thiserror::Error;

/// finviz 수집 오류.
#[derive(Debug, Error)]
pub enum FinvizError {
    /// HTTP 요청 실패 (연결, 타임아웃, 본문 읽기)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 2xx가 아닌 응답
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// 요청 한도 초과 (HTTP 429)
    #[error("Rate limited by finviz")]
    RateLimited,

    /// 페이지에 해당 섹션이 없음
    #[error("Section not found: {0}")]
    MissingSection(String),

    /// 알 수 없는 스크리너 필터
    #[error("Invalid filter: {name}={value}")]
    InvalidFilter { name: String, value: String },

    /// 알 수 없는 시그널
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// 알 수 없는 정렬 기준
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// 알 수 없는 옵션 (내부자 거래 프리셋, 그룹, 기간 등)
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// HTML 파싱 실패
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FinvizError {
    /// 입력값 문제로 발생한 오류인지 확인합니다.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            FinvizError::InvalidFilter { .. }
                | FinvizError::InvalidSignal(_)
                | FinvizError::InvalidOrder(_)
                | FinvizError::InvalidOption(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FinvizError>;
