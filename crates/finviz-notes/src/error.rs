//! 노트 업로드 오류 타입.

use thiserror::Error;

/// 노트 업로드 오류.
#[derive(Debug, Error)]
pub enum NoteError {
    /// 필수 설정 누락
    #[error("Configuration error: {0}")]
    Config(String),

    /// 요청 실패 (연결, 타임아웃)
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// 2xx가 아닌 응답
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 서버가 `status`를 거짓으로 응답
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// 응답 본문이 JSON이 아님
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, NoteError>;
