//! 환경변수 기반 업로드 설정.

use std::path::Path;
use std::time::Duration;

use finviz_core::env_var_opt;

use crate::error::{NoteError, Result};

/// 기본 vault 이름
pub const DEFAULT_VAULT: &str = "Obsidian";

/// 파일 업로드 시 기본 노트 폴더
const DEFAULT_NOTE_DIR: &str = "finviz-stock";

/// 업로드 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteConfig {
    /// 서버 주소 (`FAST_NOTE_URL`)
    pub base_url: String,
    /// API 토큰 (`FAST_NOTE_TOKEN`, Authorization 헤더에 그대로 사용)
    pub token: String,
    /// vault 이름 (`FAST_NOTE_VAULT`, 기본: Obsidian)
    pub vault: String,
    /// 요청 타임아웃 (`FAST_NOTE_TIMEOUT_SECS`, 기본: 30초)
    pub timeout: Duration,
}

impl NoteConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            vault: DEFAULT_VAULT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var_opt)
    }

    /// 조회 함수로 설정 로드 (빈 값은 미설정으로 취급)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(base_url), Some(token)) = (get("FAST_NOTE_URL"), get("FAST_NOTE_TOKEN")) else {
            return Err(NoteError::Config(
                "FAST_NOTE_URL and FAST_NOTE_TOKEN must be set".to_string(),
            ));
        };

        let timeout = get("FAST_NOTE_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url,
            token,
            vault: get("FAST_NOTE_VAULT").unwrap_or_else(|| DEFAULT_VAULT.to_string()),
            timeout: Duration::from_secs(timeout),
        })
    }

    /// vault 덮어쓰기 (None이면 유지)
    pub fn with_vault(mut self, vault: Option<String>) -> Self {
        if let Some(vault) = vault.filter(|v| !v.trim().is_empty()) {
            self.vault = vault;
        }
        self
    }

    /// 업로드 엔드포인트 (`<base_url>/api/note`)
    pub fn endpoint(&self) -> String {
        format!("{}/api/note", self.base_url.trim_end_matches('/'))
    }
}

/// 파일 업로드 시 기본 노트 경로 (`finviz-stock/<파일명>`)
pub fn default_note_path(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{DEFAULT_NOTE_DIR}/{name}")
}
