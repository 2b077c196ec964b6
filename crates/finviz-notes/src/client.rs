//! Fast Note Sync 업로드 클라이언트.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};

/// 업로드 요청 본문
#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    vault: &'a str,
    path: &'a str,
    content: &'a str,
}

/// 업로드 성공 응답 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// vault 내 노트 경로
    pub path: String,
    /// 서버가 돌려준 노트 버전
    pub version: Option<String>,
    /// 서버가 돌려준 노트 ID
    pub id: Option<String>,
    /// 서버 메시지
    pub message: Option<String>,
}

impl UploadReceipt {
    /// 버전 표시값 (없으면 `?`)
    pub fn version_display(&self) -> &str {
        self.version.as_deref().unwrap_or("?")
    }

    /// ID 표시값 (없으면 `?`)
    pub fn id_display(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }

    fn from_response(path: &str, body: &Value) -> Self {
        let data = body.get("data");
        Self {
            path: path.to_string(),
            version: data.and_then(|d| d.get("version")).and_then(scalar_text),
            id: data.and_then(|d| d.get("id")).and_then(scalar_text),
            message: body.get("message").and_then(scalar_text),
        }
    }
}

/// 노트 업로더
pub struct NoteUploader {
    config: NoteConfig,
    client: Client,
}

impl NoteUploader {
    pub fn new(config: NoteConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// 환경변수 설정으로 생성
    pub fn from_env() -> Result<Self> {
        Self::new(NoteConfig::from_env()?)
    }

    pub fn config(&self) -> &NoteConfig {
        &self.config
    }

    /// 노트를 생성하거나 갱신합니다. 재시도하지 않습니다.
    pub async fn upload(&self, path: &str, content: &str) -> Result<UploadReceipt> {
        let url = self.config.endpoint();
        let payload = NotePayload {
            vault: &self.config.vault,
            path,
            content,
        };

        debug!(vault = %self.config.vault, path, bytes = content.len(), "노트 업로드 요청");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.config.token.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("노트 업로드 실패: {} - {}", status, body);
            return Err(NoteError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| NoteError::InvalidResponse(format!("{e}: {body}")))?;

        if !is_truthy(json.get("status")) {
            let message = json
                .get("message")
                .and_then(scalar_text)
                .unwrap_or_else(|| "unknown error".to_string());
            warn!(path, message = %message, "서버가 업로드를 거부");
            return Err(NoteError::Rejected(message));
        }

        let receipt = UploadReceipt::from_response(path, &json);
        info!(
            path,
            version = receipt.version_display(),
            id = receipt.id_display(),
            "노트 업로드 완료"
        );
        Ok(receipt)
    }
}

/// 응답의 `status` 참/거짓 판정 (null, false, 0, 빈 문자열/배열/객체는 거짓)
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// 문자열은 그대로, 숫자/불리언은 표기 그대로. null과 컨테이너는 None.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
