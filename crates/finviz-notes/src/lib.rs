//! Fast Note Sync 업로드 클라이언트.
//!
//! 마크다운 리포트를 `POST <base>/api/note`로 노트 보관소(vault)에
//! 생성/갱신합니다. 요청은 한 번만 보내며 재시도하지 않습니다.

pub mod client;
pub mod config;
pub mod error;

pub use client::{NoteUploader, UploadReceipt};
pub use config::{default_note_path, NoteConfig, DEFAULT_VAULT};
pub use error::{NoteError, Result};
