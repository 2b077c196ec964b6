//! finviz 리포트 CLI 도구 모음.
//!
//! 이 crate는 두 개의 바이너리를 제공합니다:
//! - `finviz-report`: 종목/시장/스크리너 마크다운 리포트 출력
//! - `upload-note`: 마크다운 파일을 노트 보관소에 업로드

pub mod commands;

pub use commands::report::ReportArgs;
pub use commands::upload::{NoteTarget, UploadArgs};
