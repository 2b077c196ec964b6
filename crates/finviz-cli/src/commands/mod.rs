//! 바이너리별 인자 정의와 실행 로직.

pub mod report;
pub mod upload;

use finviz_core::{init_logging, LogConfig};

/// CLI 로깅 초기화. `RUST_LOG`가 있으면 `level`보다 우선합니다.
pub fn init_cli_logging(level: &str) {
    if let Err(e) = init_logging(LogConfig::for_cli(level)) {
        eprintln!("로깅 초기화 실패: {e}");
    }
}
