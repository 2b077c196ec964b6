//! # Finviz Core
//!
//! finviz 리포트 도구들이 공유하는 기본 타입을 제공합니다:
//! - 에러 타입
//! - 로깅 인프라
//! - 환경변수 기반 설정 헬퍼
//! - 표 형식 데이터(`DataTable`)와 마크다운 렌더링
//! - finviz 수치 문자열 파싱

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod metric;
pub mod table;

pub use clock::fetch_timestamp;
pub use config::{env_var_opt, env_var_parse, load_dotenv};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metric::parse_metric;
pub use table::DataTable;
