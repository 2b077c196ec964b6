//! 리포트 도구용 로깅 초기화.
//!
//! stdout은 리포트 본문 전용이므로 모든 로그는 stderr로 나갑니다.
//! 레벨은 `RUST_LOG`가 있으면 그 값을, 없으면 CLI의 `--log-level`을 씁니다.
//! 형식은 `LOG_FORMAT` (`compact` | `pretty` | `json`)으로 고릅니다.

use std::io::IsTerminal;
use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::env_var_opt;
use crate::error::{CoreError, CoreResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 한 줄 형식 (CLI 기본값)
    #[default]
    Compact,
    /// 여러 줄 형식 (디버깅용)
    Pretty,
    /// 로그 수집용 JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(CoreError::InvalidInput(format!("LOG_FORMAT: {other}"))),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `RUST_LOG`가 없을 때 쓰는 필터 (예: "warn", "finviz_data=debug")
    pub level: String,
    pub format: LogFormat,
    /// 색상 출력 (stderr가 터미널일 때만 기본 활성)
    pub ansi: bool,
    /// 모듈 경로 표시
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            ansi: std::io::stderr().is_terminal(),
            with_target: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// CLI 레벨 + `LOG_FORMAT`. 알 수 없는 형식은 compact로 대체합니다.
    /// JSON 형식에서는 모듈 경로도 함께 기록합니다.
    pub fn for_cli(level: impl Into<String>) -> Self {
        let format: LogFormat = env_var_opt("LOG_FORMAT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self::new(level)
            .with_format(format)
            .with_target(format == LogFormat::Json)
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(self.ansi)
            .with_target(self.with_target);
        match self.format {
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base.json().boxed(),
        }
    }
}

/// 전역 subscriber를 설치합니다. 두 번째 호출은 `CoreError::Logging`입니다.
///
/// ```no_run
/// use finviz_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("finviz_data=debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> CoreResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| CoreError::Logging(format!("filter `{}`: {e}", config.level)))?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()
        .map_err(|e| CoreError::Logging(e.to_string()))?;

    tracing::debug!(format = ?config.format, level = %config.level, "로깅 초기화");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::new("info").with_target(true);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.with_target);
    }
}
