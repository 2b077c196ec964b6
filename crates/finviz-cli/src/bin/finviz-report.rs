//! finviz 마크다운 리포트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 종목 리포트
//! finviz-report -t AAPL,TSLA
//!
//! # 시장 개요 + 분석 섹션
//! finviz-report -m --analyze -o daily.md
//!
//! # 스크리너
//! finviz-report -s -f '{"Sector":"Technology","Exchange":"NASDAQ"}' --signal "New High" -l 30
//!
//! # 시장 개요를 노트로 업로드
//! finviz-report -m --upload finviz-stock/daily_2026-02-17.md
//! ```

use std::process::ExitCode;

use clap::Parser;
use finviz_cli::commands::{init_cli_logging, report};
use finviz_cli::ReportArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ReportArgs::parse();
    init_cli_logging(&args.log_level);

    match report::run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("錯誤: {e:#}");
            ExitCode::FAILURE
        }
    }
}
