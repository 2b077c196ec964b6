//! 마크다운 리포트 업로드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! upload-note daily.md
//! upload-note daily.md --path "finviz-stock/daily_2026-02-17.md"
//! echo "# content" | upload-note --stdin --path "finviz-stock/report.md"
//! ```

use std::process::ExitCode;

use clap::Parser;
use finviz_cli::commands::{init_cli_logging, upload};
use finviz_cli::UploadArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = UploadArgs::parse();
    init_cli_logging(&args.log_level);

    match upload::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("錯誤: {e:#}");
            ExitCode::FAILURE
        }
    }
}
