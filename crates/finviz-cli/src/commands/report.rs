//! `finviz-report`: finviz 데이터를 마크다운 리포트로 출력.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use finviz_core::load_dotenv;
use finviz_data::FinvizClient;
use finviz_notes::NoteUploader;
use finviz_report::{
    build_report, parse_tickers, ReportContext, ReportRequest, ScreenerFilters, ScreenerRequest,
};

use super::upload::{print_missing_config, print_receipt, print_upload_error};

#[derive(Parser, Debug)]
#[command(name = "finviz-report")]
#[command(about = "Finviz 數據擷取工具", long_about = None)]
#[command(version)]
pub struct ReportArgs {
    /// 종목 코드 (예: AAPL,TSLA)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// 시장 개요
    #[arg(short, long)]
    pub market_overview: bool,

    /// 스크리너 실행
    #[arg(short, long)]
    pub screener: bool,

    /// 스크리너 필터 JSON (예: {"Sector":"Technology"})
    #[arg(short, long, default_value = "{}")]
    pub filters: String,

    /// 스크리너 시그널 (예: "Top Gainers")
    #[arg(long, default_value = "")]
    pub signal: String,

    /// 스크리너 최대 종목 수
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// 리포트를 stdout 대신 파일로 저장
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 리포트를 노트 보관소의 해당 경로로 업로드
    #[arg(long, value_name = "NOTE_PATH")]
    pub upload: Option<String>,

    /// 분석 섹션 추가 (등급, 시나리오, 섹터 로테이션)
    #[arg(long)]
    pub analyze: bool,

    /// 로그 레벨 (RUST_LOG가 우선)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl ReportArgs {
    /// 요청할 리포트 목록. 스크리너를 켠 경우에만 필터 JSON을 검사합니다.
    pub fn to_request(&self) -> anyhow::Result<ReportRequest> {
        let screener = if self.screener {
            let filters = ScreenerFilters::parse(&self.filters)
                .with_context(|| format!("--filters 파싱 실패: {}", self.filters))?;
            Some(ScreenerRequest {
                filters,
                signal: self.signal.clone(),
                limit: self.limit,
            })
        } else {
            None
        };

        Ok(ReportRequest {
            market: self.market_overview,
            tickers: self
                .ticker
                .as_deref()
                .map(parse_tickers)
                .unwrap_or_default(),
            screener,
        })
    }
}

/// `finviz-report` 실행
pub async fn run(args: ReportArgs) -> anyhow::Result<ExitCode> {
    load_dotenv();

    let request = args.to_request()?;
    if request.is_empty() {
        ReportArgs::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    }

    // 업로드 설정은 조회 전에 확인
    let uploader = match &args.upload {
        Some(_) => match NoteUploader::from_env() {
            Ok(uploader) => Some(uploader),
            Err(e) => {
                tracing::debug!(error = %e, "업로드 설정 누락");
                print_missing_config();
                return Ok(ExitCode::FAILURE);
            }
        },
        None => None,
    };

    let client = FinvizClient::from_env().context("finviz 클라이언트 생성 실패")?;
    let ctx = ReportContext::now().with_analysis(args.analyze);
    let report = build_report(&client, &request, &ctx).await;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &report)
                .await
                .with_context(|| format!("리포트 저장 실패: {}", path.display()))?;
            tracing::info!(path = %path.display(), "리포트 저장 완료");
        }
        None => println!("{report}"),
    }

    if let (Some(uploader), Some(note_path)) = (uploader, &args.upload) {
        match uploader.upload(note_path, &report).await {
            Ok(receipt) => print_receipt(&receipt),
            Err(e) => {
                print_upload_error(&e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
