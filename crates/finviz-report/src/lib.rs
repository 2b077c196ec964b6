//! finviz 마크다운 리포트 생성.
//!
//! 이 crate는 다음을 제공합니다:
//! - 종목 리포트 (`ticker_report`)
//! - 시장 개요 리포트 (`market_report`)
//! - 스크리너 리포트 (`screener_report`)
//! - 고정 규칙 분석 (등급, 시그널 집계, 시나리오, 섹터 로테이션)
//!
//! 모든 생성기는 [`MarketDataSource`]만 사용하며 요청은 순차 실행합니다.

pub mod analysis;
pub mod error;
pub mod markdown;
pub mod market;
pub mod screener;
pub mod ticker;

use finviz_data::MarketDataSource;

pub use error::{ReportError, Result};
pub use markdown::{MarkdownDoc, ReportContext};
pub use market::market_report;
pub use screener::{screener_report, ScreenerFilters, ScreenerRequest};
pub use ticker::ticker_report;

/// 한 번의 실행에서 만들 리포트 목록
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRequest {
    pub market: bool,
    pub tickers: Vec<String>,
    pub screener: Option<ScreenerRequest>,
}

impl ReportRequest {
    /// 요청된 리포트가 없는지 확인
    pub fn is_empty(&self) -> bool {
        !self.market && self.tickers.is_empty() && self.screener.is_none()
    }
}

/// `"aapl, tsla,,"` -> `["AAPL", "TSLA"]`
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// 시장 개요, 종목, 스크리너 순으로 리포트를 만들어 `\n`으로 잇습니다.
pub async fn build_report(
    source: &dyn MarketDataSource,
    request: &ReportRequest,
    ctx: &ReportContext,
) -> String {
    let mut parts = Vec::new();

    if request.market {
        tracing::info!("시장 개요 리포트 생성");
        parts.push(market_report(source, ctx).await);
    }

    for ticker in &request.tickers {
        tracing::info!(ticker = %ticker, "종목 리포트 생성");
        parts.push(ticker_report(source, ticker, ctx).await);
    }

    if let Some(screener) = &request.screener {
        tracing::info!(signal = %screener.signal, limit = screener.limit, "스크리너 리포트 생성");
        parts.push(screener_report(source, screener, ctx).await);
    }

    parts.join("\n")
}
