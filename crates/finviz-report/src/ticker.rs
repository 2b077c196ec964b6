//! 종목 리포트 (`# <T> 原始數據`).
//!
//! 종목 상세 페이지를 한 번 읽고 섹션별로 출력합니다. 섹션 하나가 실패해도
//! 나머지는 계속 출력하며, 기본 지표만 실패 안내 줄을 남깁니다.

use finviz_data::{ChartTimeframe, ChartType, MarketDataSource};

use crate::analysis::ticker_analysis_lines;
use crate::markdown::{MarkdownDoc, ReportContext};

/// 표/목록 섹션의 최대 행 수
const SECTION_ROWS: usize = 10;

/// 종목 리포트를 생성합니다.
pub async fn ticker_report(source: &dyn MarketDataSource, ticker: &str, ctx: &ReportContext) -> String {
    let mut doc = MarkdownDoc::titled(&format!("{ticker} 原始數據"), ctx);

    match source.quote(ticker).await {
        Ok(page) => {
            if let Ok(description) = page.description() {
                doc.text_section("公司描述", description);
            }

            match page.fundamentals() {
                Ok(fundamentals) => {
                    doc.line("## 基本面指標\n");
                    doc.line("| 指標 | 值 |");
                    doc.line("|------|-----|");
                    doc.lines(
                        fundamentals
                            .iter()
                            .filter(|(_, value)| !value.is_empty() && value.as_str() != "-")
                            .map(|(key, value)| format!("| {key} | {value} |")),
                    );
                    doc.blank();
                }
                Err(e) => {
                    tracing::warn!(ticker, error = %e, "기본 지표 없음");
                    doc.placeholder(&format!("基本面取得失敗: {e}"));
                }
            }

            if let Ok(peers) = page.peers() {
                if !peers.is_empty() {
                    doc.text_section("同業股票", &peers.join(", "));
                }
            }

            if let Ok(signals) = page.signals() {
                if !signals.is_empty() {
                    doc.text_section("技術訊號", &signals.join("、"));
                }
            }

            if let Ok(ratings) = page.outer_ratings() {
                if !ratings.is_empty() {
                    doc.table_section("分析師評級", &ratings.head(SECTION_ROWS));
                }
            }

            if let Ok(news) = page.news() {
                if !news.is_empty() {
                    let end = news.len().min(SECTION_ROWS);
                    doc.news_section("相關新聞", &news[..end]);
                }
            }

            if let Ok(insider) = page.insider_trades() {
                if !insider.is_empty() {
                    doc.table_section("內部交易", &insider.head(SECTION_ROWS));
                }
            }

            push_chart(&mut doc, source, ticker);

            if ctx.analyze {
                if let Ok(fundamentals) = page.fundamentals() {
                    doc.line("## 分析摘要\n");
                    doc.lines(ticker_analysis_lines(fundamentals));
                }
            }
        }
        Err(e) => {
            tracing::warn!(ticker, error = %e, "종목 페이지 요청 실패");
            doc.placeholder(&format!("基本面取得失敗: {e}"));
            push_chart(&mut doc, source, ticker);
        }
    }

    doc.finish()
}

fn push_chart(doc: &mut MarkdownDoc, source: &dyn MarketDataSource, ticker: &str) {
    let url = source.chart_url(ticker, ChartTimeframe::Daily, ChartType::Advanced);
    doc.text_section("K線圖", &format!("![{ticker} Chart]({url})"));
}
