//! 시장 개요 리포트 (`# 美股大盤原始數據`).

use finviz_core::{parse_metric, DataTable};
use finviz_data::{
    EarningsPeriod, Group, GroupOrder, InsiderOption, MarketDataSource, ScreenerQuery, ScreenerView,
};
use rust_decimal::Decimal;

use crate::analysis::{rotation_lines, sector_rotation};
use crate::markdown::{MarkdownDoc, ReportContext};

/// 상승/하락 상위 종목 수
const MOVERS_LIMIT: usize = 10;
/// 시장 뉴스 행 수
const NEWS_ROWS: usize = 15;
/// 내부자 매수 행 수
const INSIDER_ROWS: usize = 10;
/// 실적 일정에서 날짜별 최대 종목 수
const EARNINGS_ROWS: usize = 5;
/// 실적 일정에 포함할 최소 시가총액 (50억 달러)
const EARNINGS_MIN_MARKET_CAP: i64 = 5_000_000_000;

/// 시장 개요 리포트를 생성합니다.
pub async fn market_report(source: &dyn MarketDataSource, ctx: &ReportContext) -> String {
    let mut doc = MarkdownDoc::titled("美股大盤原始數據", ctx);

    let sectors = match source.group_overview(Group::Sector, GroupOrder::Change).await {
        Ok(table) => {
            doc.table_section("板塊表現", &table);
            Some(table)
        }
        Err(e) => {
            tracing::warn!(error = %e, "섹터 성과 요청 실패");
            doc.placeholder(&format!("板塊取得失敗: {e}"));
            None
        }
    };

    let gainers = ScreenerQuery::new()
        .signal("Top Gainers")
        .order_by("Change", false)
        .limit(MOVERS_LIMIT);
    match source.screener(&gainers).await {
        Ok(table) if !table.is_empty() => doc.table_section("今日漲幅前 10", &table),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "상승 상위 요청 실패");
            doc.placeholder(&format!("Gainers 取得失敗: {e}"));
        }
    }

    let losers = ScreenerQuery::new()
        .signal("Top Losers")
        .order_by("Change", true)
        .limit(MOVERS_LIMIT);
    match source.screener(&losers).await {
        Ok(table) if !table.is_empty() => doc.table_section("今日跌幅前 10", &table),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "하락 상위 요청 실패");
            doc.placeholder(&format!("Losers 取得失敗: {e}"));
        }
    }

    match source.market_news().await {
        Ok(market) => {
            if !market.news.is_empty() {
                let end = market.news.len().min(NEWS_ROWS);
                doc.news_section("重大新聞", &market.news[..end]);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "시장 뉴스 요청 실패");
            doc.placeholder(&format!("新聞取得失敗: {e}"));
        }
    }

    match source.insider(InsiderOption::TopWeekBuys).await {
        Ok(table) if !table.is_empty() => doc.table_section("本週內部人買入", &table.head(INSIDER_ROWS)),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "내부자 매수 요청 실패"),
    }

    // 날짜별 표는 개요 화면 열로 출력
    match source.earnings_days(EarningsPeriod::ThisWeek, ScreenerView::Overview).await {
        Ok(days) => {
            if !days.is_empty() {
                doc.line("## 本週財報日曆\n");
                for (day, table) in &days {
                    let big = large_caps(table);
                    if !big.is_empty() {
                        doc.line(format!("### {day}\n"));
                        doc.line(big.to_markdown());
                        doc.blank();
                    }
                }
            }
        }
        Err(e) => tracing::warn!(error = %e, "실적 일정 요청 실패"),
    }

    if ctx.analyze {
        if let Some(rotation) = sectors.as_ref().and_then(sector_rotation) {
            doc.line("## 板塊輪動\n");
            doc.lines(rotation_lines(&rotation));
        }
    }

    doc.finish()
}

/// 시가총액 50억 달러 초과 종목 상위 5개. `Market Cap` 열이 없으면 빈 표.
fn large_caps(table: &DataTable) -> DataTable {
    let Some(idx) = table.column_index("Market Cap") else {
        return DataTable::new(table.columns.iter().cloned());
    };
    let min = Decimal::from(EARNINGS_MIN_MARKET_CAP);
    table
        .filter_rows(|row| {
            row.get(idx)
                .and_then(|cap| parse_metric(cap))
                .is_some_and(|cap| cap > min)
        })
        .head(EARNINGS_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_caps() {
        let mut table = DataTable::new(["Ticker", "Market Cap"]);
        table.push_row(["WMT", "760.20B"]);
        table.push_row(["SMLL", "1.20B"]);
        table.push_row(["EDGE", "5.00B"]);
        table.push_row(["NONE", "-"]);

        let big = large_caps(&table);
        assert_eq!(big.len(), 1);
        assert_eq!(big.value(0, "Ticker"), Some("WMT"));
    }

    #[test]
    fn test_large_caps_without_column() {
        let mut table = DataTable::new(["Ticker"]);
        table.push_row(["WMT"]);
        assert!(large_caps(&table).is_empty());
    }
}
