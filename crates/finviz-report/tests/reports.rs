//! 리포트 생성기 통합 테스트 (미리 준비한 응답을 돌려주는 데이터 소스 사용).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use finviz_core::DataTable;
use finviz_data::{
    ChartTimeframe, ChartType, EarningsCalendar, EarningsPeriod, FinvizError, Group, GroupOrder,
    InsiderOption, MarketDataSource, MarketNews, NewsItem, QuotePage, ScreenerQuery,
};
use finviz_report::{
    build_report, market_report, screener_report, ticker_report, ReportContext, ReportRequest,
    ScreenerFilters, ScreenerRequest,
};

const FETCHED_AT: &str = "2026-02-18 09:30";

#[derive(Default)]
struct ScriptedSource {
    quotes: HashMap<String, QuotePage>,
    sectors: Option<DataTable>,
    /// 시그널별 스크리너 결과
    screens: HashMap<String, DataTable>,
    /// 종목 지정(`t=`) 조회에 쓰는 개요 화면 표
    overview: Option<DataTable>,
    news: Option<MarketNews>,
    insider: Option<DataTable>,
    earnings: Option<DataTable>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn unavailable(path: &str) -> FinvizError {
    FinvizError::Http {
        status: 503,
        url: format!("https://finviz.test/{path}"),
    }
}

#[async_trait]
impl MarketDataSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn quote(&self, ticker: &str) -> finviz_data::Result<QuotePage> {
        self.record(format!("quote:{ticker}"));
        self.quotes
            .get(ticker)
            .cloned()
            .ok_or_else(|| unavailable("quote.ashx"))
    }

    fn chart_url(&self, ticker: &str, timeframe: ChartTimeframe, chart_type: ChartType) -> String {
        finviz_data::provider::chart_url("https://finviz.test", ticker, timeframe, chart_type)
    }

    async fn screener(&self, query: &ScreenerQuery) -> finviz_data::Result<DataTable> {
        let query_string = query.to_query_string()?;
        self.record(format!("screener:{query_string}"));
        if !query.tickers.is_empty() {
            let overview = self.overview.clone().ok_or_else(|| unavailable("screener.ashx"))?;
            let idx = overview.column_index("Ticker").unwrap();
            return Ok(overview.filter_rows(|row| query.tickers.contains(&row[idx])));
        }
        let table = self
            .screens
            .get(&query.signal)
            .cloned()
            .ok_or_else(|| unavailable("screener.ashx"))?;
        Ok(if query.limit > 0 { table.head(query.limit) } else { table })
    }

    async fn group_overview(&self, group: Group, _order: GroupOrder) -> finviz_data::Result<DataTable> {
        self.record(format!("group:{group}"));
        self.sectors.clone().ok_or_else(|| unavailable("groups.ashx"))
    }

    async fn market_news(&self) -> finviz_data::Result<MarketNews> {
        self.record("news".to_string());
        self.news.clone().ok_or_else(|| unavailable("news.ashx"))
    }

    async fn insider(&self, option: InsiderOption) -> finviz_data::Result<DataTable> {
        self.record(format!("insider:{option}"));
        self.insider.clone().ok_or_else(|| unavailable("insidertrading.ashx"))
    }

    async fn earnings(&self, period: EarningsPeriod) -> finviz_data::Result<EarningsCalendar> {
        self.record(format!("earnings:{period}"));
        self.earnings
            .clone()
            .map(|table| EarningsCalendar::new(period, table))
            .ok_or_else(|| unavailable("screener.ashx"))
    }
}

fn ctx() -> ReportContext {
    ReportContext::at(FETCHED_AT)
}

fn news_items(count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|n| {
            NewsItem::new(
                format!("2026-02-18 08:{n:02}"),
                format!("Headline {n}"),
                format!("https://example.com/{n}"),
                "Reuters",
            )
        })
        .collect()
}

fn table(columns: &[&str], rows: &[&[&str]]) -> DataTable {
    let mut out = DataTable::new(columns.iter().copied());
    for row in rows {
        out.push_row(row.iter().copied());
    }
    out
}

fn nvda_page() -> QuotePage {
    QuotePage::new("NVDA")
        .with_description("NVIDIA Corporation provides graphics and compute solutions.")
        .with_fundamentals([
            ("P/E", "52.31"),
            ("PEG", "-"),
            ("Price", "153.80"),
            ("Target Price", "180.50"),
            ("RSI (14)", "58.12"),
            ("Dividend", ""),
        ])
        .with_peers(["AMD", "AVGO", "INTC"])
        .with_signals(["New High", "Channel Up"])
        .with_outer_ratings(table(
            &["Date", "Status", "Outer", "Rating", "Price"],
            &[&["Feb-12-26", "Upgrade", "Morgan Stanley", "Overweight", "$190"]],
        ))
        .with_news(news_items(12))
        .with_insider_trades(table(
            &["Insider Trading", "Transaction"],
            &[&["PURI AJAY K", "Sale"]],
        ))
}

#[tokio::test]
async fn test_ticker_report_sections_in_order() {
    let mut source = ScriptedSource::default();
    source.quotes.insert("NVDA".into(), nvda_page());

    let report = ticker_report(&source, "NVDA", &ctx()).await;

    assert!(report.starts_with(
        "# NVDA 原始數據\n*擷取時間: 2026-02-18 09:30*\n\n## 公司描述\nNVIDIA Corporation provides graphics and compute solutions.\n\n## 基本面指標\n\n| 指標 | 值 |\n|------|-----|\n| P/E | 52.31 |\n| Price | 153.80 |\n"
    ));
    assert!(!report.contains("| PEG |"));
    assert!(!report.contains("| Dividend |"));
    assert!(report.contains("## 同業股票\nAMD, AVGO, INTC\n"));
    assert!(report.contains("## 技術訊號\nNew High、Channel Up\n"));
    assert!(report.contains("* **2026-02-18 08:01** [Headline 1](https://example.com/1) *(Reuters)*"));
    assert!(report.contains("[Headline 10]"));
    assert!(!report.contains("[Headline 11]"));
    assert!(report.ends_with(
        "## K線圖\n![NVDA Chart](https://finviz.test/chart.ashx?t=NVDA&ty=c&ta=1&p=d)\n"
    ));
    assert!(!report.contains("## 分析摘要"));

    let order = [
        "## 公司描述",
        "## 基本面指標",
        "## 同業股票",
        "## 技術訊號",
        "## 分析師評級",
        "## 相關新聞",
        "## 內部交易",
        "## K線圖",
    ];
    let positions: Vec<usize> = order.iter().map(|h| report.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_ticker_report_quote_failure_keeps_chart() {
    let source = ScriptedSource::default();
    let report = ticker_report(&source, "ZZZZ", &ctx()).await;

    assert_eq!(
        report,
        "# ZZZZ 原始數據\n*擷取時間: 2026-02-18 09:30*\n\n\
         *基本面取得失敗: HTTP 503 from https://finviz.test/quote.ashx*\n\n\
         ## K線圖\n![ZZZZ Chart](https://finviz.test/chart.ashx?t=ZZZZ&ty=c&ta=1&p=d)\n"
    );
}

#[tokio::test]
async fn test_ticker_report_missing_sections_dropped() {
    let mut source = ScriptedSource::default();
    source
        .quotes
        .insert("TINY".into(), QuotePage::new("TINY").with_peers(Vec::<String>::new()));

    let report = ticker_report(&source, "TINY", &ctx()).await;

    assert!(report.contains("*基本面取得失敗: Section not found: fundamentals*"));
    assert!(!report.contains("## 公司描述"));
    assert!(!report.contains("## 同業股票"));
    assert!(!report.contains("## 相關新聞"));
    assert!(report.contains("## K線圖"));
}

#[tokio::test]
async fn test_ticker_report_extreme_metrics() {
    let mut source = ScriptedSource::default();
    source.quotes.insert(
        "HUGE".into(),
        QuotePage::new("HUGE").with_fundamentals([
            ("Price", "0.0000001"),
            ("Target Price", "99999999999999999999T"),
            ("Market Cap", "79228162514264337593543950335B"),
            ("RSI (14)", "25.00"),
        ]),
    );
    source.quotes.insert(
        "WIDE".into(),
        QuotePage::new("WIDE").with_fundamentals([
            ("Price", "0.0000001"),
            ("Target Price", "79000000000000000000000000"),
        ]),
    );

    for ticker in ["HUGE", "WIDE"] {
        let report = ticker_report(&source, ticker, &ctx().with_analysis(true)).await;

        assert!(report.contains("## 基本面指標"));
        assert!(report.contains("## 分析摘要"));
        assert!(!report.contains("| 情境 |"));
        assert!(!report.contains("*預期報酬:"));
    }
}

#[tokio::test]
async fn test_ticker_report_with_analysis() {
    let mut source = ScriptedSource::default();
    source.quotes.insert("NVDA".into(), nvda_page());

    let report = ticker_report(&source, "NVDA", &ctx().with_analysis(true)).await;

    let chart = report.find("## K線圖").unwrap();
    let summary = report.find("## 分析摘要").unwrap();
    assert!(chart < summary);
    assert!(report.contains("| 估值 | P/E | 52.31 | F |"));
    assert!(report.contains("→ 中性"));
    assert!(report.contains("*預期報酬:"));
}

fn market_source() -> ScriptedSource {
    let mut source = ScriptedSource {
        sectors: Some(table(
            &["Name", "Change"],
            &[
                &["Technology", "1.85%"],
                &["Utilities", "0.35%"],
                &["Energy", "-0.42%"],
            ],
        )),
        news: Some(MarketNews {
            news: news_items(20),
            blogs: Vec::new(),
        }),
        insider: Some(table(&["Ticker", "Owner"], &[&["KMI", "KEAN STEVEN J"]])),
        earnings: Some(table(
            &["Ticker", "Market Cap", "ROE", "Earnings", "Price"],
            &[
                &["WMT", "760.20B", "21.40%", "Feb 17/b", "94.61"],
                &["SMLL", "1.20B", "3.10%", "Feb 17/a", "12.40"],
                &["TINY", "0.40B", "-", "Feb 18/b", "3.05"],
                &["NVDA", "3755.20B", "119.18%", "Feb 19/a", "153.80"],
            ],
        )),
        overview: Some(table(
            &["Ticker", "Company", "Sector", "Market Cap", "P/E", "Price", "Change"],
            &[
                &["NVDA", "NVIDIA Corp", "Technology", "3755.20B", "52.31", "153.80", "1.10%"],
                &["SMLL", "Small Co", "Industrials", "1.20B", "8.20", "12.40", "-0.30%"],
                &["TINY", "Tiny Inc", "Energy", "0.40B", "-", "3.05", "2.00%"],
                &["WMT", "Walmart Inc", "Consumer Defensive", "760.20B", "38.01", "94.61", "0.45%"],
            ],
        )),
        ..Default::default()
    };
    source.screens.insert(
        "Top Gainers".into(),
        table(&["Ticker", "Change"], &[&["SMCI", "14.52%"], &["ARM", "11.02%"]]),
    );
    source.screens.insert(
        "Top Losers".into(),
        table(&["Ticker", "Change"], &[&["XYZ", "-9.10%"]]),
    );
    source
}

#[tokio::test]
async fn test_market_report() {
    let source = market_source();
    let report = market_report(&source, &ctx()).await;

    assert!(report.starts_with("# 美股大盤原始數據\n*擷取時間: 2026-02-18 09:30*\n\n## 板塊表現\n"));
    assert!(report.contains("## 今日漲幅前 10\n\n| Ticker | Change |"));
    assert!(report.contains("## 今日跌幅前 10\n"));
    assert!(report.contains("[Headline 15]"));
    assert!(!report.contains("[Headline 16]"));
    assert!(report.contains("## 本週內部人買入\n"));
    assert!(report.contains("## 本週財報日曆\n"));
    assert!(report.contains("### Feb 17\n"));
    assert!(report.contains("### Feb 19\n"));
    assert!(!report.contains("### Feb 18"));
    assert!(!report.contains("SMLL"));
    let feb17 = report.find("### Feb 17\n\n| Ticker | Company").unwrap();
    let feb19 = report.find("### Feb 19\n").unwrap();
    let calendar = &report[feb17..feb19];
    assert!(calendar.contains("Walmart Inc"));
    assert!(calendar.contains("Consumer Defensive"));
    assert!(!calendar.contains("ROE"));
    assert!(!calendar.contains("Feb 17/b"));
    assert!(!report.contains("## 板塊輪動"));

    let calls = source.calls();
    assert_eq!(calls[0], "group:Sector");
    assert_eq!(calls[1], "screener:v=111&s=ta_topgainers&o=-change");
    assert_eq!(calls[2], "screener:v=111&s=ta_toplosers&o=change");
    assert_eq!(calls[3], "news");
    assert_eq!(calls[4], "insider:top week buys");
    assert_eq!(calls[5], "earnings:This Week");
    assert_eq!(
        calls[6..],
        [
            "screener:v=111&t=WMT,SMLL&o=ticker",
            "screener:v=111&t=TINY&o=ticker",
            "screener:v=111&t=NVDA&o=ticker",
        ]
    );
}

#[tokio::test]
async fn test_market_report_skips_empty_movers() {
    let mut source = market_source();
    source.screens.insert("Top Gainers".into(), DataTable::default());
    source
        .screens
        .insert("Top Losers".into(), DataTable::new(["Ticker", "Change"]));

    let report = market_report(&source, &ctx()).await;

    assert!(!report.contains("## 今日漲幅前 10"));
    assert!(!report.contains("## 今日跌幅前 10"));
    assert!(!report.contains("||"));
    assert!(!report.contains("取得失敗"));
    assert!(report.contains("## 板塊表現\n"));
    assert!(report.contains("## 重大新聞"));
}

#[tokio::test]
async fn test_market_report_earnings_rescreen_failure() {
    let mut source = market_source();
    source.overview = None;

    let report = market_report(&source, &ctx()).await;

    assert!(!report.contains("## 本週財報日曆"));
    assert!(report.contains("## 本週內部人買入"));
}

#[tokio::test]
async fn test_market_report_failures() {
    let source = ScriptedSource::default();
    let report = market_report(&source, &ctx()).await;

    assert!(report.contains("*板塊取得失敗: HTTP 503 from https://finviz.test/groups.ashx*\n"));
    assert!(report.contains("*Gainers 取得失敗: HTTP 503"));
    assert!(report.contains("*Losers 取得失敗: HTTP 503"));
    assert!(report.contains("*新聞取得失敗: HTTP 503"));
    assert!(!report.contains("## 本週內部人買入"));
    assert!(!report.contains("## 本週財報日曆"));
}

#[tokio::test]
async fn test_market_report_with_rotation() {
    let source = market_source();
    let report = market_report(&source, &ctx().with_analysis(true)).await;

    assert!(report.contains("## 板塊輪動\n"));
    assert!(report.contains("* **領漲板塊**: Technology (+1.9%)"));
    assert!(report.contains("* **判斷**: 資金流向景氣循環板塊 (風險偏好)"));
}

fn screener_request(filters: &str, signal: &str) -> ScreenerRequest {
    ScreenerRequest {
        filters: ScreenerFilters::parse(filters).unwrap(),
        signal: signal.to_string(),
        limit: 20,
    }
}

#[tokio::test]
async fn test_screener_report_found() {
    let mut source = ScriptedSource::default();
    source.screens.insert(
        "New High".into(),
        table(&["Ticker", "Change"], &[&["SMCI", "14.52%"], &["ARM", "11.02%"]]),
    );

    let request = screener_request(r#"{"Sector":"Technology"}"#, "New High");
    let report = screener_report(&source, &request, &ctx()).await;

    assert!(report.starts_with(
        "# 股票篩選結果\n*擷取時間: 2026-02-18 09:30*\n\n**篩選條件**: {\"Sector\": \"Technology\"}\n**訊號**: New High\n\n共 2 檔:\n\n| Ticker |"
    ));
    assert!(!report.ends_with('\n'));
}

#[tokio::test]
async fn test_screener_report_empty_and_failed() {
    let mut source = ScriptedSource::default();
    source.screens.insert(String::new(), DataTable::new(["Ticker"]));

    let empty = screener_report(&source, &screener_request("{}", ""), &ctx()).await;
    assert_eq!(
        empty,
        "# 股票篩選結果\n*擷取時間: 2026-02-18 09:30*\n\n\n未找到符合條件的股票。"
    );

    let invalid = screener_report(&source, &screener_request(r#"{"Moon Phase":"Full"}"#, ""), &ctx()).await;
    assert!(invalid.ends_with("*篩選失敗: Invalid filter: Moon Phase=Full*"));
}

#[tokio::test]
async fn test_build_report_order() {
    let mut source = market_source();
    source.quotes.insert("NVDA".into(), nvda_page());

    let request = ReportRequest {
        market: true,
        tickers: vec!["NVDA".into(), "AMD".into()],
        screener: Some(screener_request("{}", "Top Gainers")),
    };
    let report = build_report(&source, &request, &ctx()).await;

    let market = report.find("# 美股大盤原始數據").unwrap();
    let nvda = report.find("# NVDA 原始數據").unwrap();
    let amd = report.find("# AMD 原始數據").unwrap();
    let screener = report.find("# 股票篩選結果").unwrap();
    assert!(market < nvda && nvda < amd && amd < screener);

    let quotes: Vec<String> = source
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("quote:"))
        .collect();
    assert_eq!(quotes, vec!["quote:NVDA", "quote:AMD"]);
}
