//! 종목 상세 페이지 (`quote.ashx?t=<T>&p=d`) 파서.
//!
//! 페이지 하나에서 회사 설명, 스냅샷 지표, 동종 종목, 기술적 시그널,
//! 애널리스트 의견, 뉴스, 내부자 거래를 한 번에 추출합니다.
//! 각 섹션은 독립적으로 누락될 수 있으며, 접근자는 누락 시
//! [`FinvizError::MissingSection`]을 반환합니다.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveTime};
use finviz_core::DataTable;
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::html::{direct_rows, element_text, find_table_with_header, first_text, query_param, row_cells, selector};
use super::query_value;
use crate::error::{FinvizError, Result};

/// 애널리스트 의견 표의 열
pub const RATING_COLUMNS: [&str; 5] = ["Date", "Status", "Outer", "Rating", "Price"];

/// 뉴스 한 건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// 게시 시각 (`YYYY-MM-DD HH:MM`, 파싱 실패 시 원문)
    pub date: String,
    pub title: String,
    pub link: String,
    pub source: String,
}

impl NewsItem {
    pub fn new(
        date: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            link: link.into(),
            source: source.into(),
        }
    }
}

/// 차트 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTimeframe {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ChartTimeframe {
    fn code(self) -> &'static str {
        match self {
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
        }
    }
}

/// 차트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartType {
    /// 캔들 + 기술적 지표 오버레이
    #[default]
    Advanced,
    Candle,
    Line,
}

/// 차트 이미지 URL을 생성합니다.
///
/// 네트워크 요청 없이 URL만 조립하므로 실패하지 않습니다.
pub fn chart_url(base_url: &str, ticker: &str, timeframe: ChartTimeframe, chart_type: ChartType) -> String {
    let (ty, ta) = match chart_type {
        ChartType::Advanced => ("c", 1),
        ChartType::Candle => ("c", 0),
        ChartType::Line => ("l", 0),
    };
    format!(
        "{}/chart.ashx?t={}&ty={}&ta={}&p={}",
        base_url.trim_end_matches('/'),
        query_value(ticker),
        ty,
        ta,
        timeframe.code()
    )
}

/// 종목 상세 페이지에서 추출한 데이터.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotePage {
    ticker: String,
    description: Option<String>,
    fundamentals: Option<BTreeMap<String, String>>,
    peers: Option<Vec<String>>,
    signals: Option<Vec<String>>,
    outer_ratings: Option<DataTable>,
    news: Option<Vec<NewsItem>>,
    insider_trades: Option<DataTable>,
}

impl QuotePage {
    /// 빈 페이지 (모든 섹션 누락)
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// HTML 문서를 파싱합니다. "Today"로 표시된 뉴스는 오늘 날짜로 처리합니다.
    pub fn parse(ticker: &str, html: &str) -> Result<Self> {
        Self::parse_with_today(ticker, html, Local::now().date_naive())
    }

    /// 기준일을 지정해 파싱합니다.
    pub fn parse_with_today(ticker: &str, html: &str, today: NaiveDate) -> Result<Self> {
        let document = Html::parse_document(html);

        let description = first_text(
            &document,
            &["td.fullview-profile", "div.quote_profile-bio", "div.fullview-profile"],
        )?;

        let links = QuoteLinks::extract(&document)?;

        let mut fundamentals = parse_snapshot(&document)?;
        if let Some(map) = fundamentals.as_mut() {
            if let Some(company) = first_text(
                &document,
                &[
                    "h2.quote-header_ticker-wrapper_company",
                    "table.fullview-title b",
                ],
            )? {
                map.insert("Company".to_string(), company);
            }
            for (key, value) in [
                ("Sector", &links.sector),
                ("Industry", &links.industry),
                ("Country", &links.country),
            ] {
                if let Some(value) = value {
                    map.insert(key.to_string(), value.clone());
                }
            }
        }

        let page = Self {
            ticker: ticker.to_string(),
            description,
            fundamentals,
            peers: links.peers,
            signals: (!links.signals.is_empty()).then_some(links.signals),
            outer_ratings: parse_outer_ratings(&document)?,
            news: parse_news(&document, today)?,
            insider_trades: find_table_with_header(&document, "Insider Trading")?,
        };

        tracing::debug!(
            ticker = %page.ticker,
            description = page.description.is_some(),
            fundamentals = page.fundamentals.as_ref().map(|f| f.len()).unwrap_or(0),
            news = page.news.as_ref().map(|n| n.len()).unwrap_or(0),
            "종목 페이지 파싱 완료"
        );

        Ok(page)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 회사 설명
    pub fn description(&self) -> Result<&str> {
        self.description.as_deref().ok_or_else(|| missing("description"))
    }

    /// 스냅샷 지표 (키 순 정렬)
    pub fn fundamentals(&self) -> Result<&BTreeMap<String, String>> {
        self.fundamentals.as_ref().ok_or_else(|| missing("fundamentals"))
    }

    /// 동종 종목 티커
    pub fn peers(&self) -> Result<&[String]> {
        self.peers.as_deref().ok_or_else(|| missing("peers"))
    }

    /// 기술적 시그널
    pub fn signals(&self) -> Result<&[String]> {
        self.signals.as_deref().ok_or_else(|| missing("signals"))
    }

    /// 애널리스트 의견 표
    pub fn outer_ratings(&self) -> Result<&DataTable> {
        self.outer_ratings.as_ref().ok_or_else(|| missing("outer ratings"))
    }

    /// 종목 뉴스
    pub fn news(&self) -> Result<&[NewsItem]> {
        self.news.as_deref().ok_or_else(|| missing("news"))
    }

    /// 내부자 거래 표
    pub fn insider_trades(&self) -> Result<&DataTable> {
        self.insider_trades.as_ref().ok_or_else(|| missing("insider trades"))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_fundamentals<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fundamentals = Some(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn with_peers<I, S>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.peers = Some(peers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_signals<I, S>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signals = Some(signals.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_outer_ratings(mut self, ratings: DataTable) -> Self {
        self.outer_ratings = Some(ratings);
        self
    }

    pub fn with_news(mut self, news: Vec<NewsItem>) -> Self {
        self.news = Some(news);
        self
    }

    pub fn with_insider_trades(mut self, trades: DataTable) -> Self {
        self.insider_trades = Some(trades);
        self
    }
}

fn missing(section: &str) -> FinvizError {
    FinvizError::MissingSection(section.to_string())
}

/// 헤더 영역 링크에서 뽑는 정보
#[derive(Default)]
struct QuoteLinks {
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
    peers: Option<Vec<String>>,
    signals: Vec<String>,
}

impl QuoteLinks {
    fn extract(document: &Html) -> Result<Self> {
        let anchors = selector("a[href]")?;
        let mut links = Self::default();

        for anchor in document.select(&anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains("screener.ashx") {
                continue;
            }
            let text = element_text(anchor);

            if let Some(filter) = query_param(href, "f") {
                let slot = if filter.starts_with("sec_") {
                    &mut links.sector
                } else if filter.starts_with("ind_") {
                    &mut links.industry
                } else if filter.starts_with("geo_") {
                    &mut links.country
                } else {
                    continue;
                };
                if slot.is_none() && !text.is_empty() {
                    *slot = Some(text);
                }
                continue;
            }

            if text == "Peers" && links.peers.is_none() {
                if let Some(tickers) = query_param(href, "t") {
                    links.peers = Some(
                        tickers
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                continue;
            }

            if query_param(href, "s").is_some_and(|s| !s.is_empty())
                && !text.is_empty()
                && !links.signals.contains(&text)
            {
                links.signals.push(text);
            }
        }

        Ok(links)
    }
}

/// 스냅샷 표를 (라벨, 값) 쌍으로 읽습니다.
fn parse_snapshot(document: &Html) -> Result<Option<BTreeMap<String, String>>> {
    let table_sel = selector("table.snapshot-table2")?;
    let Some(table) = document.select(&table_sel).next() else {
        return Ok(None);
    };

    let cells: Vec<String> = direct_rows(table)
        .into_iter()
        .flat_map(row_cells)
        .map(element_text)
        .collect();

    let mut map = BTreeMap::new();
    for pair in cells.chunks(2) {
        let [label, value] = pair else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        // "EPS next Y"는 추정치와 성장률 두 칸에 같은 라벨을 씀
        let key = if map.contains_key(label.as_str()) && label == "EPS next Y" {
            "EPS growth next Y".to_string()
        } else {
            label.clone()
        };
        map.entry(key).or_insert_with(|| value.clone());
    }

    Ok(Some(map))
}

/// 애널리스트 의견 표. 셀이 정확히 5개인 행만 읽습니다.
fn parse_outer_ratings(document: &Html) -> Result<Option<DataTable>> {
    let table_sel = selector("table.js-table-ratings, table.fullview-ratings-outer")?;
    let Some(table) = document.select(&table_sel).next() else {
        return Ok(None);
    };
    let tr = selector("tr")?;
    let td = selector("td")?;

    let mut out = DataTable::new(RATING_COLUMNS);
    for row in table.select(&tr) {
        let cells: Vec<String> = row.select(&td).map(element_text).collect();
        if cells.len() == RATING_COLUMNS.len() {
            out.push_row(cells);
        }
    }
    Ok(Some(out))
}

/// 뉴스 표. 시각만 있는 행은 직전 행의 날짜를 이어받습니다.
fn parse_news(document: &Html, today: NaiveDate) -> Result<Option<Vec<NewsItem>>> {
    let table_sel = selector("table#news-table")?;
    let Some(table) = document.select(&table_sel).next() else {
        return Ok(None);
    };
    let link_sel = selector("a.tab-link-news, a")?;
    let source_sel = selector("div.news-link-right span, span")?;

    let mut items = Vec::new();
    let mut last_date = None;

    for row in direct_rows(table) {
        let cells = row_cells(row);
        let Some(date_cell) = cells.first() else {
            continue;
        };
        let Some(anchor) = row.select(&link_sel).next() else {
            continue;
        };

        let date = resolve_news_date(&element_text(*date_cell), &mut last_date, today);
        let source = row
            .select(&source_sel)
            .map(element_text)
            .find(|t| !t.is_empty())
            .map(|t| t.trim_matches(|c| c == '(' || c == ')').trim().to_string())
            .unwrap_or_default();

        items.push(NewsItem {
            date,
            title: element_text(anchor),
            link: anchor.value().attr("href").unwrap_or_default().to_string(),
            source,
        });
    }

    Ok(Some(items))
}

/// 뉴스 날짜 셀을 `YYYY-MM-DD HH:MM`으로 정규화합니다.
///
/// - "Feb-17-26 08:00AM" -> 날짜 갱신
/// - "Today 08:00AM" -> 기준일
/// - "09:30AM" -> 직전 날짜 사용
pub(crate) fn resolve_news_date(raw: &str, last_date: &mut Option<NaiveDate>, today: NaiveDate) -> String {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let (date_part, time_part) = match parts.as_slice() {
        [date, time] => (Some(*date), *time),
        [time] => (None, *time),
        _ => return raw.trim().to_string(),
    };

    if let Some(date_text) = date_part {
        let parsed = if date_text.eq_ignore_ascii_case("Today") {
            Some(today)
        } else {
            NaiveDate::parse_from_str(date_text, "%b-%d-%y").ok()
        };
        match parsed {
            Some(date) => *last_date = Some(date),
            None => return raw.trim().to_string(),
        }
    }

    let time = NaiveTime::parse_from_str(&time_part.to_uppercase(), "%I:%M%p").ok();
    match (*last_date, time) {
        (Some(date), Some(time)) => date.and_time(time).format("%Y-%m-%d %H:%M").to_string(),
        _ => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/quote_nvda.html");

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    fn page() -> QuotePage {
        QuotePage::parse_with_today("NVDA", FIXTURE, today()).unwrap()
    }

    #[test]
    fn test_description() {
        let page = page();
        assert!(page.description().unwrap().starts_with("NVIDIA Corporation"));
    }

    #[test]
    fn test_fundamentals_pairs_and_header() {
        let page = page();
        let fund = page.fundamentals().unwrap();

        assert_eq!(fund.get("P/E").map(String::as_str), Some("52.31"));
        assert_eq!(fund.get("RSI (14)").map(String::as_str), Some("58.12"));
        assert_eq!(fund.get("EPS next Y").map(String::as_str), Some("4.52"));
        assert_eq!(fund.get("EPS growth next Y").map(String::as_str), Some("38.51%"));
        assert_eq!(fund.get("Company").map(String::as_str), Some("NVIDIA Corp"));
        assert_eq!(fund.get("Sector").map(String::as_str), Some("Technology"));
        assert_eq!(fund.get("Industry").map(String::as_str), Some("Semiconductors"));
        assert_eq!(fund.get("Country").map(String::as_str), Some("USA"));

        let keys: Vec<&String> = fund.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_peers_and_signals() {
        let page = page();
        assert_eq!(page.peers().unwrap(), ["AMD", "AVGO", "INTC", "QCOM"]);
        assert_eq!(page.signals().unwrap(), ["New High", "Channel Up"]);
    }

    #[test]
    fn test_outer_ratings() {
        let page = page();
        let ratings = page.outer_ratings().unwrap();
        assert_eq!(ratings.columns, RATING_COLUMNS);
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings.value(0, "Outer"), Some("Morgan Stanley"));
        assert_eq!(ratings.value(1, "Status"), Some("Reiterated"));
    }

    #[test]
    fn test_news_dates_carry_over() {
        let page = page();
        let news = page.news().unwrap();

        assert_eq!(news.len(), 3);
        assert_eq!(news[0].date, "2026-02-18 08:15");
        assert_eq!(news[0].source, "Reuters");
        assert_eq!(news[0].link, "https://example.com/a");
        assert_eq!(news[1].date, "2026-02-18 07:02");
        assert_eq!(news[2].date, "2026-02-17 16:45");
        assert_eq!(news[2].title, "Chip stocks rally into the close");
    }

    #[test]
    fn test_insider_trades() {
        let page = page();
        let insider = page.insider_trades().unwrap();
        assert_eq!(insider.columns.first().map(String::as_str), Some("Insider Trading"));
        assert_eq!(insider.len(), 1);
        assert_eq!(insider.value(0, "Transaction"), Some("Sale"));
    }

    #[test]
    fn test_missing_sections() {
        let page = QuotePage::parse_with_today("ZZZZ", "<html><body></body></html>", today()).unwrap();
        assert!(matches!(page.description(), Err(FinvizError::MissingSection(_))));
        assert!(page.fundamentals().is_err());
        assert!(page.peers().is_err());
        assert!(page.signals().is_err());
        assert!(page.news().is_err());
    }

    #[test]
    fn test_resolve_news_date() {
        let mut last = None;
        assert_eq!(
            resolve_news_date("Feb-17-26 08:00AM", &mut last, today()),
            "2026-02-17 08:00"
        );
        assert_eq!(resolve_news_date("09:30PM", &mut last, today()), "2026-02-17 21:30");
        assert_eq!(resolve_news_date("Today 10:01AM", &mut last, today()), "2026-02-18 10:01");

        let mut none = None;
        assert_eq!(resolve_news_date("09:30AM", &mut none, today()), "09:30AM");
    }

    #[test]
    fn test_chart_url() {
        assert_eq!(
            chart_url("https://finviz.com/", "AAPL", ChartTimeframe::Daily, ChartType::Advanced),
            "https://finviz.com/chart.ashx?t=AAPL&ty=c&ta=1&p=d"
        );
        assert_eq!(
            chart_url("https://finviz.com", "AAPL", ChartTimeframe::Weekly, ChartType::Line),
            "https://finviz.com/chart.ashx?t=AAPL&ty=l&ta=0&p=w"
        );
        assert_eq!(
            chart_url("https://finviz.com", "AA&p=m", ChartTimeframe::Daily, ChartType::Candle),
            "https://finviz.com/chart.ashx?t=AA%26p%3Dm&ty=c&ta=0&p=d"
        );
    }
}
