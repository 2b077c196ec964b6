//! 스크리너 (`screener.ashx`) 조회 조건과 결과 파서.
//!
//! 필터 이름/값, 시그널, 정렬 기준은 사람이 읽는 이름으로 받아
//! finviz URL 코드로 변환합니다.
//!
//! ## 변환 규칙
//! - 필터: 카탈로그의 옵션 텍스트 또는 슬러그 (`"Basic Materials"` -> `sec_basicmaterials`)
//! - 이미 코드인 값 (`sec_technology`)은 그대로 사용
//! - 시그널: `Top Gainers` -> `ta_topgainers`
//! - 정렬: `Change` -> `change`, 내림차순은 `-change`

use finviz_core::DataTable;
use scraper::Html;

use super::html::find_table_with_header;
use super::query_value;
use crate::error::{FinvizError, Result};

/// 스크리너 한 페이지의 행 수
pub const PAGE_SIZE: usize = 20;

/// 한 번의 조회에서 가져올 최대 페이지 수 (limit 0 = 제한 없음일 때의 상한)
pub const MAX_PAGES: usize = 50;

/// 스크리너 화면 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenerView {
    /// 개요 (Ticker, Company, Sector, Industry, Country, Market Cap, P/E, Price, Change, Volume)
    #[default]
    Overview,
    /// 재무 (Market Cap, Dividend, ROA, ROE, ..., Earnings, Price, Change, Volume)
    Financial,
}

impl ScreenerView {
    pub fn code(self) -> &'static str {
        match self {
            Self::Overview => "111",
            Self::Financial => "161",
        }
    }
}

/// 필터 카탈로그 항목
struct FilterSpec {
    name: &'static str,
    prefix: &'static str,
    options: &'static [(&'static str, &'static str)],
    /// 카탈로그에 없는 값도 슬러그로 허용
    slug_fallback: bool,
}

const FILTERS: &[FilterSpec] = &[
    FilterSpec {
        name: "Exchange",
        prefix: "exch",
        options: &[("AMEX", "amex"), ("NASDAQ", "nasd"), ("NYSE", "nyse")],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Index",
        prefix: "idx",
        options: &[
            ("S&P 500", "sp500"),
            ("NASDAQ 100", "ndx"),
            ("DJIA", "dji"),
            ("RUSSELL 2000", "rut"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Sector",
        prefix: "sec",
        options: &[],
        slug_fallback: true,
    },
    FilterSpec {
        name: "Industry",
        prefix: "ind",
        options: &[("Stocks only (ex-Funds)", "stocksonly"), ("Exchange Traded Fund", "exchangetradedfund")],
        slug_fallback: true,
    },
    FilterSpec {
        name: "Country",
        prefix: "geo",
        options: &[("USA", "usa"), ("Foreign (ex-USA)", "notusa")],
        slug_fallback: true,
    },
    FilterSpec {
        name: "Market Cap.",
        prefix: "cap",
        options: &[
            ("Mega ($200bln and more)", "mega"),
            ("Large ($10bln to $200bln)", "large"),
            ("Mid ($2bln to $10bln)", "mid"),
            ("Small ($300mln to $2bln)", "small"),
            ("Micro ($50mln to $300mln)", "micro"),
            ("Nano (under $50mln)", "nano"),
            ("+Large (over $10bln)", "largeover"),
            ("+Mid (over $2bln)", "midover"),
            ("+Small (over $300mln)", "smallover"),
            ("+Micro (over $50mln)", "microover"),
            ("-Large (under $200bln)", "largeunder"),
            ("-Mid (under $10bln)", "midunder"),
            ("-Small (under $2bln)", "smallunder"),
            ("-Micro (under $300mln)", "microunder"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Earnings Date",
        prefix: "earningsdate",
        options: &[
            ("Today", "today"),
            ("Today Before Market Open", "todaybefore"),
            ("Today After Market Close", "todayafter"),
            ("Tomorrow", "tomorrow"),
            ("Yesterday", "yesterday"),
            ("Next 5 Days", "nextdays5"),
            ("Previous 5 Days", "prevdays5"),
            ("This Week", "thisweek"),
            ("Next Week", "nextweek"),
            ("Previous Week", "prevweek"),
            ("This Month", "thismonth"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "P/E",
        prefix: "fa_pe",
        options: &[
            ("Low (<15)", "low"),
            ("Profitable (>0)", "profitable"),
            ("High (>50)", "high"),
            ("Under 10", "u10"),
            ("Under 15", "u15"),
            ("Under 20", "u20"),
            ("Under 30", "u30"),
            ("Over 20", "o20"),
            ("Over 30", "o30"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Dividend Yield",
        prefix: "fa_div",
        options: &[
            ("None (0%)", "none"),
            ("Positive (>0%)", "pos"),
            ("High (>5%)", "high"),
            ("Very High (>10%)", "veryhigh"),
            ("Over 1%", "o1"),
            ("Over 2%", "o2"),
            ("Over 3%", "o3"),
            ("Over 5%", "o5"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Analyst Recom.",
        prefix: "an_recom",
        options: &[
            ("Strong Buy (1)", "strongbuy"),
            ("Buy or better", "buybetter"),
            ("Buy", "buy"),
            ("Hold or better", "holdbetter"),
            ("Hold", "hold"),
            ("Hold or worse", "holdworse"),
            ("Sell", "sell"),
            ("Sell or worse", "sellworse"),
            ("Strong Sell (5)", "strongsell"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Average Volume",
        prefix: "sh_avgvol",
        options: &[
            ("Under 100K", "u100"),
            ("Under 500K", "u500"),
            ("Over 100K", "o100"),
            ("Over 200K", "o200"),
            ("Over 500K", "o500"),
            ("Over 1M", "o1000"),
            ("Over 2M", "o2000"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Relative Volume",
        prefix: "sh_relvol",
        options: &[("Over 1", "o1"), ("Over 1.5", "o1.5"), ("Over 2", "o2"), ("Over 3", "o3")],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Price",
        prefix: "sh_price",
        options: &[
            ("Under $5", "u5"),
            ("Under $10", "u10"),
            ("Under $20", "u20"),
            ("Over $5", "o5"),
            ("Over $10", "o10"),
            ("Over $20", "o20"),
            ("Over $50", "o50"),
            ("Over $100", "o100"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "RSI (14)",
        prefix: "ta_rsi",
        options: &[
            ("Overbought (70)", "ob70"),
            ("Overbought (60)", "ob60"),
            ("Oversold (30)", "os30"),
            ("Oversold (40)", "os40"),
            ("Not Overbought (<60)", "nob60"),
            ("Not Oversold (>40)", "nos40"),
        ],
        slug_fallback: false,
    },
    FilterSpec {
        name: "Option/Short",
        prefix: "sh_opt",
        options: &[
            ("Optionable", "option"),
            ("Shortable", "short"),
            ("Optionable and shortable", "optionshort"),
        ],
        slug_fallback: false,
    },
];

const SIGNALS: &[(&str, &str)] = &[
    ("Top Gainers", "ta_topgainers"),
    ("Top Losers", "ta_toplosers"),
    ("New High", "ta_newhigh"),
    ("New Low", "ta_newlow"),
    ("Most Volatile", "ta_mostvolatile"),
    ("Most Active", "ta_mostactive"),
    ("Unusual Volume", "ta_unusualvolume"),
    ("Overbought", "ta_overbought"),
    ("Oversold", "ta_oversold"),
    ("Downgrades", "n_downgrades"),
    ("Upgrades", "n_upgrades"),
    ("Earnings Before", "n_earningsbefore"),
    ("Earnings After", "n_earningsafter"),
    ("Recent Insider Buying", "it_latestbuys"),
    ("Recent Insider Selling", "it_latestsales"),
    ("Major News", "n_majornews"),
    ("Horizontal S/R", "ta_p_horizontal"),
    ("TL Resistance", "ta_p_tlresistance"),
    ("TL Support", "ta_p_tlsupport"),
    ("Wedge Up", "ta_p_wedgeup"),
    ("Wedge Down", "ta_p_wedgedown"),
    ("Triangle Ascending", "ta_p_wedgeresistance"),
    ("Triangle Descending", "ta_p_wedgesupport"),
    ("Wedge", "ta_p_wedge"),
    ("Channel Up", "ta_p_channelup"),
    ("Channel Down", "ta_p_channeldown"),
    ("Channel", "ta_p_channel"),
    ("Double Top", "ta_p_doubletop"),
    ("Double Bottom", "ta_p_doublebottom"),
    ("Multiple Top", "ta_p_multipletop"),
    ("Multiple Bottom", "ta_p_multiplebottom"),
    ("Head & Shoulders", "ta_p_headandshoulders"),
    ("Head & Shoulders Inverse", "ta_p_headandshouldersinv"),
];

const ORDERS: &[(&str, &str)] = &[
    ("Ticker", "ticker"),
    ("Company", "company"),
    ("Sector", "sector"),
    ("Industry", "industry"),
    ("Country", "country"),
    ("Market Cap.", "marketcap"),
    ("Market Cap", "marketcap"),
    ("Price/Earnings", "pe"),
    ("P/E", "pe"),
    ("Dividend Yield", "dividendyield"),
    ("Return on Equity", "roe"),
    ("Earnings Date", "earningsdate"),
    ("Relative Volume", "relativevolume"),
    ("Average Volume", "averagevolume"),
    ("Volume", "volume"),
    ("Price", "price"),
    ("Change", "change"),
    ("Performance (Week)", "perf1w"),
    ("Performance (Month)", "perf4w"),
    ("Performance (Year)", "perf52w"),
    ("Analyst Recom.", "recom"),
];

/// 문자열을 finviz 슬러그로 변환 (소문자 영숫자만)
///
/// "Basic Materials" -> "basicmaterials", "Software - Infrastructure" -> "softwareinfrastructure"
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// 필터 이름/값을 URL 코드로 변환합니다.
pub fn filter_code(name: &str, value: &str) -> Result<String> {
    let invalid = || FinvizError::InvalidFilter {
        name: name.to_string(),
        value: value.to_string(),
    };

    let spec = FILTERS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name.trim()) || f.name.trim_end_matches('.').eq_ignore_ascii_case(name.trim()))
        .ok_or_else(invalid)?;

    let value = value.trim();
    if value.is_empty() {
        return Err(invalid());
    }

    // 이미 코드 형태
    if let Some(rest) = value.strip_prefix(spec.prefix).and_then(|r| r.strip_prefix('_')) {
        if !rest.is_empty() {
            return Ok(value.to_string());
        }
    }

    let matched = spec.options.iter().find(|(text, _)| {
        text.eq_ignore_ascii_case(value)
            || text
                .split(" (")
                .next()
                .is_some_and(|short| short.eq_ignore_ascii_case(value))
    });
    if let Some((_, code)) = matched {
        return Ok(format!("{}_{}", spec.prefix, code));
    }

    if spec.slug_fallback {
        let slug = slugify(value);
        if !slug.is_empty() {
            return Ok(format!("{}_{}", spec.prefix, slug));
        }
    }

    Err(invalid())
}

/// 시그널 이름을 코드로 변환합니다. 빈 문자열은 시그널 없음.
pub fn signal_code(signal: &str) -> Result<Option<String>> {
    let signal = signal.trim();
    if signal.is_empty() {
        return Ok(None);
    }
    if let Some((_, code)) = SIGNALS.iter().find(|(name, _)| name.eq_ignore_ascii_case(signal)) {
        return Ok(Some((*code).to_string()));
    }
    if SIGNALS.iter().any(|(_, code)| *code == signal) {
        return Ok(Some(signal.to_string()));
    }
    Err(FinvizError::InvalidSignal(signal.to_string()))
}

/// 정렬 기준을 코드로 변환합니다.
pub fn order_code(order: &str, ascending: bool) -> Result<String> {
    let order = order.trim();
    let code = ORDERS
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(order) || *code == order)
        .map(|(_, code)| *code)
        .ok_or_else(|| FinvizError::InvalidOrder(order.to_string()))?;
    Ok(if ascending {
        code.to_string()
    } else {
        format!("-{code}")
    })
}

/// 스크리너 조회 조건.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenerQuery {
    /// (필터 이름, 값) - 입력 순서 유지
    pub filters: Vec<(String, String)>,
    pub signal: String,
    /// 종목 코드 목록 (`t=`). 비어 있으면 조건에 맞는 전체 종목
    pub tickers: Vec<String>,
    pub order: String,
    pub ascending: bool,
    /// 최대 행 수 (0 = 제한 없음)
    pub limit: usize,
    pub view: ScreenerView,
}

impl Default for ScreenerQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            signal: String::new(),
            tickers: Vec::new(),
            order: "Ticker".to_string(),
            ascending: true,
            limit: 0,
            view: ScreenerView::Overview,
        }
    }
}

impl ScreenerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    pub fn signal(mut self, signal: impl Into<String>) -> Self {
        self.signal = signal.into();
        self
    }

    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, order: impl Into<String>, ascending: bool) -> Self {
        self.order = order.into();
        self.ascending = ascending;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn view(mut self, view: ScreenerView) -> Self {
        self.view = view;
        self
    }

    /// 첫 페이지의 쿼리 문자열 (`v=111&s=...&f=...&t=...&o=...`).
    ///
    /// 잘못된 필터/시그널/정렬은 요청 전에 오류로 반환합니다.
    pub fn to_query_string(&self) -> Result<String> {
        let mut parts = vec![format!("v={}", self.view.code())];

        if let Some(signal) = signal_code(&self.signal)? {
            parts.push(format!("s={signal}"));
        }

        let codes = self
            .filters
            .iter()
            .map(|(name, value)| filter_code(name, value))
            .collect::<Result<Vec<_>>>()?;
        if !codes.is_empty() {
            parts.push(format!("f={}", codes.join(",")));
        }

        if !self.tickers.is_empty() {
            let tickers: Vec<String> = self.tickers.iter().map(|t| query_value(t)).collect();
            parts.push(format!("t={}", tickers.join(",")));
        }

        parts.push(format!("o={}", order_code(&self.order, self.ascending)?));
        Ok(parts.join("&"))
    }

    /// 가져올 페이지 수 상한
    pub fn max_pages(&self) -> usize {
        if self.limit == 0 {
            MAX_PAGES
        } else {
            self.limit.div_ceil(PAGE_SIZE).min(MAX_PAGES)
        }
    }
}

/// `r`번째 행부터 시작하는 페이지의 경로 (`r` = 1, 21, 41, ...)
pub fn page_path(query_string: &str, page: usize) -> String {
    let start = page * PAGE_SIZE + 1;
    if start == 1 {
        format!("screener.ashx?{query_string}")
    } else {
        format!("screener.ashx?{query_string}&r={start}")
    }
}

/// 스크리너 결과 페이지를 표로 읽습니다 ("No." 열 제거).
///
/// 결과가 없는 페이지는 빈 표를 반환합니다.
pub fn parse_screener_page(html: &str) -> Result<DataTable> {
    let document = Html::parse_document(html);
    let mut table = find_table_with_header(&document, "Ticker")?.unwrap_or_default();
    table.drop_column("No.");
    Ok(table)
}
