//! finviz.com HTTP 클라이언트.
//!
//! HTML 페이지를 순차적으로 요청하고 각 파서로 넘깁니다.
//! 재시도와 캐시는 하지 않으며, 여러 페이지를 읽을 때만 요청 사이에
//! 딜레이를 둡니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = FinvizClient::from_env()?;
//! let page = client.quote("NVDA").await?;
//! println!("P/E: {:?}", page.fundamentals()?.get("P/E"));
//! ```

use std::time::Duration;

use finviz_core::{env_var_opt, env_var_parse, DataTable};
use reqwest::{Client, StatusCode};

use super::earnings::{EarningsCalendar, EarningsPeriod};
use super::group::{group_path, parse_group_page, Group, GroupOrder};
use super::insider::{parse_insider_page, InsiderOption};
use super::news::{parse_market_news, MarketNews, NEWS_PATH};
use super::quote::{chart_url, ChartTimeframe, ChartType, QuotePage};
use super::query_value;
use super::screener::{page_path, parse_screener_page, ScreenerQuery, PAGE_SIZE};
use crate::error::{FinvizError, Result};

/// 기본 접속 주소
pub const DEFAULT_BASE_URL: &str = "https://finviz.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 클라이언트 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinvizConfig {
    /// 접속 주소 (테스트/미러용으로 변경 가능)
    pub base_url: String,
    /// 다중 페이지 요청 사이 딜레이 (기본: 300ms)
    pub request_delay: Duration,
    /// 요청 타임아웃 (기본: 30초)
    pub timeout: Duration,
}

impl Default for FinvizConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(300),
            timeout: Duration::from_secs(30),
        }
    }
}

impl FinvizConfig {
    /// 환경변수에서 설정 로드
    ///
    /// - `FINVIZ_BASE_URL`
    /// - `FINVIZ_REQUEST_DELAY_MS`
    /// - `FINVIZ_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self {
            base_url: env_var_opt("FINVIZ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_delay: Duration::from_millis(env_var_parse("FINVIZ_REQUEST_DELAY_MS", 300u64)),
            timeout: Duration::from_secs(env_var_parse("FINVIZ_TIMEOUT_SECS", 30u64)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }
}

/// finviz 페이지 클라이언트.
pub struct FinvizClient {
    client: Client,
    config: FinvizConfig,
}

impl FinvizClient {
    /// 설정으로 생성
    pub fn new(config: FinvizConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// 환경변수 설정으로 생성
    pub fn from_env() -> Result<Self> {
        Self::new(FinvizConfig::from_env())
    }

    pub fn config(&self) -> &FinvizConfig {
        &self.config
    }

    /// 페이지 HTML 요청
    async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        tracing::debug!(url = %url, "finviz 페이지 요청");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url = %url, "finviz 요청 한도 초과");
            return Err(FinvizError::RateLimited);
        }
        if !status.is_success() {
            return Err(FinvizError::Http {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }

    /// 종목 상세 페이지
    pub async fn quote(&self, ticker: &str) -> Result<QuotePage> {
        let html = self
            .fetch_page(&format!("quote.ashx?t={}&p=d", query_value(ticker)))
            .await?;
        QuotePage::parse(ticker, &html)
    }

    /// 차트 이미지 URL
    pub fn chart_url(&self, ticker: &str, timeframe: ChartTimeframe, chart_type: ChartType) -> String {
        chart_url(&self.config.base_url, ticker, timeframe, chart_type)
    }

    /// 스크리너 조회 (20행 단위 페이지를 `limit`까지)
    pub async fn screener(&self, query: &ScreenerQuery) -> Result<DataTable> {
        let query_string = query.to_query_string()?;
        let mut result = DataTable::default();

        for page in 0..query.max_pages() {
            if page > 0 {
                tokio::time::sleep(self.config.request_delay).await;
            }

            let html = self.fetch_page(&page_path(&query_string, page)).await?;
            let table = parse_screener_page(&html)?;
            let count = table.len();
            if count == 0 {
                break;
            }
            // 범위를 넘긴 r 값에는 마지막 페이지가 다시 옴
            if table.rows.first().is_some_and(|first| result.rows.contains(first)) {
                break;
            }

            result.extend(table);

            if count < PAGE_SIZE || (query.limit > 0 && result.len() >= query.limit) {
                break;
            }
        }

        if query.limit > 0 {
            result.rows.truncate(query.limit);
        }

        tracing::info!(query = %query_string, rows = result.len(), "스크리너 조회 완료");
        Ok(result)
    }

    /// 그룹 개요 (섹터/산업/국가)
    pub async fn group_overview(&self, group: Group, order: GroupOrder) -> Result<DataTable> {
        let html = self.fetch_page(&group_path(group, order)).await?;
        parse_group_page(&html)
    }

    /// 시장 뉴스
    pub async fn market_news(&self) -> Result<MarketNews> {
        let html = self.fetch_page(NEWS_PATH).await?;
        parse_market_news(&html)
    }

    /// 내부자 거래
    pub async fn insider(&self, option: InsiderOption) -> Result<DataTable> {
        let html = self.fetch_page(&option.path()).await?;
        parse_insider_page(&html)
    }

    /// 기간 내 실적 발표 일정
    pub async fn earnings(&self, period: EarningsPeriod) -> Result<EarningsCalendar> {
        let table = self.screener(&period.screener_query()).await?;
        Ok(EarningsCalendar::new(period, table))
    }
}
