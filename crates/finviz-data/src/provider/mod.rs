//! finviz.com 페이지 Provider 모듈.
//!
//! ## 클라이언트
//! - `FinvizClient`: HTTP 요청 + 페이지별 파서 연결
//!
//! ## 페이지 파서
//! - `quote`: 종목 상세 (설명, 지표, 동종 종목, 시그널, 의견, 뉴스, 내부자)
//! - `screener`: 스크리너 조건 변환 + 결과 표
//! - `group`: 섹터/산업/국가 성과 표
//! - `news`: 시장 뉴스/블로그
//! - `insider`: 내부자 거래 프리셋
//! - `earnings`: 실적 발표 일정 + 날짜별 분할

pub mod client;
pub mod earnings;
pub mod group;
mod html;
pub mod insider;
pub mod news;
pub mod quote;
pub mod screener;

/// 쿼리 문자열 값 인코딩 (`BRK B` -> `BRK+B`, `&` -> `%26`)
pub(crate) fn query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

pub use client::{FinvizClient, FinvizConfig, DEFAULT_BASE_URL};
pub use earnings::{EarningsCalendar, EarningsPeriod, EARNINGS_COLUMN};
pub use group::{Group, GroupOrder};
pub use insider::InsiderOption;
pub use news::MarketNews;
pub use quote::{chart_url, ChartTimeframe, ChartType, NewsItem, QuotePage, RATING_COLUMNS};
pub use screener::{filter_code, order_code, signal_code, slugify, ScreenerQuery, ScreenerView};
