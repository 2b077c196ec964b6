//! finviz.com 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - finviz.com HTML 클라이언트 (`FinvizClient`)
//! - 종목/스크리너/그룹/뉴스/내부자/실적 페이지 파서
//! - 리포트 생성기가 사용하는 `MarketDataSource` 트레이트

pub mod error;
pub mod provider;
pub mod source;

pub use error::{FinvizError, Result};
pub use provider::{
    ChartTimeframe, ChartType, EarningsCalendar, EarningsPeriod, FinvizClient, FinvizConfig, Group,
    GroupOrder, InsiderOption, MarketNews, NewsItem, QuotePage, ScreenerQuery, ScreenerView,
};
pub use source::MarketDataSource;
