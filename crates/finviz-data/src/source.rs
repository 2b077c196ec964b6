//! 시장 데이터 소스 트레이트.
//!
//! 리포트 생성기는 구체 클라이언트 대신 이 트레이트에 의존합니다.
//! 테스트에서는 미리 준비한 응답을 돌려주는 구현으로 대체합니다.

use async_trait::async_trait;
use finviz_core::DataTable;

use crate::error::Result;
use crate::provider::{
    ChartTimeframe, ChartType, EarningsCalendar, EarningsPeriod, FinvizClient, Group, GroupOrder,
    InsiderOption, MarketNews, QuotePage, ScreenerQuery, ScreenerView,
};

/// 시장 데이터 소스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 소스 이름
    fn name(&self) -> &str;

    /// 종목 상세 페이지
    async fn quote(&self, ticker: &str) -> Result<QuotePage>;

    /// 차트 이미지 URL (요청 없음)
    fn chart_url(&self, ticker: &str, timeframe: ChartTimeframe, chart_type: ChartType) -> String;

    /// 스크리너 조회
    async fn screener(&self, query: &ScreenerQuery) -> Result<DataTable>;

    /// 그룹 개요
    async fn group_overview(&self, group: Group, order: GroupOrder) -> Result<DataTable>;

    /// 시장 뉴스
    async fn market_news(&self) -> Result<MarketNews>;

    /// 내부자 거래
    async fn insider(&self, option: InsiderOption) -> Result<DataTable>;

    /// 실적 발표 일정
    async fn earnings(&self, period: EarningsPeriod) -> Result<EarningsCalendar>;

    /// 발표일별 표를 `view` 화면의 열로 돌려줍니다.
    ///
    /// 재무 화면이 아니면 날짜마다 해당 종목을 다시 조회하며,
    /// 하나라도 실패하면 전체가 실패합니다.
    async fn earnings_days(&self, period: EarningsPeriod, view: ScreenerView) -> Result<Vec<(String, DataTable)>> {
        let calendar = self.earnings(period).await?;
        let Some(queries) = calendar.day_queries(view) else {
            return Ok(calendar.partition_days());
        };

        let mut days = Vec::with_capacity(queries.len());
        for (day, query) in queries {
            let table = self.screener(&query).await?;
            days.push((day, table));
        }
        tracing::debug!(period = %period, days = days.len(), "실적 일정 날짜별 조회 완료");
        Ok(days)
    }
}

#[async_trait]
impl MarketDataSource for FinvizClient {
    fn name(&self) -> &str {
        "finviz"
    }

    async fn quote(&self, ticker: &str) -> Result<QuotePage> {
        FinvizClient::quote(self, ticker).await
    }

    fn chart_url(&self, ticker: &str, timeframe: ChartTimeframe, chart_type: ChartType) -> String {
        FinvizClient::chart_url(self, ticker, timeframe, chart_type)
    }

    async fn screener(&self, query: &ScreenerQuery) -> Result<DataTable> {
        FinvizClient::screener(self, query).await
    }

    async fn group_overview(&self, group: Group, order: GroupOrder) -> Result<DataTable> {
        FinvizClient::group_overview(self, group, order).await
    }

    async fn market_news(&self) -> Result<MarketNews> {
        FinvizClient::market_news(self).await
    }

    async fn insider(&self, option: InsiderOption) -> Result<DataTable> {
        FinvizClient::insider(self, option).await
    }

    async fn earnings(&self, period: EarningsPeriod) -> Result<EarningsCalendar> {
        FinvizClient::earnings(self, period).await
    }
}
