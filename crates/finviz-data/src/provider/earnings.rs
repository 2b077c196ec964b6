//! 실적 발표 일정.
//!
//! 스크리너 재무 화면을 `Earnings Date` 필터로 조회한 뒤
//! `Earnings` 열(`Feb 17/b`)의 날짜 부분으로 행을 나눕니다.
//! 다른 화면의 열이 필요하면 날짜별 종목을 그 화면으로 다시 조회합니다
//! ([`EarningsCalendar::day_queries`]).

use std::fmt;
use std::str::FromStr;

use finviz_core::DataTable;

use super::screener::{ScreenerQuery, ScreenerView};
use crate::error::{FinvizError, Result};

/// 실적 발표일 열 이름
pub const EARNINGS_COLUMN: &str = "Earnings";

/// 실적 발표 조회 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarningsPeriod {
    Today,
    Tomorrow,
    Yesterday,
    NextFiveDays,
    PreviousFiveDays,
    #[default]
    ThisWeek,
    NextWeek,
    PreviousWeek,
    ThisMonth,
}

impl EarningsPeriod {
    pub const ALL: [EarningsPeriod; 9] = [
        Self::Today,
        Self::Tomorrow,
        Self::Yesterday,
        Self::NextFiveDays,
        Self::PreviousFiveDays,
        Self::ThisWeek,
        Self::NextWeek,
        Self::PreviousWeek,
        Self::ThisMonth,
    ];

    /// `Earnings Date` 필터의 옵션 텍스트
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Yesterday => "Yesterday",
            Self::NextFiveDays => "Next 5 Days",
            Self::PreviousFiveDays => "Previous 5 Days",
            Self::ThisWeek => "This Week",
            Self::NextWeek => "Next Week",
            Self::PreviousWeek => "Previous Week",
            Self::ThisMonth => "This Month",
        }
    }

    /// 기간에 해당하는 스크리너 조회 조건 (발표일 오름차순, 전체 행, 재무 화면)
    pub fn screener_query(self) -> ScreenerQuery {
        ScreenerQuery::new()
            .filter("Earnings Date", self.label())
            .order_by("Earnings Date", true)
            .view(ScreenerView::Financial)
    }
}

impl fmt::Display for EarningsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EarningsPeriod {
    type Err = FinvizError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FinvizError::InvalidOption(format!("earnings period: {s}")))
    }
}

/// 기간 내 실적 발표 종목 표
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EarningsCalendar {
    pub period: EarningsPeriod,
    pub table: DataTable,
}

impl EarningsCalendar {
    pub fn new(period: EarningsPeriod, table: DataTable) -> Self {
        Self { period, table }
    }

    /// 발표일별로 행을 나눕니다 (표에 나온 순서 유지).
    ///
    /// `Earnings` 열이 없으면 빈 목록입니다.
    pub fn partition_days(&self) -> Vec<(String, DataTable)> {
        let Some(idx) = self.table.column_index(EARNINGS_COLUMN) else {
            return Vec::new();
        };

        let mut days: Vec<(String, DataTable)> = Vec::new();
        for row in &self.table.rows {
            let day = row.get(idx).map(|v| day_label(v)).unwrap_or_default();
            if day.is_empty() || day == "-" {
                continue;
            }
            match days.iter_mut().find(|(label, _)| *label == day) {
                Some((_, table)) => table.push_row(row.iter().cloned()),
                None => {
                    let mut table = DataTable::new(self.table.columns.iter().cloned());
                    table.push_row(row.iter().cloned());
                    days.push((day, table));
                }
            }
        }
        days
    }

    /// 날짜별 종목을 `view` 화면으로 다시 조회할 조건 (날짜 순서 유지).
    ///
    /// 재무 화면이면 `None`: [`partition_days`](Self::partition_days) 결과를 그대로 쓰면 됩니다.
    pub fn day_queries(&self, view: ScreenerView) -> Option<Vec<(String, ScreenerQuery)>> {
        if view == ScreenerView::Financial {
            return None;
        }
        let queries = self
            .partition_days()
            .into_iter()
            .map(|(day, table)| {
                let tickers: Vec<String> = (0..table.len())
                    .filter_map(|row| table.value(row, "Ticker"))
                    .map(str::to_string)
                    .collect();
                (day, ScreenerQuery::new().tickers(tickers).view(view))
            })
            .collect();
        Some(queries)
    }
}

/// "Feb 17/b" -> "Feb 17"
fn day_label(value: &str) -> String {
    value.split('/').next().unwrap_or_default().trim().to_string()
}
