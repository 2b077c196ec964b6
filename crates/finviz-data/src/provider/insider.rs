//! 내부자 거래 (`insidertrading.ashx`) 프리셋과 파서.

use std::fmt;
use std::str::FromStr;

use finviz_core::DataTable;
use scraper::Html;

use super::html::find_table_with_header;
use crate::error::{FinvizError, Result};

/// 내부자 거래 조회 프리셋
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsiderOption {
    #[default]
    Latest,
    LatestBuys,
    LatestSales,
    TopWeek,
    TopWeekBuys,
    TopWeekSales,
    TopOwnerTrade,
    TopOwnerBuys,
    TopOwnerSales,
}

impl InsiderOption {
    pub const ALL: [InsiderOption; 9] = [
        Self::Latest,
        Self::LatestBuys,
        Self::LatestSales,
        Self::TopWeek,
        Self::TopWeekBuys,
        Self::TopWeekSales,
        Self::TopOwnerTrade,
        Self::TopOwnerBuys,
        Self::TopOwnerSales,
    ];

    /// 프리셋 이름 (`"top week buys"`)
    pub fn name(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::LatestBuys => "latest buys",
            Self::LatestSales => "latest sales",
            Self::TopWeek => "top week",
            Self::TopWeekBuys => "top week buys",
            Self::TopWeekSales => "top week sales",
            Self::TopOwnerTrade => "top owner trade",
            Self::TopOwnerBuys => "top owner buys",
            Self::TopOwnerSales => "top owner sales",
        }
    }

    /// 쿼리 문자열 (`?` 포함, Latest는 빈 문자열)
    fn query(self) -> &'static str {
        match self {
            Self::Latest => "",
            Self::LatestBuys => "?tc=1",
            Self::LatestSales => "?tc=2",
            Self::TopWeek => "?or=-10&tv=100000&tc=7&o=-transactionValue",
            Self::TopWeekBuys => "?or=-10&tv=100000&tc=1&o=-transactionValue",
            Self::TopWeekSales => "?or=-10&tv=100000&tc=2&o=-transactionValue",
            Self::TopOwnerTrade => "?or=10&tv=1000000&tc=7&o=-transactionValue",
            Self::TopOwnerBuys => "?or=10&tv=1000000&tc=1&o=-transactionValue",
            Self::TopOwnerSales => "?or=10&tv=1000000&tc=2&o=-transactionValue",
        }
    }

    /// 페이지 경로
    pub fn path(self) -> String {
        format!("insidertrading.ashx{}", self.query())
    }
}

impl fmt::Display for InsiderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InsiderOption {
    type Err = FinvizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.name() == wanted)
            .ok_or_else(|| FinvizError::InvalidOption(format!("insider: {s}")))
    }
}

/// 내부자 거래 표를 읽습니다.
pub fn parse_insider_page(html: &str) -> Result<DataTable> {
    let document = Html::parse_document(html);
    find_table_with_header(&document, "Owner")?
        .ok_or_else(|| FinvizError::MissingSection("insider table".to_string()))
}
