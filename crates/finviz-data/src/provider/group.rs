//! 그룹 개요 (`groups.ashx`) - 섹터/산업/국가별 성과 표.

use std::fmt;
use std::str::FromStr;

use finviz_core::DataTable;
use scraper::Html;

use super::html::find_table_with_header;
use crate::error::{FinvizError, Result};

/// 그룹 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Group {
    #[default]
    Sector,
    Industry,
    Country,
    Capitalization,
}

impl Group {
    pub fn code(self) -> &'static str {
        match self {
            Self::Sector => "sector",
            Self::Industry => "industry",
            Self::Country => "country",
            Self::Capitalization => "capitalization",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sector => "Sector",
            Self::Industry => "Industry",
            Self::Country => "Country",
            Self::Capitalization => "Capitalization",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Group {
    type Err = FinvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sector" => Ok(Self::Sector),
            "industry" => Ok(Self::Industry),
            "country" => Ok(Self::Country),
            "capitalization" | "market cap" => Ok(Self::Capitalization),
            _ => Err(FinvizError::InvalidOption(format!("group: {s}"))),
        }
    }
}

/// 그룹 표 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    Name,
    MarketCap,
    PriceEarnings,
    RelativeVolume,
    /// 등락률 내림차순
    #[default]
    Change,
    Volume,
}

impl GroupOrder {
    pub fn code(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::MarketCap => "-marketcap",
            Self::PriceEarnings => "pe",
            Self::RelativeVolume => "-relativevolume",
            Self::Change => "-change",
            Self::Volume => "-volume",
        }
    }
}

impl FromStr for GroupOrder {
    type Err = FinvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "market cap" | "market capitalization" => Ok(Self::MarketCap),
            "p/e" | "price/earnings" => Ok(Self::PriceEarnings),
            "relative volume" => Ok(Self::RelativeVolume),
            "change" => Ok(Self::Change),
            "volume" => Ok(Self::Volume),
            _ => Err(FinvizError::InvalidOrder(s.to_string())),
        }
    }
}

/// 그룹 개요 페이지 경로
pub fn group_path(group: Group, order: GroupOrder) -> String {
    format!("groups.ashx?g={}&v=110&o={}", group.code(), order.code())
}

/// 그룹 개요 표를 읽습니다 ("No." 열 제거).
pub fn parse_group_page(html: &str) -> Result<DataTable> {
    let document = Html::parse_document(html);
    let mut table = find_table_with_header(&document, "Name")?
        .ok_or_else(|| FinvizError::MissingSection("group table".to_string()))?;
    table.drop_column("No.");
    Ok(table)
}
