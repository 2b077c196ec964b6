//! 시장 뉴스 (`news.ashx`) 파서.
//!
//! 페이지에는 뉴스 표와 블로그 표가 차례로 있습니다. 두 표 모두
//! `a.nn-tab-link` 링크를 가진 행으로 구성됩니다.

use chrono::{Local, NaiveDate};
use scraper::Html;

use super::html::{direct_rows, element_text, row_cells, selector};
use super::quote::{resolve_news_date, NewsItem};
use crate::error::Result;

/// 시장 뉴스 페이지 경로
pub const NEWS_PATH: &str = "news.ashx";

/// 시장 뉴스 + 블로그
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketNews {
    pub news: Vec<NewsItem>,
    pub blogs: Vec<NewsItem>,
}

/// 시장 뉴스 페이지를 파싱합니다.
pub fn parse_market_news(html: &str) -> Result<MarketNews> {
    parse_market_news_with_today(html, Local::now().date_naive())
}

/// 기준일을 지정해 파싱합니다. 시각만 있는 행은 기준일 뉴스입니다.
pub fn parse_market_news_with_today(html: &str, today: NaiveDate) -> Result<MarketNews> {
    let document = Html::parse_document(html);
    let tables = selector("table")?;
    let link_sel = selector("a.nn-tab-link")?;

    let mut sections: Vec<Vec<NewsItem>> = Vec::new();

    for table in document.select(&tables) {
        let mut items = Vec::new();
        let mut last_date = Some(today);

        for row in direct_rows(table) {
            // 레이아웃 행 (하위 table 포함)은 건너뜀
            if row.select(&tables).next().is_some() {
                continue;
            }
            let Some(anchor) = row.select(&link_sel).next() else {
                continue;
            };
            let date = row_cells(row)
                .first()
                .map(|cell| element_text(*cell))
                .unwrap_or_default();
            let link = anchor.value().attr("href").unwrap_or_default().to_string();

            items.push(NewsItem {
                date: resolve_news_date(&date, &mut last_date, today),
                title: element_text(anchor),
                source: link_domain(&link),
                link,
            });
        }

        if !items.is_empty() {
            sections.push(items);
        }
    }

    let mut sections = sections.into_iter();
    Ok(MarketNews {
        news: sections.next().unwrap_or_default(),
        blogs: sections.next().unwrap_or_default(),
    })
}

/// 링크의 호스트 (`www.` 제거)
pub(crate) fn link_domain(link: &str) -> String {
    let without_scheme = link.split_once("://").map(|(_, rest)| rest).unwrap_or(link);
    let host = without_scheme.split('/').next().unwrap_or_default();
    host.trim_start_matches("www.").to_string()
}
