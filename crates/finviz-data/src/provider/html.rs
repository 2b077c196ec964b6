//! finviz HTML 공통 파싱 헬퍼.
//!
//! finviz 페이지는 레이아웃용 table을 겹겹이 중첩합니다. 하위 table의 행이
//! 섞이지 않도록 행과 셀은 항상 직계 자식만 읽습니다.

use finviz_core::DataTable;
use scraper::{ElementRef, Html, Selector};

use crate::error::{FinvizError, Result};

/// CSS 셀렉터 파싱
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FinvizError::Parse(format!("selector `{css}`: {e:?}")))
}

/// 요소의 텍스트 (공백 정규화)
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 셀렉터 후보 중 처음으로 비어 있지 않은 텍스트
pub(crate) fn first_text(document: &Html, candidates: &[&str]) -> Result<Option<String>> {
    for css in candidates {
        let sel = selector(css)?;
        if let Some(text) = document
            .select(&sel)
            .map(element_text)
            .find(|t| !t.is_empty())
        {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// table의 직계 행 (thead/tbody/tfoot 아래 포함)
pub(crate) fn direct_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// 행의 직계 셀 (td/th)
pub(crate) fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

/// 헤더 행에 `header` 셀이 있는 첫 table을 DataTable로 읽습니다.
///
/// 헤더 행 이후 셀 수가 헤더와 같은 행만 데이터로 취급합니다.
pub(crate) fn find_table_with_header(document: &Html, header: &str) -> Result<Option<DataTable>> {
    let tables = selector("table")?;

    for table in document.select(&tables) {
        let rows = direct_rows(table);
        let header_pos = rows.iter().position(|row| {
            row_cells(*row)
                .into_iter()
                .any(|cell| element_text(cell) == header)
        });
        let Some(pos) = header_pos else {
            continue;
        };

        let columns: Vec<String> = row_cells(rows[pos]).into_iter().map(element_text).collect();
        let mut out = DataTable::new(columns);
        for row in &rows[pos + 1..] {
            let cells = row_cells(*row);
            if cells.len() != out.columns.len() {
                continue;
            }
            out.push_row(cells.into_iter().map(element_text));
        }
        return Ok(Some(out));
    }

    Ok(None)
}

/// href의 쿼리 파라미터 값 (`screener.ashx?t=A,B&x=1`, "t" -> "A,B")
pub(crate) fn query_param<'a>(href: &'a str, key: &str) -> Option<&'a str> {
    let query = href.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim_start_matches("amp;") == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
        <table id="layout">
          <tr><td>
            <table id="inner">
              <tr><th>No.</th><th>Ticker</th><th>Price</th></tr>
              <tr><td>1</td><td><a href="quote.ashx?t=AAPL">AAPL</a></td><td>231.50</td></tr>
              <tr><td>2</td><td>MSFT</td><td>415.20</td></tr>
              <tr><td colspan="3">footer</td></tr>
            </table>
          </td></tr>
        </table>
    "#;

    #[test]
    fn test_find_table_with_header_skips_layout_table() {
        let document = Html::parse_document(NESTED);
        let table = find_table_with_header(&document, "Ticker")
            .unwrap()
            .expect("table");

        assert_eq!(table.columns, vec!["No.", "Ticker", "Price"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "Ticker"), Some("AAPL"));
        assert_eq!(table.value(1, "Price"), Some("415.20"));
    }

    #[test]
    fn test_find_table_missing_header() {
        let document = Html::parse_document(NESTED);
        assert!(find_table_with_header(&document, "Owner").unwrap().is_none());
    }

    #[test]
    fn test_query_param() {
        assert_eq!(
            query_param("screener.ashx?t=MSFT,GOOGL,META", "t"),
            Some("MSFT,GOOGL,META")
        );
        assert_eq!(
            query_param("screener.ashx?v=111&s=ta_newhigh", "s"),
            Some("ta_newhigh")
        );
        assert_eq!(query_param("screener.ashx?v=111&amp;s=ta_p_wedge", "s"), Some("ta_p_wedge"));
        assert_eq!(query_param("screener.ashx", "s"), None);
    }

    #[test]
    fn test_element_text_normalizes_whitespace() {
        let document = Html::parse_fragment("<p>  Apple\n   <b>Inc.</b> </p>");
        let sel = selector("p").unwrap();
        let p = document.select(&sel).next().unwrap();
        assert_eq!(element_text(p), "Apple Inc.");
    }
}
