//! 스크리너 리포트 (`# 股票篩選結果`).

use finviz_data::{MarketDataSource, ScreenerQuery};
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};
use crate::markdown::{MarkdownDoc, ReportContext};

/// 필터 JSON 객체 (입력 순서 유지)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenerFilters {
    entries: Vec<(String, Value)>,
}

impl ScreenerFilters {
    /// `{"Sector": "Technology", ...}` 형태의 JSON을 읽습니다.
    ///
    /// 값은 문자열/숫자/불리언만 허용합니다.
    pub fn parse(json: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => entries.push((name, value)),
                other => {
                    return Err(ReportError::InvalidFilters(format!(
                        "filter `{name}` must be a scalar, got {other}"
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 리포트에 표시하는 한 줄 JSON (`{"Sector": "Technology"}`, 비ASCII 그대로)
    pub fn to_inline_json(&self) -> String {
        let body: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{}: {}", Value::String(name.clone()), value))
            .collect();
        format!("{{{}}}", body.join(", "))
    }

    /// (필터 이름, 값 문자열) 목록
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// 스크리너 리포트 조건
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerRequest {
    pub filters: ScreenerFilters,
    pub signal: String,
    pub limit: usize,
}

impl ScreenerRequest {
    /// 등락률 내림차순 조회 조건
    pub fn to_query(&self) -> ScreenerQuery {
        ScreenerQuery {
            filters: self.filters.pairs(),
            signal: self.signal.clone(),
            ..ScreenerQuery::new()
        }
        .order_by("Change", false)
        .limit(self.limit)
    }
}

/// 스크리너 리포트를 생성합니다.
pub async fn screener_report(
    source: &dyn MarketDataSource,
    request: &ScreenerRequest,
    ctx: &ReportContext,
) -> String {
    let mut doc = MarkdownDoc::titled("股票篩選結果", ctx);

    if !request.filters.is_empty() {
        doc.line(format!("**篩選條件**: {}", request.filters.to_inline_json()));
    }
    if !request.signal.is_empty() {
        doc.line(format!("**訊號**: {}", request.signal));
    }
    doc.blank();

    match source.screener(&request.to_query()).await {
        Ok(table) if !table.is_empty() => {
            doc.line(format!("共 {} 檔:\n", table.len()));
            doc.line(table.to_markdown());
        }
        Ok(_) => doc.line("未找到符合條件的股票。"),
        Err(e) => {
            tracing::warn!(error = %e, "스크리너 조회 실패");
            doc.line(format!("*篩選失敗: {e}*"));
        }
    }

    doc.finish()
}
