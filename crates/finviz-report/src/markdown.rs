//! 리포트 마크다운 조립.
//!
//! 리포트는 줄 목록을 `\n`으로 이어 붙인 문자열입니다. 섹션 제목 뒤와
//! 섹션 끝에는 빈 줄이 하나씩 들어갑니다.

use finviz_core::{fetch_timestamp, DataTable};
use finviz_data::NewsItem;

/// 리포트 공통 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// 헤더의 수집 시각 (`YYYY-MM-DD HH:MM`)
    pub fetched_at: String,
    /// 분석 섹션 포함 여부
    pub analyze: bool,
}

impl ReportContext {
    /// 현재 시각 기준
    pub fn now() -> Self {
        Self::at(fetch_timestamp())
    }

    /// 수집 시각 지정
    pub fn at(fetched_at: impl Into<String>) -> Self {
        Self {
            fetched_at: fetched_at.into(),
            analyze: false,
        }
    }

    pub fn with_analysis(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }
}

/// 줄 단위 마크다운 문서
#[derive(Debug, Clone, Default)]
pub struct MarkdownDoc {
    lines: Vec<String>,
}

impl MarkdownDoc {
    /// 제목과 수집 시각 줄로 시작하는 문서
    pub fn titled(title: &str, ctx: &ReportContext) -> Self {
        let mut doc = Self::default();
        doc.line(format!("# {title}"));
        doc.line(format!("*擷取時間: {}*\n", ctx.fetched_at));
        doc
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// 본문이 한 줄인 섹션 (`## 제목\n본문\n`)
    pub fn text_section(&mut self, heading: &str, body: &str) {
        self.line(format!("## {heading}\n{body}\n"));
    }

    /// 표 섹션
    pub fn table_section(&mut self, heading: &str, table: &DataTable) {
        self.line(format!("## {heading}\n"));
        self.line(table.to_markdown());
        self.blank();
    }

    /// 뉴스 목록 섹션
    pub fn news_section(&mut self, heading: &str, items: &[NewsItem]) {
        self.line(format!("## {heading}\n"));
        self.lines(items.iter().map(news_bullet));
        self.blank();
    }

    /// 실패 안내 줄 (`*메시지*` + 빈 줄)
    pub fn placeholder(&mut self, message: &str) {
        self.line(format!("*{message}*\n"));
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// `* **날짜** [제목](링크) *(출처)*`
pub fn news_bullet(item: &NewsItem) -> String {
    format!(
        "* **{}** [{}]({}) *({})*",
        item.date, item.title, item.link, item.source
    )
}
