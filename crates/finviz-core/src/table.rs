//! 표 형식 데이터와 마크다운 렌더링.
//!
//! finviz 페이지의 표(스크리너, 섹터, 내부자 거래 등)를 열 이름 + 문자열 행으로
//! 보관하고, 인덱스 열 없이 마크다운 파이프 표로 출력합니다.

/// 열 이름과 문자열 셀로 이루어진 표.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// 열 이름 (원본 순서)
    pub columns: Vec<String>,
    /// 행 데이터 (각 행은 `columns`와 길이가 같음)
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// 열 이름으로 빈 표를 생성합니다.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 행을 추가합니다. 열 수에 맞춰 자르거나 빈 셀로 채웁니다.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    /// 행 수
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 행이 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 앞에서 `n`개 행만 남긴 복사본
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// 열 이름의 위치
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 열 존재 여부
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// `row` 번째 행의 `name` 열 값
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(idx)).map(String::as_str)
    }

    /// 열 하나를 제거합니다 (없으면 무시).
    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
        }
    }

    /// 조건을 만족하는 행만 남긴 복사본
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// 다른 표의 행을 이어 붙입니다 (열 구성이 같을 때).
    pub fn extend(&mut self, other: DataTable) {
        if self.columns.is_empty() {
            self.columns = other.columns;
            self.rows = other.rows;
        } else if self.columns == other.columns {
            self.rows.extend(other.rows);
        }
    }

    /// 마크다운 파이프 표로 렌더링합니다.
    ///
    /// 모든 셀이 숫자인 열은 오른쪽 정렬, 나머지는 왼쪽 정렬이며
    /// 열 너비에 맞춰 공백으로 채웁니다.
    pub fn to_markdown(&self) -> String {
        let headers: Vec<String> = self.columns.iter().map(|c| escape_cell(c)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|c| escape_cell(c)).collect())
            .collect();

        let numeric: Vec<bool> = (0..headers.len())
            .map(|i| {
                let mut any = false;
                let all = body.iter().all(|r| {
                    let cell = r.get(i).map(String::as_str).unwrap_or("").trim();
                    if cell.is_empty() {
                        return true;
                    }
                    any = true;
                    cell.parse::<f64>().is_ok()
                });
                all && any
            })
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|i| {
                body.iter()
                    .map(|r| r.get(i).map(|c| display_width(c)).unwrap_or(0))
                    .chain(std::iter::once(display_width(&headers[i])))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(render_row(&headers, &widths, &numeric));

        let separator: Vec<String> = widths
            .iter()
            .zip(&numeric)
            .map(|(w, is_num)| {
                if *is_num {
                    format!("{}:", "-".repeat(w + 1))
                } else {
                    format!(":{}", "-".repeat(w + 1))
                }
            })
            .collect();
        lines.push(format!("|{}|", separator.join("|")));

        for row in &body {
            lines.push(render_row(row, &widths, &numeric));
        }

        lines.join("\n")
    }
}

fn render_row(cells: &[String], widths: &[usize], numeric: &[bool]) -> String {
    let rendered: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = w.saturating_sub(display_width(cell));
            if numeric[i] {
                format!(" {}{} ", " ".repeat(pad), cell)
            } else {
                format!(" {}{} ", cell, " ".repeat(pad))
            }
        })
        .collect();
    format!("|{}|", rendered.join("|"))
}

fn escape_cell(text: &str) -> String {
    text.trim()
        .replace('\n', " ")
        .replace('\r', "")
        .replace('|', "\\|")
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        let mut table = DataTable::new(["Ticker", "Company", "Change"]);
        table.push_row(["NVDA", "NVIDIA Corp", "3.25"]);
        table.push_row(["AMD", "Advanced Micro Devices", "-1.10"]);
        table
    }

    #[test]
    fn test_to_markdown_alignment() {
        let md = sample().to_markdown();
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Ticker |"));
        assert!(lines[1].starts_with("|:-------"));
        assert!(lines[1].ends_with("-------:|"));
        assert!(lines[2].contains(" NVIDIA Corp "));
        assert!(lines[3].ends_with("  -1.10 |"));
    }

    #[test]
    fn test_escape_pipe() {
        let mut table = DataTable::new(["Title"]);
        table.push_row(["A | B"]);
        assert!(table.to_markdown().contains("A \\| B"));
    }

    #[test]
    fn test_head_and_value() {
        let table = sample();
        let head = table.head(1);
        assert_eq!(head.len(), 1);
        assert_eq!(head.value(0, "Ticker"), Some("NVDA"));
        assert_eq!(table.value(1, "Change"), Some("-1.10"));
        assert_eq!(table.value(2, "Change"), None);
        assert_eq!(table.value(0, "Missing"), None);
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = DataTable::new(["A", "B"]);
        table.push_row(["1"]);
        table.push_row(["1", "2", "3"]);
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new()]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_drop_column_and_filter() {
        let mut table = DataTable::new(["No.", "Ticker"]);
        table.push_row(["1", "AAPL"]);
        table.push_row(["2", "MSFT"]);
        table.drop_column("No.");
        assert_eq!(table.columns, vec!["Ticker".to_string()]);

        let filtered = table.filter_rows(|r| r[0] == "MSFT");
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_extend_requires_same_columns() {
        let mut table = DataTable::default();
        table.extend(sample());
        assert_eq!(table.len(), 2);
        table.extend(sample());
        assert_eq!(table.len(), 4);
        table.extend(DataTable::new(["Other"]));
        assert_eq!(table.len(), 4);
    }
}
