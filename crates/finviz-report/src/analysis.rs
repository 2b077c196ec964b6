//! 고정 임계값 기반 분석 규칙.
//!
//! 이미 수집된 finviz 지표 문자열만 사용하며 추가 요청은 하지 않습니다.
//!
//! ## 구성
//! - 등급: 밸류에이션(P/E), 수익성(ROE), 성장성(EPS next 5Y), 재무건전성(Debt/Eq), 모멘텀(Perf Half Y)
//! - 매수/매도 시그널 집계와 판정 (偏多/中性/偏空)
//! - 시나리오 표 (樂觀/基準/悲觀)와 기대수익률
//! - 섹터 로테이션 (선도/부진 섹터, 방어주 vs 경기민감주)

use std::collections::BTreeMap;
use std::fmt;

use finviz_core::{parse_metric, DataTable};
use rust_decimal::{Decimal, RoundingStrategy};

/// 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(s)
    }
}

/// 값이 클수록 좋은 지표의 등급 (경계값 포함)
fn grade_higher_better(value: Decimal, cuts: [i64; 4]) -> Grade {
    let [a, b, c, d] = cuts.map(Decimal::from);
    if value >= a {
        Grade::A
    } else if value >= b {
        Grade::B
    } else if value >= c {
        Grade::C
    } else if value >= d {
        Grade::D
    } else {
        Grade::F
    }
}

/// 밸류에이션: P/E < 15 A, < 25 B, < 35 C, < 50 D. 0 이하는 적자로 F.
pub fn grade_valuation(pe: Decimal) -> Grade {
    if pe <= Decimal::ZERO {
        Grade::F
    } else if pe < Decimal::from(15) {
        Grade::A
    } else if pe < Decimal::from(25) {
        Grade::B
    } else if pe < Decimal::from(35) {
        Grade::C
    } else if pe < Decimal::from(50) {
        Grade::D
    } else {
        Grade::F
    }
}

/// 수익성: ROE % >= 20 A, >= 15 B, >= 10 C, >= 5 D
pub fn grade_profitability(roe: Decimal) -> Grade {
    grade_higher_better(roe, [20, 15, 10, 5])
}

/// 성장성: EPS next 5Y % >= 20 A, >= 10 B, >= 5 C, >= 0 D
pub fn grade_growth(eps_next_5y: Decimal) -> Grade {
    grade_higher_better(eps_next_5y, [20, 10, 5, 0])
}

/// 재무건전성: Debt/Eq <= 0.3 A, <= 0.6 B, <= 1.0 C, <= 2.0 D
pub fn grade_health(debt_eq: Decimal) -> Grade {
    let tenth = Decimal::new(1, 1);
    if debt_eq <= tenth * Decimal::from(3) {
        Grade::A
    } else if debt_eq <= tenth * Decimal::from(6) {
        Grade::B
    } else if debt_eq <= Decimal::ONE {
        Grade::C
    } else if debt_eq <= Decimal::from(2) {
        Grade::D
    } else {
        Grade::F
    }
}

/// 모멘텀: Perf Half Y % >= 20 A, >= 5 B, >= -5 C, >= -20 D
pub fn grade_momentum(perf_half_y: Decimal) -> Grade {
    grade_higher_better(perf_half_y, [20, 5, -5, -20])
}

/// 등급 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeLine {
    /// 평가 항목 (估值, 獲利能力, ...)
    pub dimension: &'static str,
    /// 지표 키
    pub metric: &'static str,
    /// 원문 값
    pub value: String,
    pub grade: Grade,
}

const GRADE_RULES: [(&str, &str, fn(Decimal) -> Grade); 5] = [
    ("估值", "P/E", grade_valuation),
    ("獲利能力", "ROE", grade_profitability),
    ("成長性", "EPS next 5Y", grade_growth),
    ("財務健全", "Debt/Eq", grade_health),
    ("動能", "Perf Half Y", grade_momentum),
];

/// 지표 맵에서 숫자 값 읽기
fn metric(fundamentals: &BTreeMap<String, String>, key: &str) -> Option<Decimal> {
    fundamentals.get(key).and_then(|v| parse_metric(v))
}

/// 값이 있는 지표만 등급을 매깁니다.
pub fn grade_card(fundamentals: &BTreeMap<String, String>) -> Vec<GradeLine> {
    GRADE_RULES
        .iter()
        .filter_map(|(dimension, key, rule)| {
            let value = metric(fundamentals, key)?;
            Some(GradeLine {
                dimension: *dimension,
                metric: *key,
                value: fundamentals.get(*key).cloned().unwrap_or_default(),
                grade: rule(value),
            })
        })
        .collect()
}

/// 종합 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Bullish,
    Neutral,
    Bearish,
}

impl Verdict {
    /// (樂觀, 基準, 悲觀) 확률 %
    pub fn probabilities(self) -> [u32; 3] {
        match self {
            Self::Bullish => [35, 45, 20],
            Self::Neutral => [25, 50, 25],
            Self::Bearish => [20, 45, 35],
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bullish => "偏多",
            Self::Neutral => "中性",
            Self::Bearish => "偏空",
        };
        f.write_str(s)
    }
}

/// 매수/매도 시그널 집계
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalScore {
    pub buy: Vec<String>,
    pub sell: Vec<String>,
}

impl SignalScore {
    /// 매수 - 매도
    pub fn net(&self) -> i64 {
        self.buy.len() as i64 - self.sell.len() as i64
    }

    /// net >= 2 偏多, <= -2 偏空
    pub fn verdict(&self) -> Verdict {
        match self.net() {
            n if n >= 2 => Verdict::Bullish,
            n if n <= -2 => Verdict::Bearish,
            _ => Verdict::Neutral,
        }
    }
}

/// 목표가 대비 상승 여력 % ((Target Price / Price - 1) * 100)
///
/// 가격이 0 이하이거나 계산이 Decimal 범위를 넘으면 `None`.
pub fn target_upside(fundamentals: &BTreeMap<String, String>) -> Option<Decimal> {
    let price = metric(fundamentals, "Price")?;
    let target = metric(fundamentals, "Target Price")?;
    if price <= Decimal::ZERO {
        return None;
    }
    target
        .checked_div(price)?
        .checked_sub(Decimal::ONE)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// 고정 규칙으로 시그널을 셉니다.
pub fn score_signals(fundamentals: &BTreeMap<String, String>) -> SignalScore {
    let mut score = SignalScore::default();

    if let Some(rsi) = metric(fundamentals, "RSI (14)") {
        if rsi < Decimal::from(30) {
            score.buy.push(format!("RSI {rsi} 超賣"));
        } else if rsi > Decimal::from(70) {
            score.sell.push(format!("RSI {rsi} 超買"));
        }
    }

    for key in ["SMA50", "SMA200"] {
        if let Some(distance) = metric(fundamentals, key) {
            if distance > Decimal::ZERO {
                score.buy.push(format!("股價高於 {key}"));
            } else if distance < Decimal::ZERO {
                score.sell.push(format!("股價低於 {key}"));
            }
        }
    }

    if let Some(recom) = metric(fundamentals, "Recom") {
        if recom <= Decimal::from(2) {
            score.buy.push(format!("分析師評級 {recom} 偏買進"));
        } else if recom >= Decimal::new(35, 1) {
            score.sell.push(format!("分析師評級 {recom} 偏賣出"));
        }
    }

    if let Some(upside) = target_upside(fundamentals) {
        let shown = round1(upside);
        if upside > Decimal::from(15) {
            score.buy.push(format!("目標價上漲空間 {shown}%"));
        } else if upside < Decimal::ZERO {
            score.sell.push(format!("股價高於目標價 ({shown}%)"));
        }
    }

    if let Some(insider) = metric(fundamentals, "Insider Trans") {
        if insider > Decimal::ZERO {
            score.buy.push("內部人淨買入".to_string());
        } else if insider < Decimal::ZERO {
            score.sell.push("內部人淨賣出".to_string());
        }
    }

    if let Some(short) = metric(fundamentals, "Short Float") {
        if short > Decimal::from(20) {
            score.sell.push(format!("放空比例 {short}% 偏高"));
        }
    }

    score
}

/// 시나리오 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    /// 확률 %
    pub probability: u32,
    /// 수익률 %
    pub return_pct: Decimal,
    /// 해당 수익률의 주가
    pub price: Decimal,
}

/// 樂觀 = 상승여력 + 15pp, 基準 = 상승여력, 悲觀 = 상승여력 - 20pp
///
/// 어느 한 줄이라도 Decimal 범위를 넘으면 `None`.
pub fn scenarios(price: Decimal, upside: Decimal, verdict: Verdict) -> Option<Vec<Scenario>> {
    let [bull_p, base_p, bear_p] = verdict.probabilities();
    [
        ("樂觀", bull_p, upside.checked_add(Decimal::from(15))),
        ("基準", base_p, Some(upside)),
        ("悲觀", bear_p, upside.checked_sub(Decimal::from(20))),
    ]
    .into_iter()
    .map(|(name, probability, return_pct)| {
        let return_pct = return_pct?;
        let factor = Decimal::ONE.checked_add(return_pct.checked_div(Decimal::ONE_HUNDRED)?)?;
        Some(Scenario {
            name,
            probability,
            return_pct,
            price: price.checked_mul(factor)?,
        })
    })
    .collect()
}

/// 확률 가중 기대수익률 %. 범위를 넘으면 `None`.
pub fn expected_return(scenarios: &[Scenario]) -> Option<Decimal> {
    scenarios.iter().try_fold(Decimal::ZERO, |acc, s| {
        let weighted = Decimal::from(s.probability)
            .checked_mul(s.return_pct)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        acc.checked_add(weighted)
    })
}

/// 소수 첫째 자리 반올림 (0.05 -> 0.1)
fn round1(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// 부호 포함 퍼센트 (`+12.3%`)
pub fn signed_pct(value: Decimal) -> String {
    let value = round1(value);
    if value >= Decimal::ZERO {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

/// 종목 분석 섹션 본문 줄
pub fn ticker_analysis_lines(fundamentals: &BTreeMap<String, String>) -> Vec<String> {
    let mut lines = Vec::new();

    let card = grade_card(fundamentals);
    if !card.is_empty() {
        lines.push("| 面向 | 指標 | 值 | 評級 |".to_string());
        lines.push("|------|------|-----|------|".to_string());
        for line in &card {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                line.dimension, line.metric, line.value, line.grade
            ));
        }
        lines.push(String::new());
    }

    let score = score_signals(fundamentals);
    let verdict = score.verdict();
    lines.push(format!(
        "**訊號統計**: 買進 {} / 賣出 {} → {}",
        score.buy.len(),
        score.sell.len(),
        verdict
    ));
    if !score.buy.is_empty() {
        lines.push(format!("* 買進: {}", score.buy.join("、")));
    }
    if !score.sell.is_empty() {
        lines.push(format!("* 賣出: {}", score.sell.join("、")));
    }
    lines.push(String::new());

    let priced = metric(fundamentals, "Price").zip(target_upside(fundamentals));
    let table = priced.and_then(|(price, upside)| {
        let table = scenarios(price, upside, verdict)?;
        let expected = expected_return(&table)?;
        Some((table, expected))
    });
    if let Some((table, expected)) = table {
        lines.push("| 情境 | 機率 | 報酬 | 價格 |".to_string());
        lines.push("|------|------|------|------|".to_string());
        for s in &table {
            lines.push(format!(
                "| {} | {}% | {} | {} |",
                s.name,
                s.probability,
                signed_pct(s.return_pct),
                s.price.round_dp(2)
            ));
        }
        lines.push(String::new());
        lines.push(format!("*預期報酬: {}*", signed_pct(expected)));
        lines.push(String::new());
    }

    lines
}

/// 방어주 섹터
pub const DEFENSIVE_SECTORS: [&str; 4] = ["Utilities", "Consumer Defensive", "Healthcare", "Real Estate"];

/// 경기민감주 섹터
pub const CYCLICAL_SECTORS: [&str; 7] = [
    "Technology",
    "Consumer Cyclical",
    "Financial",
    "Industrials",
    "Basic Materials",
    "Energy",
    "Communication Services",
];

/// 로테이션 판단 기준 (pp)
fn rotation_threshold() -> Decimal {
    Decimal::new(3, 1)
}

/// 자금 흐름 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStance {
    /// 방어주 우위
    RiskOff,
    /// 경기민감주 우위
    RiskOn,
    /// 차이 0.3pp 미만
    NoClearRotation,
}

impl fmt::Display for RotationStance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RiskOff => "資金流向防禦型板塊 (避險)",
            Self::RiskOn => "資金流向景氣循環板塊 (風險偏好)",
            Self::NoClearRotation => "無明顯輪動",
        };
        f.write_str(s)
    }
}

/// 섹터 로테이션 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorRotation {
    /// 상위 3개 (이름, 등락률 %)
    pub leaders: Vec<(String, Decimal)>,
    /// 하위 3개 (가장 약한 순)
    pub laggards: Vec<(String, Decimal)>,
    pub defensive_avg: Option<Decimal>,
    pub cyclical_avg: Option<Decimal>,
    pub stance: RotationStance,
}

fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?
        .checked_div(Decimal::from(values.len()))
}

/// 섹터 성과 표(`Name`, `Change` 열)에서 로테이션을 계산합니다.
pub fn sector_rotation(sectors: &DataTable) -> Option<SectorRotation> {
    let name_idx = sectors.column_index("Name")?;
    let change_idx = sectors.column_index("Change")?;

    let mut changes: Vec<(String, Decimal)> = sectors
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.get(name_idx)?.clone();
            let change = parse_metric(row.get(change_idx)?)?;
            Some((name, change))
        })
        .collect();
    if changes.is_empty() {
        return None;
    }

    changes.sort_by(|a, b| b.1.cmp(&a.1));
    let leaders: Vec<_> = changes.iter().take(3).cloned().collect();
    let laggards: Vec<_> = changes.iter().rev().take(3).cloned().collect();

    let pick = |group: &[&str]| -> Vec<Decimal> {
        changes
            .iter()
            .filter(|(name, _)| group.contains(&name.as_str()))
            .map(|(_, change)| *change)
            .collect()
    };
    let defensive_avg = average(&pick(&DEFENSIVE_SECTORS));
    let cyclical_avg = average(&pick(&CYCLICAL_SECTORS));

    let gap = defensive_avg
        .zip(cyclical_avg)
        .and_then(|(d, c)| d.checked_sub(c));
    let stance = match gap {
        Some(gap) if gap >= rotation_threshold() => RotationStance::RiskOff,
        Some(gap) if -gap >= rotation_threshold() => RotationStance::RiskOn,
        _ => RotationStance::NoClearRotation,
    };

    Some(SectorRotation {
        leaders,
        laggards,
        defensive_avg,
        cyclical_avg,
        stance,
    })
}

/// 섹터 로테이션 섹션 본문 줄
pub fn rotation_lines(rotation: &SectorRotation) -> Vec<String> {
    let join = |items: &[(String, Decimal)]| -> String {
        items
            .iter()
            .map(|(name, change)| format!("{name} ({})", signed_pct(*change)))
            .collect::<Vec<_>>()
            .join("、")
    };
    let avg = |value: Option<Decimal>| value.map(signed_pct).unwrap_or_else(|| "N/A".to_string());

    vec![
        format!("* **領漲板塊**: {}", join(&rotation.leaders)),
        format!("* **落後板塊**: {}", join(&rotation.laggards)),
        format!(
            "* **防禦型平均**: {} / **景氣循環平均**: {}",
            avg(rotation.defensive_avg),
            avg(rotation.cyclical_avg)
        ),
        format!("* **判斷**: {}", rotation.stance),
        String::new(),
    ]
}
