//! finviz 수치 문자열 파싱.
//!
//! finviz는 값을 `28.53`, `1.52%`, `2.45B`, `1,234,567`, `-` 같은 문자열로
//! 표시합니다. `-`와 빈 문자열은 값 없음입니다.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 수치 문자열을 Decimal로 변환합니다.
///
/// - `%` 접미사는 제거 (퍼센트 포인트 그대로 반환)
/// - `K`/`M`/`B`/`T` 접미사는 배수 적용
/// - 쉼표 제거
///
/// "2.45B" -> 2450000000, "-0.52%" -> -0.52, "-" -> None
///
/// 배수 적용 결과가 Decimal 범위를 넘으면 `None`.
pub fn parse_metric(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return None;
    }

    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim_end_matches('%');

    let (number, multiplier) = match cleaned.chars().last()? {
        'K' => (&cleaned[..cleaned.len() - 1], Decimal::from(1_000i64)),
        'M' => (&cleaned[..cleaned.len() - 1], Decimal::from(1_000_000i64)),
        'B' => (&cleaned[..cleaned.len() - 1], Decimal::from(1_000_000_000i64)),
        'T' => (
            &cleaned[..cleaned.len() - 1],
            Decimal::from(1_000_000_000_000i64),
        ),
        _ => (cleaned, Decimal::ONE),
    };

    let value = Decimal::from_str(number.trim()).ok()?;
    value.checked_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_metric_plain() {
        assert_eq!(parse_metric("28.53"), Some(dec!(28.53)));
        assert_eq!(parse_metric("1,234,567"), Some(dec!(1234567)));
        assert_eq!(parse_metric("-3.5"), Some(dec!(-3.5)));
    }

    #[test]
    fn test_parse_metric_suffix() {
        assert_eq!(parse_metric("2.45B"), Some(dec!(2450000000)));
        assert_eq!(parse_metric("3.21T"), Some(dec!(3210000000000)));
        assert_eq!(parse_metric("452.10M"), Some(dec!(452100000)));
        assert_eq!(parse_metric("12.5K"), Some(dec!(12500)));
        assert_eq!(parse_metric("-0.52%"), Some(dec!(-0.52)));
    }

    #[test]
    fn test_parse_metric_missing() {
        assert_eq!(parse_metric("-"), None);
        assert_eq!(parse_metric(""), None);
        assert_eq!(parse_metric("164.08 - 237.23"), None);
        assert_eq!(parse_metric("Technology"), None);
    }

    #[test]
    fn test_parse_metric_out_of_range() {
        assert_eq!(parse_metric("99999999999999999999T"), None);
        assert_eq!(parse_metric("79228162514264337593543950335K"), None);
        assert_eq!(parse_metric("1e400"), None);
    }
}
