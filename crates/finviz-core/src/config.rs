//! 환경변수 기반 설정 헬퍼.

/// `.env` 파일을 읽어 환경변수로 등록합니다 (파일이 없으면 무시).
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), ".env 로드 완료");
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
pub fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 비어 있지 않은 환경변수 값
pub fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parse_default() {
        assert_eq!(env_var_parse("FINVIZ_CORE_TEST_UNSET_NUMBER", 300u64), 300);
    }

    #[test]
    fn test_env_var_parse_set() {
        std::env::set_var("FINVIZ_CORE_TEST_DELAY", " 750 ");
        assert_eq!(env_var_parse("FINVIZ_CORE_TEST_DELAY", 300u64), 750);

        std::env::set_var("FINVIZ_CORE_TEST_BAD", "abc");
        assert_eq!(env_var_parse("FINVIZ_CORE_TEST_BAD", 5u32), 5);
    }

    #[test]
    fn test_env_var_opt_blank() {
        std::env::set_var("FINVIZ_CORE_TEST_BLANK", "   ");
        assert_eq!(env_var_opt("FINVIZ_CORE_TEST_BLANK"), None);
        std::env::set_var("FINVIZ_CORE_TEST_VALUE", "Obsidian");
        assert_eq!(
            env_var_opt("FINVIZ_CORE_TEST_VALUE").as_deref(),
            Some("Obsidian")
        );
    }
}
