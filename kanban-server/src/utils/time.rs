//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::NaiveDateTime;

use super::{AppError, AppResult};

/// 解析日期时间字符串 (`YYYY-MM-DDTHH:MM[:SS]`，或带时区的 RFC 3339)
///
/// 返回 Unix millis；无时区时按 UTC 处理。
pub fn parse_datetime_millis(input: &str) -> AppResult<i64> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    Err(AppError::validation(format!(
        "Invalid date format: {input}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naive_and_rfc3339() {
        assert_eq!(parse_datetime_millis("1970-01-01T00:00:00").unwrap(), 0);
        assert_eq!(parse_datetime_millis("1970-01-01T00:01").unwrap(), 60_000);
        assert_eq!(
            parse_datetime_millis("1970-01-01T01:00:00+01:00").unwrap(),
            0
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime_millis("not-a-date").is_err());
        assert!(parse_datetime_millis("2024-13-40T99:99").is_err());
    }
}
