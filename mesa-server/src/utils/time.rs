//! 时间工具函数 — 业务时区转换
//!
//! 日期/时间字符串的解析统一在 API handler 层完成，
//! repository 层只接收已经解析好的 `NaiveDate` / `HH:MM` 字符串。

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time_hm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 当前业务时区的自然日
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 验证日期不在过去 (业务时区)
pub fn validate_not_past(date: NaiveDate, tz: Tz) -> AppResult<()> {
    let today = today_in(tz);
    if date < today {
        return Err(AppError::validation(format!(
            "Date {} is in the past (today is {})",
            date, today
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(
            parse_date("2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2026").is_err());
    }

    #[test]
    fn parse_time_rejects_seconds() {
        assert!(parse_time_hm("19:30").is_ok());
        assert!(parse_time_hm("19:30:00").is_err());
        assert!(parse_time_hm("25:00").is_err());
    }
}
