//! 营业时段模型
//!
//! 私人包场只能预订两个固定时段：上午场 10:00–14:00、晚场 18:00–22:00。
//! 散客订位是精确到分钟的时间点，通过 [`TimeSlot::of_time`] 判断落在哪个
//! 时段内（半开区间，14:00 不属于上午场）。
//!
//! 日期一律按自然日比较（`NaiveDate`，不携带时分秒）。

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Named service window for private events
///
/// Closed enumeration: API payloads must use the exact labels
/// `"10:00-14:00"` / `"18:00-22:00"`, never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TimeSlot {
    #[serde(rename = "10:00-14:00")]
    Morning,
    #[serde(rename = "18:00-22:00")]
    Evening,
}

impl TimeSlot {
    /// Both windows, in service order
    pub const ALL: [TimeSlot; 2] = [TimeSlot::Morning, TimeSlot::Evening];

    /// Hour range of the window, half-open `[start, end)`
    pub fn hour_range(&self) -> (u32, u32) {
        match self {
            TimeSlot::Morning => (10, 14),
            TimeSlot::Evening => (18, 22),
        }
    }

    /// Whether the given hour-of-day falls inside the window
    pub fn contains_hour(&self, hour: u32) -> bool {
        let (start, end) = self.hour_range();
        hour >= start && hour < end
    }

    /// Map a point-in-time to the window containing it, if any
    pub fn of_time(time: NaiveTime) -> Option<TimeSlot> {
        use chrono::Timelike;
        let hour = time.hour();
        Self::ALL.into_iter().find(|slot| slot.contains_hour(hour))
    }

    /// API label, identical to the serde representation
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "10:00-14:00",
            TimeSlot::Evening => "18:00-22:00",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn morning_window_is_half_open() {
        assert_eq!(TimeSlot::of_time(at(10, 0)), Some(TimeSlot::Morning));
        assert_eq!(TimeSlot::of_time(at(13, 59)), Some(TimeSlot::Morning));
        assert_eq!(TimeSlot::of_time(at(14, 0)), None);
    }

    #[test]
    fn evening_window_is_half_open() {
        assert_eq!(TimeSlot::of_time(at(18, 0)), Some(TimeSlot::Evening));
        assert_eq!(TimeSlot::of_time(at(21, 30)), Some(TimeSlot::Evening));
        assert_eq!(TimeSlot::of_time(at(22, 0)), None);
    }

    #[test]
    fn hours_outside_both_windows() {
        for hour in [0, 9, 14, 15, 16, 17, 22, 23] {
            assert_eq!(TimeSlot::of_time(at(hour, 0)), None, "hour {hour}");
        }
    }

    #[test]
    fn labels_round_trip_through_serde() {
        let json = serde_json::to_string(&TimeSlot::Morning).unwrap();
        assert_eq!(json, "\"10:00-14:00\"");
        let parsed: TimeSlot = serde_json::from_str("\"18:00-22:00\"").unwrap();
        assert_eq!(parsed, TimeSlot::Evening);
        // 自由文本必须被拒绝
        assert!(serde_json::from_str::<TimeSlot>("\"morning\"").is_err());
    }
}
