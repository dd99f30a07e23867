//! 档期冲突判定
//!
//! 订位/包场创建前的准入检查，全部是只读查询：
//! - 散客订位：时间点落在包场时段内且该时段已有 **approved** 包场 → 拒绝；
//!   同桌同日同时刻已有未取消订位 → 拒绝（唯一索引兜底并发写入）。
//! - 包场：该 (日期, 时段) 已有 pending/approved 包场 → 拒绝；全天饱和
//!   启发式 → 拒绝；该时段内已有散客订位 → 拒绝。
//!   管理员代订只检查 approved 冲突，对 pending 请求有优先权。

mod conflict;

pub use conflict::{
    REASON_DAY_SATURATED, REASON_SLOT_HAS_BOOKINGS, REASON_SLOT_RESERVED, REASON_SLOT_TAKEN,
    REASON_TABLE_TAKEN, SATURATION_FACTOR, check_booking_admission, check_event_admission,
    slot_availability,
};

/// Who is creating the event; admins keep only the approved-collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    Customer,
    Admin,
}
