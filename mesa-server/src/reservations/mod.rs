//! 预订生命周期
//!
//! 订位/包场的创建、状态流转和级联副作用：
//! - 状态流转前必须先取旧记录，同值更新是 no-op，不触发通知
//! - 取消（包场还包括拒绝）级联删除预点单并清空父引用
//! - 通知一律 fire-and-forget，失败不影响已提交的状态
//! - 自助取消走 OTP 验证（`otp` 子模块）

pub mod booking;
pub mod event;
pub mod otp;
