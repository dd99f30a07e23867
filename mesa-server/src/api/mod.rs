//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`bookings`] - 散客订位接口
//! - [`events`] - 包场预订接口（含档期查询）
//! - [`preorders`] - 预点单接口
//! - [`cancellations`] - 自助取消（OTP）接口
//! - [`categories`] - 分类管理接口
//! - [`menu_items`] - 菜品管理接口
//! - [`tables`] - 桌台管理接口
//! - [`feedback`] - 顾客反馈接口
//! - [`dashboard`] - 看板与报表接口
//! - [`settings`] - 门店设置接口

pub mod health;

pub mod bookings;
pub mod cancellations;
pub mod events;
pub mod preorders;

pub mod categories;
pub mod menu_items;
pub mod tables;

pub mod dashboard;
pub mod feedback;
pub mod settings;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
