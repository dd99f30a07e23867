//! Mesa Server - 餐厅预订与运营后端
//!
//! # 架构概述
//!
//! - **订位/包场** (`reservations`): 生命周期、级联副作用、OTP 自助取消
//! - **档期判定** (`scheduling`): 订位/包场创建前的冲突检查
//! - **预点单** (`ledger`): 价格快照、金额计算、父引用回写
//! - **通知** (`notify`): fire-and-forget 分发 + 后台投递 worker
//! - **数据库** (`db`): SQLite 连接池 + 仓储层
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层（连接池 + repository）
//! ├── scheduling/    # 档期冲突判定
//! ├── reservations/  # 订位/包场生命周期 + OTP
//! ├── ledger/        # 预点单台账
//! ├── notify/        # 通知分发
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod ledger;
pub mod notify;
pub mod reservations;
pub mod scheduling;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use notify::{Notification, NotificationService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    "#
    );
}
