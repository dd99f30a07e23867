use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::db::DbService;
use crate::notify::NotificationService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是整个后端的核心数据结构，axum handler 通过
/// `State<ServerState>` 拿到它。内部都是浅拷贝（pool 和通道句柄），
/// clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | notifications | NotificationService | 通知分发（fire-and-forget） |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 通知分发服务
    pub notifications: NotificationService,
    /// 后台任务停机信号
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/mesa.db) + 迁移
    /// 3. 通知 worker
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mesa.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let shutdown = CancellationToken::new();
        let notifications = NotificationService::start(shutdown.clone());

        Self {
            config: config.clone(),
            pool: db_service.pool,
            notifications,
            shutdown,
        }
    }

    /// 获取数据库连接池
    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// 发出停机信号（通知 worker 等后台任务退出）
    pub fn trigger_shutdown(&self) {
        self.shutdown.cancel();
    }
}
