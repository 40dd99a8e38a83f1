use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::message::BusMessage;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::message::MessageBus;
use crate::services::EmailService;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | message_bus | Arc<MessageBus> | 事件广播通道 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | email | EmailService | 事务性邮件发送 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 事件广播通道
    pub message_bus: Arc<MessageBus>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 事务性邮件发送
    pub email: EmailService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`Self::initialize()`] 方法代替；测试用 [`Self::for_tests()`]。
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        message_bus: Arc<MessageBus>,
        jwt_service: Arc<JwtService>,
        email: EmailService,
    ) -> Self {
        Self {
            config,
            db,
            message_bus,
            jwt_service,
            email,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/cafe.db) + 索引定义
    /// 3. 各服务 (MessageBus, JWT, Email)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.ensure_work_dir_structure().map_err(|e| {
            crate::AppError::internal(format!("Failed to create work directory: {e}"))
        })?;

        let db_path = config.database_dir().join("cafe.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let message_bus = Arc::new(MessageBus::with_capacity(config.bus_capacity));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let email = EmailService::from_config(config);

        Ok(Self::new(
            config.clone(),
            db_service.db,
            message_bus,
            jwt_service,
            email,
        ))
    }

    /// 使用内存数据库构造状态 (测试专用)
    pub async fn for_tests(config: Config) -> AppResult<Self> {
        let db_service = DbService::memory().await?;
        let message_bus = Arc::new(MessageBus::with_capacity(config.bus_capacity));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let email = EmailService::from_config(&config);

        Ok(Self::new(
            config,
            db_service.db,
            message_bus,
            jwt_service,
            email,
        ))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取事件通道
    pub fn message_bus(&self) -> &Arc<MessageBus> {
        &self.message_bus
    }

    /// 发布事件 (即发即弃)
    ///
    /// 没有订阅者时静默丢弃，REST 响应不受影响。
    pub fn publish(&self, msg: BusMessage) {
        self.message_bus.publish(msg);
    }
}
