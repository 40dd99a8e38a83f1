use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置 - 咖啡店后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/cafe | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | CLIENT_URL | http://localhost:5173 | 前端地址 (CORS + 邮件链接) |
/// | EMAIL_RELAY_URL | (未设置) | 邮件中继地址，未设置则只记录日志 |
/// | EMAIL_FROM | noreply@cafe.local | 发件人地址 |
/// | BUS_CAPACITY | 1024 | 事件广播通道容量 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/cafe HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志和静态文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 前端地址 (CORS 白名单和邮件里的链接)
    pub client_url: String,
    /// 邮件中继地址 (POST JSON)，未配置时邮件只写日志
    pub email_relay_url: Option<String>,
    /// 发件人地址
    pub email_from: String,
    /// 事件广播通道容量
    pub bus_capacity: usize,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cafe".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            client_url: std::env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            email_relay_url: std::env::var("EMAIL_RELAY_URL").ok().filter(|s| !s.is_empty()),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@cafe.local".into()),
            bus_capacity: std::env::var("BUS_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        std::fs::create_dir_all(self.public_dir())?;
        Ok(())
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 静态文件目录 (work_dir/public)
    pub fn public_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("public")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
