// ==========================================
// 零件定位系统 - 服务进程配置
// ==========================================
// 来源: 环境变量（启动时读取一次）
// - LOCATOR_DB_PATH    数据库路径
// - LOCATOR_BIND_ADDR  HTTP 监听地址
// - LOCATOR_LOG_FORMAT text | json
// ==========================================

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 服务进程配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            db_path: get_default_db_path(),
            bind_addr: env_non_empty("LOCATOR_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_format: env_non_empty("LOCATOR_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Text),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 默认数据库路径
///
/// 优先 LOCATOR_DB_PATH；否则放在用户数据目录下，目录不可用时回退到当前目录。
pub fn get_default_db_path() -> String {
    if let Some(path) = env_non_empty("LOCATOR_DB_PATH") {
        return path;
    }

    let mut path = PathBuf::from("./parts_locator.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("parts-locator");
        // 目录创建失败时继续使用当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("parts_locator.db");
        }
    }

    path.to_string_lossy().to_string()
}
