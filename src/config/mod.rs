// ==========================================
// 零件定位系统 - 配置层
// ==========================================
// 职责: 进程级配置（环境变量）+ 业务配置（config_kv 表）
// ==========================================

pub mod config_manager;
pub mod server_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager, GeocodingSettings, LocatorSettings};
pub use server_config::{get_default_db_path, LogFormat, ServerConfig};
