// ==========================================
// 零件定位系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::services::phone::DEFAULT_COUNTRY_CODE;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const PHONE_DEFAULT_COUNTRY_CODE: &str = "phone.default_country_code";
    pub const GEOCODING_BASE_URL: &str = "geocoding.base_url";
    pub const GEOCODING_USER_AGENT: &str = "geocoding.user_agent";
    pub const GEOCODING_TIMEOUT_SECS: &str = "geocoding.timeout_secs";
}

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_GEOCODING_USER_AGENT: &str = "stockifai-backend/1.0";
pub const DEFAULT_GEOCODING_TIMEOUT_SECS: u64 = 10;

/// 地理编码服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            user_agent: DEFAULT_GEOCODING_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_GEOCODING_TIMEOUT_SECS,
        }
    }
}

/// 定位服务配置快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSettings {
    pub default_country_code: String,
    pub geocoding: GeocodingSettings,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            geocoding: GeocodingSettings::default(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取配置值，带默认值（空白值视为未配置）
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取定位服务配置快照
    ///
    /// 无法解析的数值配置回退到默认值并记录告警。
    pub fn locator_settings(&self) -> Result<LocatorSettings, Box<dyn Error>> {
        let timeout_raw = self.get_config_or_default(
            config_keys::GEOCODING_TIMEOUT_SECS,
            &DEFAULT_GEOCODING_TIMEOUT_SECS.to_string(),
        )?;
        let timeout_secs = match timeout_raw.parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(
                    "配置 {} 无效: {}，使用默认值 {}",
                    config_keys::GEOCODING_TIMEOUT_SECS,
                    timeout_raw,
                    DEFAULT_GEOCODING_TIMEOUT_SECS
                );
                DEFAULT_GEOCODING_TIMEOUT_SECS
            }
        };

        Ok(LocatorSettings {
            default_country_code: self.get_config_or_default(
                config_keys::PHONE_DEFAULT_COUNTRY_CODE,
                DEFAULT_COUNTRY_CODE,
            )?,
            geocoding: GeocodingSettings {
                base_url: self
                    .get_config_or_default(config_keys::GEOCODING_BASE_URL, DEFAULT_GEOCODING_BASE_URL)?,
                user_agent: self.get_config_or_default(
                    config_keys::GEOCODING_USER_AGENT,
                    DEFAULT_GEOCODING_USER_AGENT,
                )?,
                timeout_secs,
            },
        })
    }
}
