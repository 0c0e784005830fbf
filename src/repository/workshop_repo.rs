// ==========================================
// 零件定位系统 - 车间数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Coordinates, Workshop};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::readers::WorkshopReader;
use crate::repository::{in_placeholders, MAX_IN_PARAMS};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

const WORKSHOP_COLUMNS: &str =
    "id, nombre, direccion, telefono, email, latitud, longitud, fecha_creacion";

/// 车间联系信息更新（None 表示该列不变）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkshopContactUpdate {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl WorkshopContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.phone.is_none() && self.coordinates.is_none()
    }
}

// ==========================================
// WorkshopRepository - 车间仓储
// ==========================================
/// 车间仓储
/// 职责: taller 表的读取与联系信息更新
pub struct WorkshopRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkshopRepository {
    /// 创建新的 WorkshopRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Workshop)): 找到车间
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_id(&self, workshop_id: i64) -> RepositoryResult<Option<Workshop>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM taller WHERE id = ?1", WORKSHOP_COLUMNS);
        let workshop = conn
            .query_row(&sql, params![workshop_id], map_workshop_row)
            .optional()?;
        Ok(workshop)
    }

    /// 批量查询（按 id 升序）
    pub fn find_by_ids(&self, workshop_ids: &BTreeSet<i64>) -> RepositoryResult<Vec<Workshop>> {
        if workshop_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let workshop_ids: Vec<i64> = workshop_ids.iter().copied().collect();
        let mut workshops = Vec::with_capacity(workshop_ids.len());
        // 分批按 id 升序读取，拼接后仍保持升序
        for chunk in workshop_ids.chunks(MAX_IN_PARAMS) {
            let sql = format!(
                "SELECT {} FROM taller WHERE id IN ({}) ORDER BY id ASC",
                WORKSHOP_COLUMNS,
                in_placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), map_workshop_row)?;
            for workshop in rows {
                workshops.push(workshop?);
            }
        }
        Ok(workshops)
    }

    /// 更新联系信息，只写入有变化的列
    ///
    /// 坐标总是成对写入。
    ///
    /// # 返回
    /// - Ok(usize): 受影响行数（0 表示车间不存在或无需更新）
    pub fn update_contact(
        &self,
        workshop_id: i64,
        update: &WorkshopContactUpdate,
    ) -> RepositoryResult<usize> {
        if update.is_empty() {
            return Ok(0);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(address) = &update.address {
            assignments.push("direccion = ?");
            values.push(address.clone().into());
        }
        if let Some(phone) = &update.phone {
            assignments.push("telefono = ?");
            values.push(phone.clone().into());
        }
        if let Some(coords) = update.coordinates {
            assignments.push("latitud = ?");
            values.push(coords.latitude.into());
            assignments.push("longitud = ?");
            values.push(coords.longitude.into());
        }
        values.push(workshop_id.into());

        let sql = format!("UPDATE taller SET {} WHERE id = ?", assignments.join(", "));
        let conn = self.get_conn()?;
        let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(affected)
    }
}

impl WorkshopReader for WorkshopRepository {
    fn get_workshop(&self, workshop_id: i64) -> RepositoryResult<Option<Workshop>> {
        self.find_by_id(workshop_id)
    }

    fn get_workshops(&self, workshop_ids: &BTreeSet<i64>) -> RepositoryResult<Vec<Workshop>> {
        self.find_by_ids(workshop_ids)
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn map_workshop_row(row: &Row<'_>) -> rusqlite::Result<Workshop> {
    let created_raw: String = row.get(7)?;
    let created_at = parse_timestamp(&created_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Text,
            format!("无效的时间戳: {}", created_raw).into(),
        )
    })?;

    Ok(Workshop {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        email: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        coordinates: Coordinates::from_columns(row.get(5)?, row.get(6)?),
        created_at,
    })
}

/// 解析 RFC3339 或 SQLite datetime('now') 格式的时间戳
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
