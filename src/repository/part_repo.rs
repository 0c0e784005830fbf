// ==========================================
// 零件定位系统 - 零件目录仓储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::Part;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::readers::PartReader;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 零件仓储
/// 职责: repuesto 表的读取
pub struct PartRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按零件号精确查询
    pub fn find_by_number(&self, part_number: &str) -> RepositoryResult<Option<Part>> {
        let conn = self.get_conn()?;
        let part = conn
            .query_row(
                "SELECT id, numero_pieza, descripcion FROM repuesto WHERE numero_pieza = ?1",
                params![part_number],
                |row| {
                    Ok(Part {
                        id: row.get(0)?,
                        part_number: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(part)
    }
}

impl PartReader for PartRepository {
    fn get_part_by_number(&self, part_number: &str) -> RepositoryResult<Option<Part>> {
        self.find_by_number(part_number)
    }
}
