// ==========================================
// 零件定位系统 - 分组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（层级闭包在 engine 层计算）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Group, GroupNode};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::readers::{GroupReader, MembershipReader};
use crate::repository::{in_placeholders, MAX_IN_PARAMS};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// ==========================================
// GroupRepository - 分组与成员关系仓储
// ==========================================
/// 分组仓储
/// 职责: grupo / grupo_taller 表的读取
pub struct GroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GroupRepository {
    /// 创建新的 GroupRepository 实例
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

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部分组（含名称与描述）
    pub fn list_all(&self) -> RepositoryResult<Vec<Group>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id_grupo, nombre, descripcion, grupo_padre_id
            FROM grupo
            ORDER BY id_grupo ASC
            "#,
        )?;

        let groups = stmt
            .query_map([], |row| {
                Ok(Group {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    parent_id: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    /// 查询全部分组的 (id, parent_id)，只读两列
    pub fn list_nodes(&self) -> RepositoryResult<Vec<GroupNode>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id_grupo, grupo_padre_id FROM grupo ORDER BY id_grupo ASC")?;
        let nodes = stmt
            .query_map([], |row| Ok(GroupNode::new(row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    /// 车间直接所属的分组
    pub fn find_group_ids_by_workshop(&self, workshop_id: i64) -> RepositoryResult<BTreeSet<i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id_grupo FROM grupo_taller WHERE id_taller = ?1")?;
        let ids = stmt
            .query_map(params![workshop_id], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(ids)
    }

    /// 属于任一给定分组的车间
    pub fn find_workshop_ids_by_groups(
        &self,
        group_ids: &BTreeSet<i64>,
    ) -> RepositoryResult<BTreeSet<i64>> {
        if group_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let conn = self.get_conn()?;
        let group_ids: Vec<i64> = group_ids.iter().copied().collect();
        let mut ids = BTreeSet::new();
        for chunk in group_ids.chunks(MAX_IN_PARAMS) {
            let sql = format!(
                "SELECT DISTINCT id_taller FROM grupo_taller WHERE id_grupo IN ({})",
                in_placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, i64>(0))?;
            for id in rows {
                ids.insert(id?);
            }
        }
        Ok(ids)
    }
}

impl GroupReader for GroupRepository {
    fn list_groups(&self) -> RepositoryResult<Vec<GroupNode>> {
        self.list_nodes()
    }
}

impl MembershipReader for GroupRepository {
    fn groups_of_workshop(&self, workshop_id: i64) -> RepositoryResult<BTreeSet<i64>> {
        self.find_group_ids_by_workshop(workshop_id)
    }

    fn workshops_of_groups(&self, group_ids: &BTreeSet<i64>) -> RepositoryResult<BTreeSet<i64>> {
        self.find_workshop_ids_by_groups(group_ids)
    }
}
