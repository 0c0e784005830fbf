// ==========================================
// 零件定位系统 - 库存汇总仓储
// ==========================================
// 红线: 只累计与 repuesto_taller 同一车间的仓库数量，
//       防止仓库归属错配时把别的车间的库存算进来
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::WorkshopStock;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::readers::StockReader;
use crate::repository::{in_placeholders, MAX_IN_PARAMS};
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// 库存仓储
/// 职责: repuesto_taller / stock_por_deposito / deposito 的汇总查询
pub struct StockRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StockRepository {
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

    /// 查询零件在允许车间内的库存汇总（只返回 > 0 的车间，按车间 id 升序）
    pub fn sum_stock_by_workshop(
        &self,
        part_id: i64,
        allowed_workshop_ids: &BTreeSet<i64>,
    ) -> RepositoryResult<Vec<WorkshopStock>> {
        if allowed_workshop_ids.is_empty() {
            return Ok(Vec::new());
        }

        let workshop_ids: Vec<i64> = allowed_workshop_ids.iter().copied().collect();
        let conn = self.get_conn()?;
        let mut rows = Vec::new();
        // 每批内按车间 id 升序，分批结果拼接后仍保持升序
        for chunk in workshop_ids.chunks(MAX_IN_PARAMS) {
            let sql = format!(
                r#"
                SELECT
                    rt.taller_id,
                    COALESCE(SUM(CASE WHEN d.taller_id = rt.taller_id THEN spd.cantidad END), 0) AS stock_total
                FROM repuesto_taller rt
                LEFT JOIN stock_por_deposito spd ON spd.repuesto_taller_id = rt.id
                LEFT JOIN deposito d ON d.id = spd.deposito_id
                WHERE rt.repuesto_id = ? AND rt.taller_id IN ({})
                GROUP BY rt.taller_id
                HAVING stock_total > 0
                ORDER BY rt.taller_id ASC
                "#,
                in_placeholders(chunk.len())
            );

            let mut values: Vec<i64> = Vec::with_capacity(chunk.len() + 1);
            values.push(part_id);
            values.extend_from_slice(chunk);

            let mut stmt = conn.prepare(&sql)?;
            let chunk_rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                Ok(WorkshopStock {
                    workshop_id: row.get(0)?,
                    total_quantity: row.get(1)?,
                })
            })?;
            for stock in chunk_rows {
                rows.push(stock?);
            }
        }

        tracing::debug!(part_id, workshops = rows.len(), "库存汇总完成");
        Ok(rows)
    }
}

impl StockReader for StockRepository {
    fn stock_for_part(
        &self,
        part_id: i64,
        allowed_workshop_ids: &BTreeSet<i64>,
    ) -> RepositoryResult<Vec<WorkshopStock>> {
        self.sum_stock_by_workshop(part_id, allowed_workshop_ids)
    }
}
