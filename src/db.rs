// ==========================================
// 零件定位系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 提供幂等的建表脚本（演示数据/测试/首次启动共用）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 只包含定位核心需要读取的列；车间/分组的管理流程不在本系统内。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS taller (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            direccion TEXT NOT NULL DEFAULT '',
            telefono TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            latitud REAL,
            longitud REAL,
            fecha_creacion TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS grupo (
            id_grupo INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            descripcion TEXT NOT NULL DEFAULT '',
            grupo_padre_id INTEGER REFERENCES grupo(id_grupo) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS grupo_taller (
            id_grupo_taller INTEGER PRIMARY KEY AUTOINCREMENT,
            id_grupo INTEGER NOT NULL REFERENCES grupo(id_grupo) ON DELETE CASCADE,
            id_taller INTEGER NOT NULL REFERENCES taller(id) ON DELETE CASCADE,
            UNIQUE(id_grupo, id_taller)
        );

        CREATE TABLE IF NOT EXISTS repuesto (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numero_pieza TEXT NOT NULL UNIQUE,
            descripcion TEXT
        );

        CREATE TABLE IF NOT EXISTS repuesto_taller (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            repuesto_id INTEGER NOT NULL REFERENCES repuesto(id) ON DELETE CASCADE,
            taller_id INTEGER NOT NULL REFERENCES taller(id) ON DELETE CASCADE,
            UNIQUE(repuesto_id, taller_id)
        );

        CREATE TABLE IF NOT EXISTS deposito (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            taller_id INTEGER NOT NULL REFERENCES taller(id) ON DELETE CASCADE,
            nombre TEXT NOT NULL,
            UNIQUE(taller_id, nombre)
        );

        CREATE TABLE IF NOT EXISTS stock_por_deposito (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            repuesto_taller_id INTEGER NOT NULL REFERENCES repuesto_taller(id) ON DELETE CASCADE,
            deposito_id INTEGER NOT NULL REFERENCES deposito(id) ON DELETE CASCADE,
            cantidad INTEGER NOT NULL DEFAULT 0,
            UNIQUE(repuesto_taller_id, deposito_id)
        );

        CREATE INDEX IF NOT EXISTS idx_grupo_taller_taller ON grupo_taller(id_taller);
        CREATE INDEX IF NOT EXISTS idx_repuesto_taller_taller ON repuesto_taller(taller_id);
        CREATE INDEX IF NOT EXISTS idx_stock_por_deposito_rt ON stock_por_deposito(repuesto_taller_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }
}
