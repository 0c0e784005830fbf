// ==========================================
// 零件定位系统 - 演示数据
// ==========================================
// 用法: seed_locator_demo [db_path]
// 幂等: 按名称/零件号查找已有行，重复执行只刷新库存数量
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;

use parts_locator::config::get_default_db_path;
use parts_locator::db::{init_schema, open_sqlite_connection};

const MAIN_DEPOSIT: &str = "Depósito Principal";

struct DemoWorkshop {
    name: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
    phone: &'static str,
    email: &'static str,
    group: &'static str,
}

const PARTS: [(&str, &str); 2] = [("A-12345", "Bomba de agua"), ("B-67890", "Filtro de aceite")];

const WORKSHOPS: [DemoWorkshop; 4] = [
    DemoWorkshop {
        name: "Taller Central",
        address: "Av. Rivadavia 1234, CABA, Argentina",
        latitude: -34.6083,
        longitude: -58.4097,
        phone: "11 5555-1234",
        email: "central@talleres.com",
        group: "Área Metropolitana",
    },
    DemoWorkshop {
        name: "Mecánica del Sur",
        address: "Calle 50 742, La Plata, Buenos Aires, Argentina",
        latitude: -34.9215,
        longitude: -57.9545,
        phone: "221 444-7788",
        email: "contacto@mecanicadelsur.com",
        group: "Área Metropolitana",
    },
    DemoWorkshop {
        name: "Taller Norte",
        address: "Av. Sarmiento 3500, Rosario, Santa Fe, Argentina",
        latitude: -32.9575,
        longitude: -60.6394,
        phone: "341 555-6677",
        email: "ventas@tallernorte.com",
        group: "Interior",
    },
    DemoWorkshop {
        name: "Garage Oeste",
        address: "Av. San Martín 255, Morón, Buenos Aires, Argentina",
        latitude: -34.6532,
        longitude: -58.6218,
        phone: "11 4667-8899",
        email: "hola@garageoeste.com",
        group: "Área Metropolitana",
    },
];

// (车间, 零件号, 数量)
const STOCK: [(&str, &str, i64); 5] = [
    ("Taller Central", "A-12345", 4),
    ("Mecánica del Sur", "A-12345", 2),
    ("Taller Norte", "A-12345", 5),
    ("Garage Oeste", "A-12345", 1),
    ("Taller Central", "B-67890", 3),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    seed_demo(&conn)?;
    print_quick_counts(&conn)?;

    eprintln!("Demo data loaded into {}", db_path);
    Ok(())
}

fn seed_demo(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tx = conn.unchecked_transaction()?;

    // ===== 零件 =====
    for (part_number, description) in PARTS {
        tx.execute(
            "INSERT INTO repuesto (numero_pieza, descripcion) VALUES (?1, ?2)
             ON CONFLICT(numero_pieza) DO UPDATE SET descripcion = excluded.descripcion",
            params![part_number, description],
        )?;
    }

    // ===== 分组: Red Central -> {Área Metropolitana, Interior} =====
    let root_id = ensure_group(&tx, "Red Central", "Red principal de talleres", None)?;
    ensure_group(&tx, "Área Metropolitana", "Talleres de AMBA", Some(root_id))?;
    ensure_group(&tx, "Interior", "Talleres del interior", Some(root_id))?;

    // ===== 车间 + 成员关系 + 主仓库 =====
    for w in &WORKSHOPS {
        let workshop_id = ensure_workshop(&tx, w)?;
        let group_id = find_id(&tx, "SELECT id_grupo FROM grupo WHERE nombre = ?1", w.group)?
            .ok_or_else(|| format!("group not found: {}", w.group))?;
        tx.execute(
            "INSERT OR IGNORE INTO grupo_taller (id_grupo, id_taller) VALUES (?1, ?2)",
            params![group_id, workshop_id],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO deposito (taller_id, nombre) VALUES (?1, ?2)",
            params![workshop_id, MAIN_DEPOSIT],
        )?;
    }

    // ===== 库存 =====
    for (workshop_name, part_number, quantity) in STOCK {
        let workshop_id = find_id(&tx, "SELECT id FROM taller WHERE nombre = ?1", workshop_name)?
            .ok_or_else(|| format!("workshop not found: {}", workshop_name))?;
        let part_id = find_id(&tx, "SELECT id FROM repuesto WHERE numero_pieza = ?1", part_number)?
            .ok_or_else(|| format!("part not found: {}", part_number))?;

        tx.execute(
            "INSERT OR IGNORE INTO repuesto_taller (repuesto_id, taller_id) VALUES (?1, ?2)",
            params![part_id, workshop_id],
        )?;
        let catalog_id: i64 = tx.query_row(
            "SELECT id FROM repuesto_taller WHERE repuesto_id = ?1 AND taller_id = ?2",
            params![part_id, workshop_id],
            |row| row.get(0),
        )?;
        let deposit_id: i64 = tx.query_row(
            "SELECT id FROM deposito WHERE taller_id = ?1 AND nombre = ?2",
            params![workshop_id, MAIN_DEPOSIT],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO stock_por_deposito (repuesto_taller_id, deposito_id, cantidad) VALUES (?1, ?2, ?3)
             ON CONFLICT(repuesto_taller_id, deposito_id) DO UPDATE SET cantidad = excluded.cantidad",
            params![catalog_id, deposit_id, quantity],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn find_id(conn: &Connection, sql: &str, key: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(sql, params![key], |row| row.get(0)).optional()
}

fn ensure_group(
    conn: &Connection,
    name: &str,
    description: &str,
    parent_id: Option<i64>,
) -> rusqlite::Result<i64> {
    if let Some(id) = find_id(conn, "SELECT id_grupo FROM grupo WHERE nombre = ?1", name)? {
        conn.execute(
            "UPDATE grupo SET grupo_padre_id = ?1 WHERE id_grupo = ?2",
            params![parent_id, id],
        )?;
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO grupo (nombre, descripcion, grupo_padre_id) VALUES (?1, ?2, ?3)",
        params![name, description, parent_id],
    )?;
    Ok(conn.last_insert_rowid())
}

fn ensure_workshop(conn: &Connection, w: &DemoWorkshop) -> rusqlite::Result<i64> {
    if let Some(id) = find_id(conn, "SELECT id FROM taller WHERE nombre = ?1", w.name)? {
        conn.execute(
            "UPDATE taller SET direccion = ?1, telefono = ?2, email = ?3, latitud = ?4, longitud = ?5
             WHERE id = ?6",
            params![w.address, w.phone, w.email, w.latitude, w.longitude, id],
        )?;
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO taller (nombre, direccion, telefono, email, latitud, longitud)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![w.name, w.address, w.phone, w.email, w.latitude, w.longitude],
    )?;
    Ok(conn.last_insert_rowid())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tables = [
        "grupo",
        "grupo_taller",
        "taller",
        "deposito",
        "repuesto",
        "repuesto_taller",
        "stock_por_deposito",
    ];

    eprintln!("Row counts:");
    for t in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", t);
        let c: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        eprintln!("  {:<20} {}", t, c);
    }
    Ok(())
}
