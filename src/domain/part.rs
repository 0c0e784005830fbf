// ==========================================
// 零件定位系统 - 零件与库存领域模型
// ==========================================
// 对齐: repuesto / repuesto_taller / deposito / stock_por_deposito 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 零件（按零件号唯一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub part_number: String,
    pub description: Option<String>,
}

/// 车间库存汇总
///
/// total_quantity 只累计该车间自己仓库下的数量，
/// 且进入结果集的记录必然 > 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopStock {
    pub workshop_id: i64,
    pub total_quantity: i64,
}
