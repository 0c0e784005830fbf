// ==========================================
// 零件定位系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合定位引擎所需的全部只读接口
// 目标: 引擎只依赖 trait，测试时可整体替换为内存实现
// ==========================================

use std::sync::Arc;

use crate::repository::{
    GroupReader, GroupRepository, MembershipReader, PartReader, PartRepository, StockReader,
    StockRepository, WorkshopReader, WorkshopRepository,
};

/// 定位引擎仓储集合
///
/// # 包含的接口
/// - `groups`: 分组列表（构建层级索引）
/// - `memberships`: 分组 ↔ 车间成员关系
/// - `workshops`: 车间读取
/// - `parts`: 零件目录
/// - `stock`: 库存汇总
#[derive(Clone)]
pub struct LocatorRepositories {
    pub groups: Arc<dyn GroupReader>,
    pub memberships: Arc<dyn MembershipReader>,
    pub workshops: Arc<dyn WorkshopReader>,
    pub parts: Arc<dyn PartReader>,
    pub stock: Arc<dyn StockReader>,
}

impl LocatorRepositories {
    /// 创建新的仓储集合
    pub fn new(
        groups: Arc<dyn GroupReader>,
        memberships: Arc<dyn MembershipReader>,
        workshops: Arc<dyn WorkshopReader>,
        parts: Arc<dyn PartReader>,
        stock: Arc<dyn StockReader>,
    ) -> Self {
        Self {
            groups,
            memberships,
            workshops,
            parts,
            stock,
        }
    }

    /// 由 rusqlite 仓储组装（分组仓储同时提供成员关系）
    pub fn from_sqlite(
        group_repo: Arc<GroupRepository>,
        workshop_repo: Arc<WorkshopRepository>,
        part_repo: Arc<PartRepository>,
        stock_repo: Arc<StockRepository>,
    ) -> Self {
        Self {
            groups: group_repo.clone(),
            memberships: group_repo,
            workshops: workshop_repo,
            parts: part_repo,
            stock: stock_repo,
        }
    }
}
