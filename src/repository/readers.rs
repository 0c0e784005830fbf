// ==========================================
// 零件定位系统 - 定位核心读取接口
// ==========================================
// 职责: 定义定位引擎依赖的只读数据接口（不包含实现）
// 实现者: 本模块下的 rusqlite 仓储；测试中可替换为内存实现
// 红线: 只读，不含业务规则
// ==========================================

use std::collections::BTreeSet;

use crate::domain::{GroupNode, Part, Workshop, WorkshopStock};
use crate::repository::error::RepositoryResult;

/// 分组读取
pub trait GroupReader: Send + Sync {
    /// 列出全部分组的 (id, parent_id)
    fn list_groups(&self) -> RepositoryResult<Vec<GroupNode>>;
}

/// 分组成员关系读取
pub trait MembershipReader: Send + Sync {
    /// 车间直接所属的分组
    fn groups_of_workshop(&self, workshop_id: i64) -> RepositoryResult<BTreeSet<i64>>;

    /// 属于任一给定分组的车间（空集合返回空集合）
    fn workshops_of_groups(&self, group_ids: &BTreeSet<i64>) -> RepositoryResult<BTreeSet<i64>>;
}

/// 车间读取
pub trait WorkshopReader: Send + Sync {
    fn get_workshop(&self, workshop_id: i64) -> RepositoryResult<Option<Workshop>>;

    /// 批量读取；不存在的 id 被忽略
    fn get_workshops(&self, workshop_ids: &BTreeSet<i64>) -> RepositoryResult<Vec<Workshop>>;
}

/// 零件读取
pub trait PartReader: Send + Sync {
    fn get_part_by_number(&self, part_number: &str) -> RepositoryResult<Option<Part>>;
}

/// 库存读取
pub trait StockReader: Send + Sync {
    /// 零件在允许车间内的库存汇总
    ///
    /// # 约束
    /// - 只累计属于该车间自己的仓库中的数量
    /// - 只返回汇总数量 > 0 的车间
    fn stock_for_part(
        &self,
        part_id: i64,
        allowed_workshop_ids: &BTreeSet<i64>,
    ) -> RepositoryResult<Vec<WorkshopStock>>;
}
