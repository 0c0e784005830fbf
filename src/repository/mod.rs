// ==========================================
// 零件定位系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod group_repo;
pub mod part_repo;
pub mod readers;
pub mod stock_repo;
pub mod workshop_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use group_repo::GroupRepository;
pub use part_repo::PartRepository;
pub use readers::{GroupReader, MembershipReader, PartReader, StockReader, WorkshopReader};
pub use stock_repo::StockRepository;
pub use workshop_repo::{WorkshopContactUpdate, WorkshopRepository};

/// 单条 IN 查询的参数上限（远低于 SQLite 变量上限，大集合分批查询）
pub(crate) const MAX_IN_PARAMS: usize = 500;

/// 生成 `?, ?, ?` 形式的占位符
pub(crate) fn in_placeholders(count: usize) -> String {
    std::iter::repeat("?").take(count).collect::<Vec<_>>().join(", ")
}
