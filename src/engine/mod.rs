// ==========================================
// 零件定位系统 - 引擎层
// ==========================================
// 职责: 分组层级闭包、距离计算、候选排序、定位编排
// 红线: Engine 不拼 SQL
// ==========================================

pub mod distance;
pub mod hierarchy;
pub mod locator;
pub mod ranking;
pub mod repositories;

// 重导出核心引擎
pub use distance::{distance_km, haversine_km, EARTH_RADIUS_KM};
pub use hierarchy::GroupHierarchyIndex;
pub use locator::{LocatorError, LocatorResult, StockCandidate, StockLocator};
pub use ranking::{compare_candidates, rank_candidates, DistanceRanked};
pub use repositories::LocatorRepositories;
