// ==========================================
// 零件定位系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod group;
pub mod part;
pub mod workshop;

// 重导出核心类型
pub use group::{Group, GroupNode};
pub use part::{Part, WorkshopStock};
pub use workshop::{Coordinates, Workshop};
