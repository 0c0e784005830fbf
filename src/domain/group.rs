// ==========================================
// 零件定位系统 - 分组领域模型
// ==========================================
// 职责: 组织分组（森林结构，单父节点）
// 对齐: grupo / grupo_taller 表
// ==========================================

use serde::{Deserialize, Serialize};

/// 组织分组
///
/// 每个分组最多一个父分组；无父分组即为根。
/// 无环由数据维护方保证，核心不做校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<i64>,
}

/// 层级索引节点（只保留 id 与父引用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: i64,
    pub parent_id: Option<i64>,
}

impl GroupNode {
    pub fn new(id: i64, parent_id: Option<i64>) -> Self {
        Self { id, parent_id }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl From<&Group> for GroupNode {
    fn from(group: &Group) -> Self {
        Self::new(group.id, group.parent_id)
    }
}
