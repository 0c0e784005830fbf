// ==========================================
// 零件定位系统 - 分组层级索引与可达闭包
// ==========================================
// 职责: 内存中的分组森林（邻接表），支持祖先/后代查询
// 闭包规则:
// 1. 上溯: 种子分组的全部祖先（到根为止）
// 2. 下探: 结果集中每个分组的全部后代
//    （不仅是种子的子树，也包括上溯引入的每个祖先的整棵子树）
// ==========================================
// 红线: 每次请求重建，不跨请求缓存
// ==========================================

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::instrument;

use crate::domain::GroupNode;

// ==========================================
// GroupHierarchyIndex - 分组层级索引
// ==========================================
/// 分组层级索引
///
/// 以整数 id 为键的邻接表：`nodes` 保存父引用，`children` 保存反向边。
/// 只读快照，数据变化后需要重建。
#[derive(Debug, Clone, Default)]
pub struct GroupHierarchyIndex {
    nodes: HashMap<i64, GroupNode>,
    children: HashMap<i64, Vec<i64>>,
}

impl GroupHierarchyIndex {
    /// 由全部分组构建索引（空输入得到空索引）
    pub fn build<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = GroupNode>,
    {
        let mut nodes = HashMap::new();
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();

        for node in groups {
            if let Some(parent_id) = node.parent_id {
                children.entry(parent_id).or_default().push(node.id);
            }
            nodes.insert(node.id, node);
        }

        // 子节点按 id 排序，遍历顺序稳定
        for list in children.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        Self { nodes, children }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, group_id: i64) -> Option<i64> {
        self.nodes.get(&group_id).and_then(|n| n.parent_id)
    }

    /// 直接子分组（按 id 升序）
    pub fn children_of(&self, group_id: i64) -> &[i64] {
        self.children
            .get(&group_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 祖先链（由近及远，不含自身）
    pub fn ancestors(&self, group_id: i64) -> Vec<i64> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::from([group_id]);
        let mut current = self.parent_of(group_id);

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            chain.push(parent_id);
            current = self.parent_of(parent_id);
        }
        chain
    }

    /// 全部后代（不含自身）
    pub fn descendants(&self, group_id: i64) -> BTreeSet<i64> {
        let mut result = BTreeSet::new();
        let mut queue = VecDeque::from([group_id]);

        while let Some(gid) = queue.pop_front() {
            for &child in self.children_of(gid) {
                if child != group_id && result.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        result
    }

    // ==========================================
    // 可达闭包
    // ==========================================

    /// 计算种子分组的可达闭包
    ///
    /// # 参数
    /// - `seeds`: 起始车间直接所属的分组
    ///
    /// # 返回
    /// - 种子 ∪ 全部祖先 ∪ 上述每个分组的全部后代
    ///
    /// # 说明
    /// - 空种子返回空集合
    /// - 索引中不存在的种子保留在结果中但不扩展
    /// - 结果恒为种子的超集，且对自身幂等
    #[instrument(skip(self, seeds), fields(groups = self.len()))]
    pub fn reachable_closure<I>(&self, seeds: I) -> BTreeSet<i64>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut result: BTreeSet<i64> = seeds.into_iter().collect();
        let seed_count = result.len();

        // ===== 上溯: 补齐祖先 =====
        let mut queue: VecDeque<i64> = result.iter().copied().collect();
        while let Some(gid) = queue.pop_front() {
            if let Some(parent_id) = self.parent_of(gid) {
                if result.insert(parent_id) {
                    queue.push_back(parent_id);
                }
            }
        }

        // ===== 下探: 从结果集中每个分组广度优先向下 =====
        let mut queue: VecDeque<i64> = result.iter().copied().collect();
        while let Some(gid) = queue.pop_front() {
            for &child in self.children_of(gid) {
                if result.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        tracing::debug!(seeds = seed_count, reachable = result.len(), "分组闭包计算完成");
        result
    }
}
