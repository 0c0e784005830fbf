// ==========================================
// 零件定位系统 - 库存定位引擎
// ==========================================
// 流程:
// 起始车间 → 零件 → 分组成员 → 层级闭包 → 允许车间
//          → 库存汇总（>0）→ 距离 → 排序
// ==========================================
// 红线: Engine 不拼 SQL；无状态，每次请求重建层级索引
// ==========================================

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::instrument;

use crate::domain::{Part, Workshop};
use crate::engine::distance::distance_km;
use crate::engine::hierarchy::GroupHierarchyIndex;
use crate::engine::ranking::{rank_candidates, DistanceRanked};
use crate::engine::repositories::LocatorRepositories;
use crate::repository::{RepositoryError, RepositoryResult};

/// 定位引擎错误
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("起始车间不存在: workshop_id={0}")]
    OriginNotFound(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ==========================================
// 定位结果
// ==========================================

/// 有库存的候选车间
#[derive(Debug, Clone, PartialEq)]
pub struct StockCandidate {
    pub workshop: Workshop,
    pub total_stock: i64,
    pub distance_km: Option<f64>,
}

impl DistanceRanked for StockCandidate {
    fn distance_km(&self) -> Option<f64> {
        self.distance_km
    }

    fn name(&self) -> &str {
        &self.workshop.name
    }

    fn id(&self) -> i64 {
        self.workshop.id
    }
}

/// 定位结果
///
/// `part == None` 表示零件不在目录中（不是错误），此时候选列表为空。
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorResult {
    pub origin: Workshop,
    pub part: Option<Part>,
    pub candidates: Vec<StockCandidate>,
}

// ==========================================
// StockLocator - 库存定位引擎
// ==========================================
pub struct StockLocator {
    repos: LocatorRepositories,
}

impl StockLocator {
    pub fn new(repos: LocatorRepositories) -> Self {
        Self { repos }
    }

    /// 查找持有零件库存的可达车间，按距离排序
    ///
    /// # 参数
    /// - `part_number`: 零件号（调用方已去除首尾空白）
    /// - `origin_id`: 起始车间 id
    ///
    /// # 返回
    /// - Ok(LocatorResult): 成功（零件不存在时 part 为 None）
    /// - Err(LocatorError::OriginNotFound): 起始车间不存在
    /// - Err(LocatorError::Repository): 数据读取失败（原样上抛，不重试）
    #[instrument(skip(self))]
    pub fn locate(&self, part_number: &str, origin_id: i64) -> Result<LocatorResult, LocatorError> {
        let origin = self
            .repos
            .workshops
            .get_workshop(origin_id)?
            .ok_or(LocatorError::OriginNotFound(origin_id))?;

        let part = match self.repos.parts.get_part_by_number(part_number)? {
            Some(part) => part,
            None => {
                tracing::info!(part_number, "零件不在目录中");
                return Ok(LocatorResult {
                    origin,
                    part: None,
                    candidates: Vec::new(),
                });
            }
        };

        let allowed = self.allowed_workshops(origin.id)?;
        let stock = self.repos.stock.stock_for_part(part.id, &allowed)?;

        let stock_ids: BTreeSet<i64> = stock.iter().map(|s| s.workshop_id).collect();
        let workshops: HashMap<i64, Workshop> = self
            .repos
            .workshops
            .get_workshops(&stock_ids)?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        let mut candidates: Vec<StockCandidate> = stock
            .into_iter()
            .filter(|s| s.total_quantity > 0 && allowed.contains(&s.workshop_id))
            .filter_map(|s| {
                let workshop = workshops.get(&s.workshop_id)?.clone();
                let distance = distance_km(origin.coordinates, workshop.coordinates);
                Some(StockCandidate {
                    workshop,
                    total_stock: s.total_quantity,
                    distance_km: distance,
                })
            })
            .collect();

        rank_candidates(&mut candidates);

        tracing::debug!(
            allowed = allowed.len(),
            candidates = candidates.len(),
            "库存定位完成"
        );

        Ok(LocatorResult {
            origin,
            part: Some(part),
            candidates,
        })
    }

    /// 起始车间可见的车间集合（恒包含起始车间自身）
    ///
    /// 没有分组成员关系时只返回起始车间，不计算闭包。
    pub fn allowed_workshops(&self, origin_id: i64) -> RepositoryResult<BTreeSet<i64>> {
        let seeds = self.repos.memberships.groups_of_workshop(origin_id)?;

        let mut allowed = if seeds.is_empty() {
            BTreeSet::new()
        } else {
            let index = GroupHierarchyIndex::build(self.repos.groups.list_groups()?);
            let reachable = index.reachable_closure(seeds);
            self.repos.memberships.workshops_of_groups(&reachable)?
        };

        allowed.insert(origin_id);
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, GroupNode, WorkshopStock};
    use crate::repository::{GroupReader, MembershipReader, PartReader, StockReader, WorkshopReader};
    use chrono::Utc;
    use std::sync::Arc;

    // ==========================================
    // 内存实现
    // ==========================================

    #[derive(Default)]
    struct MemoryStore {
        groups: Vec<GroupNode>,
        memberships: Vec<(i64, i64)>, // (group_id, workshop_id)
        workshops: Vec<Workshop>,
        parts: Vec<Part>,
        stock: Vec<(i64, i64, i64)>, // (part_id, workshop_id, qty)
    }

    impl GroupReader for MemoryStore {
        fn list_groups(&self) -> RepositoryResult<Vec<GroupNode>> {
            Ok(self.groups.clone())
        }
    }

    impl MembershipReader for MemoryStore {
        fn groups_of_workshop(&self, workshop_id: i64) -> RepositoryResult<BTreeSet<i64>> {
            Ok(self
                .memberships
                .iter()
                .filter(|(_, w)| *w == workshop_id)
                .map(|(g, _)| *g)
                .collect())
        }

        fn workshops_of_groups(&self, group_ids: &BTreeSet<i64>) -> RepositoryResult<BTreeSet<i64>> {
            Ok(self
                .memberships
                .iter()
                .filter(|(g, _)| group_ids.contains(g))
                .map(|(_, w)| *w)
                .collect())
        }
    }

    impl WorkshopReader for MemoryStore {
        fn get_workshop(&self, workshop_id: i64) -> RepositoryResult<Option<Workshop>> {
            Ok(self.workshops.iter().find(|w| w.id == workshop_id).cloned())
        }

        fn get_workshops(&self, ids: &BTreeSet<i64>) -> RepositoryResult<Vec<Workshop>> {
            Ok(self
                .workshops
                .iter()
                .filter(|w| ids.contains(&w.id))
                .cloned()
                .collect())
        }
    }

    impl PartReader for MemoryStore {
        fn get_part_by_number(&self, part_number: &str) -> RepositoryResult<Option<Part>> {
            Ok(self
                .parts
                .iter()
                .find(|p| p.part_number == part_number)
                .cloned())
        }
    }

    impl StockReader for MemoryStore {
        fn stock_for_part(
            &self,
            part_id: i64,
            allowed: &BTreeSet<i64>,
        ) -> RepositoryResult<Vec<WorkshopStock>> {
            Ok(self
                .stock
                .iter()
                .filter(|(p, w, q)| *p == part_id && allowed.contains(w) && *q > 0)
                .map(|(_, w, q)| WorkshopStock {
                    workshop_id: *w,
                    total_quantity: *q,
                })
                .collect())
        }
    }

    fn workshop(id: i64, name: &str, coords: Option<(f64, f64)>) -> Workshop {
        Workshop {
            id,
            name: name.to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            coordinates: coords.map(|(lat, lon)| Coordinates::new(lat, lon)),
            created_at: Utc::now(),
        }
    }

    fn locator(store: MemoryStore) -> StockLocator {
        let store = Arc::new(store);
        StockLocator::new(LocatorRepositories::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        ))
    }

    /// 分组: R(1) -> {A(2), B(3)}, A -> A1(4)；另一棵树 X(10)
    /// 车间: 1@A1(起点), 2@A, 3@B, 4@X, 5 无分组
    fn sample_store() -> MemoryStore {
        MemoryStore {
            groups: vec![
                GroupNode::new(1, None),
                GroupNode::new(2, Some(1)),
                GroupNode::new(3, Some(1)),
                GroupNode::new(4, Some(2)),
                GroupNode::new(10, None),
            ],
            memberships: vec![(4, 1), (2, 2), (3, 3), (10, 4)],
            workshops: vec![
                workshop(1, "Taller Central", Some((-34.6083, -58.4097))),
                workshop(2, "Mecánica del Sur", Some((-34.9215, -57.9545))),
                workshop(3, "Garage Oeste", Some((-34.6532, -58.6218))),
                workshop(4, "Taller Lejano", Some((-31.4201, -64.1888))),
                workshop(5, "Sin Grupo", None),
            ],
            parts: vec![Part {
                id: 100,
                part_number: "A-12345".to_string(),
                description: Some("Bomba de agua".to_string()),
            }],
            stock: vec![(100, 1, 4), (100, 2, 2), (100, 3, 1), (100, 4, 9), (100, 5, 3)],
        }
    }

    #[test]
    fn test_locate_ranks_reachable_workshops_by_distance() {
        let result = locator(sample_store()).locate("A-12345", 1).unwrap();

        assert_eq!(result.part.as_ref().map(|p| p.id), Some(100));
        let ids: Vec<i64> = result.candidates.iter().map(|c| c.workshop.id).collect();
        // 起点自身 0km，Garage Oeste ~20km，Mecánica del Sur ~54km；4/5 不可达
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(result.candidates[0].distance_km, Some(0.0));
        assert!(result.candidates.iter().all(|c| c.total_stock > 0));
    }

    #[test]
    fn test_unknown_part_is_not_an_error() {
        let result = locator(sample_store()).locate("NO-EXISTE", 1).unwrap();
        assert!(result.part.is_none());
        assert!(result.candidates.is_empty());
        assert_eq!(result.origin.id, 1);
    }

    #[test]
    fn test_missing_origin() {
        let err = locator(sample_store()).locate("A-12345", 999).unwrap_err();
        assert!(matches!(err, LocatorError::OriginNotFound(999)));
    }

    #[test]
    fn test_origin_without_groups_only_sees_itself() {
        let store = sample_store();
        let loc = locator(store);
        assert_eq!(loc.allowed_workshops(5).unwrap(), BTreeSet::from([5]));

        let result = loc.locate("A-12345", 5).unwrap();
        let ids: Vec<i64> = result.candidates.iter().map(|c| c.workshop.id).collect();
        assert_eq!(ids, vec![5]);
        assert_eq!(result.candidates[0].distance_km, None);
    }

    #[test]
    fn test_allowed_workshops_follow_closure() {
        let loc = locator(sample_store());
        assert_eq!(loc.allowed_workshops(1).unwrap(), BTreeSet::from([1, 2, 3]));
        assert_eq!(loc.allowed_workshops(4).unwrap(), BTreeSet::from([4]));
    }
}
