// ==========================================
// 零件定位系统 - 候选车间排序
// ==========================================
// 排序键:
// (a) 距离未知的排在所有已知距离之后
// (b) 已知距离按数值升序
// (c) 同距离（含全部未知）按名称升序，名称相同再按 id 升序
// ==========================================

use std::cmp::Ordering;

/// 可参与距离排序的候选
pub trait DistanceRanked {
    fn distance_km(&self) -> Option<f64>;
    fn name(&self) -> &str;
    fn id(&self) -> i64;
}

/// 两个候选的全序比较
pub fn compare_candidates<T: DistanceRanked>(a: &T, b: &T) -> Ordering {
    let by_distance = match (a.distance_km(), b.distance_km()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_distance
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// 原地稳定排序
pub fn rank_candidates<T: DistanceRanked>(candidates: &mut [T]) {
    candidates.sort_by(compare_candidates);
}
