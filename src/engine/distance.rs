// ==========================================
// 零件定位系统 - 球面距离计算
// ==========================================
// 公式: haversine，地球半径 6371 km
// 输出: 公里，保留两位小数；任一端坐标未知 → None
// ==========================================

use crate::domain::Coordinates;

/// 地球平均半径（公里）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 两点间大圆距离（公里，未取整）
pub fn haversine_km(origin: Coordinates, target: Coordinates) -> f64 {
    let lat1 = origin.latitude.to_radians();
    let lat2 = target.latitude.to_radians();
    let dlat = (target.latitude - origin.latitude).to_radians();
    let dlon = (target.longitude - origin.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// 起点到候选车间的距离（公里，两位小数）
///
/// # 返回
/// - Some(km): 两端坐标都已知
/// - None: 任一端坐标未知
pub fn distance_km(origin: Option<Coordinates>, target: Option<Coordinates>) -> Option<f64> {
    match (origin, target) {
        (Some(o), Some(t)) => Some(round_2(haversine_km(o, t))),
        _ => None,
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caba() -> Coordinates {
        Coordinates::new(-34.6083, -58.4097)
    }

    fn la_plata() -> Coordinates {
        Coordinates::new(-34.9215, -57.9545)
    }

    #[test]
    fn test_reference_distance() {
        let d = distance_km(Some(caba()), Some(la_plata())).unwrap();
        assert!((d - 54.24).abs() < 0.01, "实际距离: {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let points = [
            caba(),
            la_plata(),
            Coordinates::new(-32.9575, -60.6394),
            Coordinates::new(51.5074, -0.1278),
            Coordinates::new(0.0, 179.9),
            Coordinates::new(0.0, -179.9),
        ];
        for a in points {
            for b in points {
                assert_eq!(distance_km(Some(a), Some(b)), distance_km(Some(b), Some(a)));
            }
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(Some(caba()), Some(caba())), Some(0.0));
    }

    #[test]
    fn test_unknown_coordinates() {
        assert_eq!(distance_km(None, Some(caba())), None);
        assert_eq!(distance_km(Some(caba()), None), None);
        assert_eq!(distance_km(None, None), None);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let d = distance_km(Some(caba()), Some(Coordinates::new(-32.9575, -60.6394))).unwrap();
        assert_eq!(d, (d * 100.0).round() / 100.0);
        assert!((d - 275.95).abs() < 0.01);
    }
}
