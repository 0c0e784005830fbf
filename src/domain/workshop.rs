// ==========================================
// 零件定位系统 - 车间领域模型
// ==========================================
// 职责: 车间实体与地理坐标值对象
// 对齐: taller 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Coordinates - 地理坐标
// ==========================================
// 红线: 纬度/经度成对存在，缺一即视为未知
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,  // 纬度（度）
    pub longitude: f64, // 经度（度）
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 由可空的纬度/经度列构造坐标
    ///
    /// # 返回
    /// - Some(Coordinates): 两列都有值
    /// - None: 任一列为空（不做部分计算）
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(Self::new(lat, lon)),
            _ => None,
        }
    }
}

// ==========================================
// Workshop - 车间
// ==========================================
// 生命周期: 由外部管理流程维护，定位核心只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
}

impl Workshop {
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_require_both_columns() {
        assert_eq!(
            Coordinates::from_columns(Some(-34.6), Some(-58.4)),
            Some(Coordinates::new(-34.6, -58.4))
        );
        assert_eq!(Coordinates::from_columns(Some(-34.6), None), None);
        assert_eq!(Coordinates::from_columns(None, Some(-58.4)), None);
        assert_eq!(Coordinates::from_columns(None, None), None);
    }
}
