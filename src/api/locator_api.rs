// ==========================================
// 零件定位系统 - 零件定位 API
// ==========================================
// 职责: 校验请求 → 调用定位引擎 → 组装响应
// 响应字段名与前端约定保持一致（repuesto / taller_origen / talleres）
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::validator::{validate_locator_query, LocatorQuery};
use crate::domain::{Part, Workshop};
use crate::engine::{LocatorResult, StockCandidate, StockLocator};
use crate::services::phone::to_e164_digits;

// ==========================================
// 响应 DTO
// ==========================================

/// 零件信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInfo {
    #[serde(rename = "numero_pieza")]
    pub part_number: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<Part> for PartInfo {
    fn from(part: Part) -> Self {
        Self {
            part_number: part.part_number,
            description: part.description,
        }
    }
}

/// 起始车间信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginInfo {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<&Workshop> for OriginInfo {
    fn from(w: &Workshop) -> Self {
        Self {
            id: w.id,
            name: w.name.clone(),
            lat: w.latitude(),
            lng: w.longitude(),
        }
    }
}

/// 有库存的候选车间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "telefono_e164")]
    pub phone_e164: Option<String>,
    #[serde(rename = "stock_total")]
    pub total_stock: i64,
    #[serde(rename = "distancia_km")]
    pub distance_km: Option<f64>,
}

impl CandidateInfo {
    fn from_candidate(candidate: StockCandidate, country_code: &str) -> Self {
        let StockCandidate {
            workshop,
            total_stock,
            distance_km,
        } = candidate;

        Self {
            id: workshop.id,
            lat: workshop.latitude(),
            lng: workshop.longitude(),
            phone_e164: to_e164_digits(&workshop.phone, country_code),
            name: workshop.name,
            address: workshop.address,
            email: workshop.email,
            phone: workshop.phone,
            total_stock,
            distance_km,
        }
    }
}

/// 定位响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorResponse {
    #[serde(rename = "repuesto")]
    pub part: Option<PartInfo>,
    #[serde(rename = "taller_origen")]
    pub origin: OriginInfo,
    #[serde(rename = "talleres")]
    pub workshops: Vec<CandidateInfo>,
}

impl LocatorResponse {
    fn from_result(result: LocatorResult, country_code: &str) -> Self {
        Self {
            origin: OriginInfo::from(&result.origin),
            part: result.part.map(PartInfo::from),
            workshops: result
                .candidates
                .into_iter()
                .map(|c| CandidateInfo::from_candidate(c, country_code))
                .collect(),
        }
    }
}

// ==========================================
// LocatorApi - 零件定位 API
// ==========================================

/// 零件定位API
///
/// 职责：
/// 1. 请求校验（零件号、起始车间 id）
/// 2. 调用 StockLocator 计算可达车间与库存
/// 3. 组装响应（含 E.164 电话）
pub struct LocatorApi {
    locator: StockLocator,
    country_code: String,
}

impl LocatorApi {
    pub fn new(locator: StockLocator, country_code: impl Into<String>) -> Self {
        Self {
            locator,
            country_code: country_code.into(),
        }
    }

    /// 查找持有零件库存的车间
    ///
    /// # 返回
    /// - Ok(LocatorResponse): 成功（零件不存在时 repuesto 为 null、talleres 为空）
    /// - Err(ApiError::InvalidInput): 参数缺失或格式错误
    /// - Err(ApiError::NotFound): 起始车间不存在
    pub fn locate(&self, query: &LocatorQuery) -> ApiResult<LocatorResponse> {
        let validated = validate_locator_query(query)?;

        let result = self
            .locator
            .locate(&validated.part_number, validated.origin_workshop_id)?;

        tracing::info!(
            part_number = %validated.part_number,
            origin = validated.origin_workshop_id,
            found = result.part.is_some(),
            candidates = result.candidates.len(),
            "零件定位请求完成"
        );

        Ok(LocatorResponse::from_result(result, &self.country_code))
    }
}
