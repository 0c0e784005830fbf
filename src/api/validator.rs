// ==========================================
// 零件定位系统 - 请求校验器
// ==========================================
// 职责: 定位请求参数校验（零件号非空、车间 id 为整数）
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};

/// 原始定位请求（查询字符串原样）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorQuery {
    pub numero_pieza: Option<String>,
    pub taller_id: Option<String>,
}

impl LocatorQuery {
    pub fn new(part_number: impl Into<String>, workshop_id: impl ToString) -> Self {
        Self {
            numero_pieza: Some(part_number.into()),
            taller_id: Some(workshop_id.to_string()),
        }
    }
}

/// 校验通过的定位请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLocatorQuery {
    pub part_number: String,
    pub origin_workshop_id: i64,
}

/// 校验定位请求
///
/// # 规则
/// - 零件号去除首尾空白后不能为空
/// - 车间 id 必须存在且可解析为整数
pub fn validate_locator_query(query: &LocatorQuery) -> ApiResult<ValidatedLocatorQuery> {
    let part_number = query
        .numero_pieza
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if part_number.is_empty() {
        return Err(ApiError::InvalidInput("numero_pieza es requerido".to_string()));
    }

    let raw_id = query
        .taller_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if raw_id.is_empty() {
        return Err(ApiError::InvalidInput("taller_id es requerido".to_string()));
    }

    let origin_workshop_id = parse_workshop_id(raw_id)?;

    Ok(ValidatedLocatorQuery {
        part_number: part_number.to_string(),
        origin_workshop_id,
    })
}

/// 解析车间 id
pub fn parse_workshop_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidInput("taller_id inválido".to_string()))
}
