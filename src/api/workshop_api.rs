// ==========================================
// 零件定位系统 - 车间 API
// ==========================================
// 职责: 车间查询；联系信息补全（地址 → 坐标，电话规范化）
// 说明: 坐标由这里写入，供定位排序使用；车间的增删不在本系统内
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::Workshop;
use crate::repository::{WorkshopContactUpdate, WorkshopRepository};
use crate::services::geocoding::Geocoder;
use crate::services::phone::{normalize_local_phone, to_e164_digits};

// ==========================================
// DTO
// ==========================================

/// 车间信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopInfo {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "telefono_e164")]
    pub phone_e164: Option<String>,
    pub email: String,
    #[serde(rename = "latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud")]
    pub longitude: Option<f64>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

impl WorkshopInfo {
    fn from_workshop(w: Workshop, country_code: &str) -> Self {
        Self {
            latitude: w.latitude(),
            longitude: w.longitude(),
            phone_e164: to_e164_digits(&w.phone, country_code),
            id: w.id,
            name: w.name,
            address: w.address,
            phone: w.phone,
            email: w.email,
            created_at: w.created_at,
        }
    }
}

/// 联系信息更新请求（字段缺省表示不修改）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdateRequest {
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

// ==========================================
// WorkshopApi - 车间 API
// ==========================================
pub struct WorkshopApi {
    workshop_repo: Arc<WorkshopRepository>,
    geocoder: Arc<dyn Geocoder>,
    country_code: String,
}

impl WorkshopApi {
    pub fn new(
        workshop_repo: Arc<WorkshopRepository>,
        geocoder: Arc<dyn Geocoder>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            workshop_repo,
            geocoder,
            country_code: country_code.into(),
        }
    }

    /// 查询车间
    pub fn get_workshop(&self, workshop_id: i64) -> ApiResult<WorkshopInfo> {
        let workshop = self.load(workshop_id)?;
        Ok(WorkshopInfo::from_workshop(workshop, &self.country_code))
    }

    /// 补全车间联系信息
    ///
    /// # 规则
    /// - 地址: 去除首尾空白；非空时地理编码，成功则成对写入坐标
    /// - 地理编码失败只记录告警，坐标保持不变
    /// - 电话: 合并空白
    /// - 只写入有变化的列
    /// - 读写车间在阻塞线程池上执行，地理编码在当前任务上 await
    pub async fn enrich_contact(
        &self,
        workshop_id: i64,
        request: ContactUpdateRequest,
    ) -> ApiResult<WorkshopInfo> {
        let workshop = self
            .run_blocking(move |repo| load_workshop(repo, workshop_id))
            .await?;
        let mut update = WorkshopContactUpdate::default();

        if let Some(raw_address) = request.address {
            let address = raw_address.trim().to_string();
            if address != workshop.address {
                update.address = Some(address.clone());
            }

            if !address.is_empty() {
                match self.geocoder.geocode(&address).await {
                    Ok(Some(coords)) => {
                        if workshop.coordinates != Some(coords) {
                            update.coordinates = Some(coords);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            "地理编码失败，保留原坐标: workshop_id={}, address={}, error={}",
                            workshop_id,
                            address,
                            e
                        );
                    }
                }
            }
        }

        if let Some(raw_phone) = request.phone {
            let phone = normalize_local_phone(&raw_phone);
            if phone != workshop.phone {
                update.phone = Some(phone);
            }
        }

        if update.is_empty() {
            return Ok(WorkshopInfo::from_workshop(workshop, &self.country_code));
        }

        let updated = self
            .run_blocking(move |repo| {
                repo.update_contact(workshop_id, &update)?;
                Ok(update)
            })
            .await?;
        tracing::info!(
            workshop_id,
            address = updated.address.is_some(),
            phone = updated.phone.is_some(),
            coordinates = updated.coordinates.is_some(),
            "车间联系信息已更新"
        );

        let workshop = self
            .run_blocking(move |repo| load_workshop(repo, workshop_id))
            .await?;
        Ok(WorkshopInfo::from_workshop(workshop, &self.country_code))
    }

    fn load(&self, workshop_id: i64) -> ApiResult<Workshop> {
        load_workshop(&self.workshop_repo, workshop_id)
    }

    /// 在阻塞线程池上执行仓储操作（SQLite 调用会持有共享连接锁）
    async fn run_blocking<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&WorkshopRepository) -> ApiResult<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.workshop_repo);
        tokio::task::spawn_blocking(move || f(&repo))
            .await
            .map_err(|e| ApiError::InternalError(format!("仓储任务异常: {}", e)))?
    }
}

fn load_workshop(repo: &WorkshopRepository, workshop_id: i64) -> ApiResult<Workshop> {
    repo.find_by_id(workshop_id)?
        .ok_or_else(|| ApiError::NotFound("Taller no encontrado.".to_string()))
}
