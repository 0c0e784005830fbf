// ==========================================
// 零件定位系统 - 地址地理编码
// ==========================================
// 服务: Nominatim (OpenStreetMap) search 接口
// 约束: 只取第一条结果；失败不影响调用方主流程
// ==========================================

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocodingSettings;
use crate::domain::Coordinates;

/// 地理编码错误
#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("地理编码客户端初始化失败: {0}")]
    ClientBuild(String),

    #[error("地理编码请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("地理编码服务返回错误状态: {0}")]
    Status(u16),
}

// ==========================================
// Geocoder Trait
// ==========================================
// 实现者: NominatimGeocoder；测试中可替换
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// 地址 → 坐标
    ///
    /// # 返回
    /// - Ok(Some(Coordinates)): 找到坐标
    /// - Ok(None): 地址为空、无结果或结果格式不符
    /// - Err: 传输层/HTTP 状态错误
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError>;
}

// ==========================================
// NominatimGeocoder
// ==========================================
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocodingSettings) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GeocodingError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "0"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodingError::Status(response.status().as_u16()));
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("地理编码响应无法解析: address={}, error={}", address, e);
                return Ok(None);
            }
        };

        let coords = parse_first_place(&body);
        if coords.is_none() {
            tracing::info!("地理编码无结果: address={}", address);
        }
        Ok(coords)
    }
}

/// 解析 Nominatim 返回数组的第一条记录（lat/lon 可能是字符串或数字）
fn parse_first_place(body: &Value) -> Option<Coordinates> {
    let first = body.as_array()?.first()?;
    let lat = coordinate_field(first.get("lat")?)?;
    let lon = coordinate_field(first.get("lon")?)?;
    Some(Coordinates::new(lat, lon))
}

fn coordinate_field(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
