// ==========================================
// 零件定位系统 - 辅助服务
// ==========================================
// 职责: 电话号码规范化、地址地理编码（外部服务）
// ==========================================

pub mod geocoding;
pub mod phone;

pub use geocoding::{Geocoder, GeocodingError, NominatimGeocoder};
pub use phone::{normalize_local_phone, to_e164_digits, DEFAULT_COUNTRY_CODE};
