// ==========================================
// 零件定位系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 层调用
// ==========================================

pub mod error;
pub mod locator_api;
pub mod validator;
pub mod workshop_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use locator_api::{CandidateInfo, LocatorApi, LocatorResponse, OriginInfo, PartInfo};
pub use validator::{parse_workshop_id, validate_locator_query, LocatorQuery, ValidatedLocatorQuery};
pub use workshop_api::{ContactUpdateRequest, WorkshopApi, WorkshopInfo};
