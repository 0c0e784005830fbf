// ==========================================
// 零件定位系统 - 应用层
// ==========================================
// 职责: 应用状态装配 + HTTP 接入
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::build_router;
pub use state::AppState;
