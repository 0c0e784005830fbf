// ==========================================
// 零件定位系统 - HTTP 接口
// ==========================================
// 路由:
// - GET   /healthz
// - GET   /api/localizador?numero_pieza=..&taller_id=..
// - GET   /api/talleres/:id
// - PATCH /api/talleres/:id/contacto
// ==========================================

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::api::{parse_workshop_id, ApiError, ContactUpdateRequest, LocatorQuery};
use crate::app::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/localizador", get(locator_handler))
        .route("/api/talleres/:id", get(workshop_handler))
        .route(
            "/api/talleres/:id/contacto",
            axum::routing::patch(contact_handler),
        )
        .with_state(state)
}

// ==========================================
// 错误映射
// ==========================================

pub(crate) fn api_error_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = api_error_status(&self);
        if status.is_server_error() {
            tracing::error!(code = self.code(), "请求失败: {}", self);
        } else {
            tracing::debug!(code = self.code(), "请求被拒绝: {}", self);
        }
        let body = Json(json!({
            "detail": self.detail(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

// ==========================================
// 处理器
// ==========================================

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn locator_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocatorQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    // 仓储调用是阻塞的 SQLite 读取
    let response = tokio::task::spawn_blocking(move || state.locator_api.locate(&query))
        .await
        .map_err(|e| ApiError::InternalError(format!("定位任务异常: {}", e)))??;
    Ok((StatusCode::OK, Json(response)).into_response())
}

async fn workshop_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let workshop_id = parse_workshop_id(&raw_id)?;
    let info = tokio::task::spawn_blocking(move || state.workshop_api.get_workshop(workshop_id))
        .await
        .map_err(|e| ApiError::InternalError(format!("查询任务异常: {}", e)))??;
    Ok((StatusCode::OK, Json(info)).into_response())
}

async fn contact_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<ContactUpdateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let workshop_id = parse_workshop_id(&raw_id)?;
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let info = state.workshop_api.enrich_contact(workshop_id, request).await?;
    Ok((StatusCode::OK, Json(info)).into_response())
}
