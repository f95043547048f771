pub mod user;

use std::sync::Arc;

use axum::{response::IntoResponse, Extension, Json};

use crate::dtos::Response;
use crate::error::{ErrorMessage, HttpError};
use crate::AppState;

// -- 健康检查接口，确认数据库可以访问
pub async fn health_check(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.db_client.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "health check failed");
        HttpError::service_unavailable(ErrorMessage::StoreUnavailableOrTimedOut.to_string())
    })?;

    Ok(Json(Response {
        status: "success",
        message: format!("database {} is reachable", app_state.env.database_name),
    }))
}
