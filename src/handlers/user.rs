use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use mongodb::bson::oid::ObjectId;

use crate::{
    db::StoreError,
    dtos::{CreateUserDto, UpdateUserDto, UserDto},
    error::{ErrorMessage, HttpError},
    models::{parse_user_id, User},
    AppState,
};

pub fn user_handler() -> Router {
    Router::new()
        .route("/user", post(create_user))
        .route(
            "/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// -- 数据库错误对应的错误信息
fn store_error_message(err: &StoreError) -> ErrorMessage {
    match err {
        StoreError::Serialization(_) => ErrorMessage::SerializationFailure,
        StoreError::Timeout(_) | StoreError::Unavailable(_) => {
            ErrorMessage::StoreUnavailableOrTimedOut
        }
    }
}

// -- 解析路径中的 id；路径无法解码（如非 UTF-8）时同样视为格式错误
fn path_user_id(path: Result<Path<String>, PathRejection>) -> Option<ObjectId> {
    let Path(id) = path.ok()?;
    parse_user_id(&id)
}

/// 按 id 查询单个用户
///
/// # 返回
/// - `200` -- 用户信息
/// - `404` -- id 格式错误、用户不存在或数据库查询失败
pub async fn get_user(
    Extension(app_state): Extension<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, HttpError> {
    // -- id 格式不合法时直接返回，不访问数据库
    let user_id = path_user_id(path)
        .ok_or_else(|| HttpError::not_found(ErrorMessage::MalformedIdentifier.to_string()))?;

    let user = app_state
        .db_client
        .get_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "failed to fetch user");
            HttpError::not_found(ErrorMessage::NoMatchingDocument.to_string())
        })?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::NoMatchingDocument.to_string()))?;

    Ok(Json(UserDto::from(&user)))
}

/// 创建用户 -- 忽略客户端传入的 id，总是生成新的 ObjectId
///
/// # 返回
/// - `201` -- 新建的用户信息
/// - `400` -- 请求体不是合法的 JSON
/// - `500` -- 写入数据库失败
pub async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let body: CreateUserDto = serde_json::from_slice(&body)
        .map_err(|_| HttpError::bad_request(ErrorMessage::MalformedBody.to_string()))?;

    let user = User {
        id: ObjectId::new(),
        name: body.name,
        gender: body.gender,
        age: body.age,
    };

    app_state.db_client.save_user(&user).await.map_err(|e| {
        tracing::error!(error = %e, "failed to create user");
        HttpError::server_error(format!("Error creating user: {}", store_error_message(&e)))
    })?;

    tracing::info!(user_id = %user.id, "user created");

    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// 部分更新用户
///
/// 只有非空字符串和非零数字会被写入，`{"age": 0}` 不会修改年龄。
///
/// # 返回
/// - `200` -- 更新后的用户信息
/// - `400` -- id 格式错误、JSON 不合法或没有可更新的字段
/// - `404` -- 用户不存在
/// - `500` -- 更新或重新读取失败
pub async fn update_user(
    Extension(app_state): Extension<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let user_id = path_user_id(path)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::MalformedIdentifier.to_string()))?;

    let body: UpdateUserDto = serde_json::from_slice(&body)
        .map_err(|_| HttpError::bad_request(ErrorMessage::MalformedBody.to_string()))?;

    let fields = body.changed_fields();
    if fields.is_empty() {
        return Err(HttpError::bad_request(
            ErrorMessage::EmptyUpdatePayload.to_string(),
        ));
    }

    let matched = app_state
        .db_client
        .update_user(user_id, fields)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "failed to update user");
            HttpError::server_error(format!("Error updating user: {}", store_error_message(&e)))
        })?;

    if !matched {
        return Err(HttpError::not_found(
            ErrorMessage::NoMatchingDocument.to_string(),
        ));
    }

    // -- 重新读取更新后的文档
    let updated = app_state
        .db_client
        .get_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "failed to fetch updated user");
            HttpError::server_error(format!(
                "Error fetching updated user: {}",
                store_error_message(&e)
            ))
        })?
        .ok_or_else(|| {
            HttpError::server_error(format!(
                "Error fetching updated user: {}",
                ErrorMessage::NoMatchingDocument
            ))
        })?;

    Ok(Json(UserDto::from(&updated)))
}

/// 删除用户
///
/// # 返回
/// - `204` -- 删除成功
/// - `404` -- id 格式错误、用户不存在或数据库删除失败
pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let user_id = path_user_id(path)
        .ok_or_else(|| HttpError::not_found(ErrorMessage::MalformedIdentifier.to_string()))?;

    let deleted = app_state
        .db_client
        .delete_user(user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %user_id, error = %e, "failed to delete user");
            false
        });

    if !deleted {
        return Err(HttpError::not_found(
            ErrorMessage::NoMatchingDocument.to_string(),
        ));
    }

    tracing::info!("Deleted user with id {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
