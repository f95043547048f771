use std::time::Instant;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};

// -- 请求日志中间件，按状态码区分日志级别
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method: Method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status: StatusCode = response.status();
    let duration = start.elapsed();

    if status.is_server_error() {
        tracing::error!(
            target: "request",
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration = ?duration,
            "服务器错误"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            target: "request",
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration = ?duration,
            "客户端错误"
        );
    } else {
        tracing::info!(
            target: "request",
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration = ?duration,
            "请求完成"
        );
    }

    response
}
