use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

// -- 请求级错误类型
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorMessage {
    MalformedIdentifier,
    MalformedBody,
    NoMatchingDocument,
    EmptyUpdatePayload,
    StoreUnavailableOrTimedOut,
    SerializationFailure,
}

impl ErrorMessage {
    fn to_str(self) -> &'static str {
        match self {
            ErrorMessage::MalformedIdentifier => "Invalid user ID format",
            ErrorMessage::MalformedBody => "Invalid JSON data",
            ErrorMessage::NoMatchingDocument => "User not found",
            ErrorMessage::EmptyUpdatePayload => "No valid fields to update",
            ErrorMessage::StoreUnavailableOrTimedOut => "Database is unavailable or timed out",
            ErrorMessage::SerializationFailure => "Failed to encode or decode user document",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::NOT_FOUND)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::SERVICE_UNAVAILABLE)
    }

    pub fn into_http_response(self) -> Response {
        let json_response = Json(ErrorResponse {
            status: "fail".to_string(),
            message: self.message.clone(),
        });

        (self.status, json_response).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
