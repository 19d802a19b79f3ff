//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 请求错误 | E0002 参数校验失败, E0004 请求体过大 |
//! | E1xxx | 作业数据错误 | E1002 HEX/Base64 格式错误 |
//! | E2xxx | 打印设备错误 | E2001 打印机不可用 |
//! | E9xxx | 系统错误 | E9001 内部错误 |
//!
//! 作业数据错误在获取任何打印资源之前检测；打印设备错误发生在握手中途，
//! 返回前已释放所有已获取的资源。两者都可以安全重试。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rawspool::PrintError;
use serde::Serialize;
use tracing::{error, warn};

/// 成功响应码
pub const SUCCESS_CODE: &str = "E0000";

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Printed OK",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    /// 请求参数校验失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 路由不存在 (404)
    NotFound(String),

    #[error(transparent)]
    /// 打印作业失败 (状态码取决于错误种类)
    Print(#[from] PrintError),

    #[error("Payload too large: {0}")]
    /// 请求体超过 MAX_BODY_BYTES (413)
    PayloadTooLarge(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP 状态码与错误码
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "E0004"),
            AppError::Print(err) => match err {
                PrintError::EmptyPayload => (StatusCode::BAD_REQUEST, "E1001"),
                PrintError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "E1002"),
                PrintError::DeviceUnavailable { .. } => (StatusCode::NOT_FOUND, "E2001"),
                PrintError::DocumentOpenFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "E2002")
                }
                PrintError::PageOpenFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "E2003"),
                PrintError::WriteFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "E2004"),
                PrintError::Catalog(_) | PrintError::Task(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "E9001")
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Print(err) if err.is_input_error() => {
                warn!(error = %err, "Rejected print payload");
                err.to_string()
            }
            AppError::Print(err) => {
                error!(error = %err, os_code = ?err.os_code(), "Print failed");
                err.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    ok_with_message(data, "Success")
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: SUCCESS_CODE.to_string(),
        message: message.into(),
        data: Some(data),
    })
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_status_mapping() {
        let cases = [
            (AppError::from(PrintError::EmptyPayload), StatusCode::BAD_REQUEST, "E1001"),
            (
                AppError::from(PrintError::MalformedInput("GG".into())),
                StatusCode::BAD_REQUEST,
                "E1002",
            ),
            (
                AppError::from(PrintError::DeviceUnavailable {
                    printer: "Nope".into(),
                    code: 1801,
                    message: "The printer name is invalid.".into(),
                }),
                StatusCode::NOT_FOUND,
                "E2001",
            ),
            (
                AppError::from(PrintError::WriteFailed {
                    written: 0,
                    expected: 4,
                    code: 5,
                    message: "Access is denied.".into(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
                "E2004",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn test_request_errors_status_mapping() {
        assert_eq!(
            AppError::validation("Missing printer or data").status_and_code(),
            (StatusCode::BAD_REQUEST, "E0002")
        );
        assert_eq!(
            AppError::PayloadTooLarge("length limit exceeded".into()).status_and_code(),
            (StatusCode::PAYLOAD_TOO_LARGE, "E0004")
        );

        let response = AppError::from(PrintError::Task("panicked".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
