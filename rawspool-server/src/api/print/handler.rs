//! Print API Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use rawspool::{PayloadEncoding, PrintError, PrintJob};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// 打印请求
///
/// 同时接受 PascalCase 字段名 (`Printer` / `Data`)，兼容旧客户端。
/// 请求体按 JSON 解析，不检查 `Content-Type` (旧客户端常用 `curl -d` 发送)。
#[derive(Debug, Clone, Deserialize)]
pub struct PrintRequest {
    #[serde(default, alias = "Printer")]
    pub printer: String,
    #[serde(default, alias = "Data")]
    pub data: String,
}

/// 打印回执
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintReceipt {
    pub printer: String,
    pub bytes: usize,
    pub encoding: PayloadEncoding,
    pub dry_run: bool,
}

/// POST /print - HEX 编码的原始数据
pub async fn print_hex(
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<AppResponse<PrintReceipt>>> {
    submit(state, body, PayloadEncoding::Hex).await
}

/// POST /print/base64 - Base64 编码的原始数据
pub async fn print_base64(
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<AppResponse<PrintReceipt>>> {
    submit(state, body, PayloadEncoding::Base64).await
}

async fn submit(
    state: ServerState,
    body: Result<Bytes, BytesRejection>,
    encoding: PayloadEncoding,
) -> AppResult<Json<AppResponse<PrintReceipt>>> {
    let body = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::validation(e.body_text()),
    })?;
    let request: PrintRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid JSON: {}", e)))?;

    if request.printer.trim().is_empty() || request.data.trim().is_empty() {
        return Err(AppError::validation("Missing printer or data"));
    }

    let job = PrintJob::decode(request.printer, &request.data, encoding)?;
    // Separator-only hex decodes to nothing; reject before the dry-run bypass too
    if job.is_empty() {
        return Err(PrintError::EmptyPayload.into());
    }
    let receipt = PrintReceipt {
        printer: job.printer_name.clone(),
        bytes: job.len(),
        encoding,
        dry_run: state.is_dry_run(),
    };

    // 演练模式: 绕过打印后台，不触碰任何设备
    if state.is_dry_run() {
        info!(
            printer = %receipt.printer,
            bytes = receipt.bytes,
            encoding = %encoding,
            "Dry-run: would send job to printer"
        );
        return Ok(ok_with_message(receipt, "Dry run, nothing printed"));
    }

    rawspool::print_job(state.printer.clone(), job).await?;

    info!(
        printer = %receipt.printer,
        bytes = receipt.bytes,
        encoding = %encoding,
        "Sent job to printer"
    );
    Ok(ok_with_message(receipt, "Printed OK"))
}
