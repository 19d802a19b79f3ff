//! Printers API Handlers

use axum::{Json, extract::State};
use rawspool::PrinterInfo;
use tracing::info;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// GET /printers - 获取已安装的打印机
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<PrinterInfo>>>> {
    let printers = rawspool::list_printers(state.printer.clone()).await?;
    info!(count = printers.len(), "/printers returned printers");
    Ok(ok(printers))
}
