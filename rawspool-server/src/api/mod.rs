//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`printers`] - 已安装打印机列表
//! - [`print`] - 原始打印作业 (HEX / Base64)

pub mod health;
pub mod print;
pub mod printers;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(printers::router())
        .merge(print::router())
}
