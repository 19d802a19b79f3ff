//! Print API 模块
//!
//! 接收原始打印作业并转发到系统打印后台。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /print | POST | `data` 为 HEX 字符串 (可含空格/连字符) |
//! | /print/base64 | POST | `data` 为 Base64 字符串 |
//!
//! # 请求示例
//!
//! ```json
//! { "printer": "POS-80", "data": "1B 40 48 65 6C 6C 6F 0A" }
//! ```

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{PrintReceipt, PrintRequest};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/print", post(handler::print_hex))
        .route("/print/base64", post(handler::print_base64))
}
