//! Printers API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /printers | GET | 列出已安装的打印机 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/printers", get(handler::list))
}
