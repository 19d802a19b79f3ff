//! rawspool-server - 本地原始打印网关
//!
//! # 架构概述
//!
//! 在本机暴露一个 HTTP 接口，接收 HEX / Base64 编码的原始打印数据，
//! 解码后通过 [`rawspool`] 送入操作系统打印后台。
//!
//! # 模块结构
//!
//! ```text
//! rawspool-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── service.rs     # Windows 服务宿主 (仅 Windows)
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod middleware;
pub mod utils;

#[cfg(windows)]
pub mod service;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// 以控制台模式运行的命令行开关 (Windows 上默认作为服务运行)
pub const CONSOLE_FLAG: &str = "--console";

/// 命令行是否要求控制台模式
pub fn is_console_mode<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().any(|arg| arg.as_ref() == CONSOLE_FLAG)
}

/// 设置环境: 按配置初始化日志 (控制台 + 可选文件)
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
                                          _
  _ __ __ ___      _____ _ __   ___   ___ | |
 | '__/ _` \ \ /\ / / __| '_ \ / _ \ / _ \| |
 | | | (_| |\ V  V /\__ \ |_) | (_) | (_) | |
 |_|  \__,_| \_/\_/ |___/ .__/ \___/ \___/|_|
                        |_|
    "#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_mode_flag() {
        assert!(is_console_mode(["rawspool-server", "--console"]));
        assert!(!is_console_mode(["rawspool-server"]));
        assert!(!is_console_mode(["rawspool-server", "--consoles"]));
    }
}
