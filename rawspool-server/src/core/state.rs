use std::sync::Arc;

use rawspool::RawPrinter;

use crate::core::Config;

/// 服务器状态 - 持有配置和打印后台的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份。
/// 不持有任何可变状态：每个打印作业独立完成自己的打印后台握手。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | printer | Arc<dyn RawPrinter> | 打印后台 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub printer: Arc<dyn RawPrinter>,
}

impl ServerState {
    /// 使用当前平台的打印后台初始化
    pub fn initialize(config: &Config) -> Self {
        Self::with_printer(config.clone(), rawspool::system_backend())
    }

    /// 使用指定的打印后台 (测试时注入)
    pub fn with_printer(config: Config, printer: Arc<dyn RawPrinter>) -> Self {
        Self {
            config: Arc::new(config),
            printer,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
