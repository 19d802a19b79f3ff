/// 服务器配置 - 打印网关的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量 (或 `.env` 文件) 覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_HOST | 127.0.0.1 | 监听地址 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | DRY_RUN | (未设置) | `1` / `true` 时不调用打印后台 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | false | 控制台输出 JSON 日志 |
/// | LOG_DIR | (未设置) | 日志文件目录 |
/// | MAX_BODY_BYTES | 16777216 | 请求体大小上限 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// DRY_RUN=1 HTTP_PORT=9000 cargo run -p rawspool-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 监听地址
    pub http_host: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 演练模式: 解码并记录作业，但不发送到打印机
    pub dry_run: bool,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 请求体大小上限 (字节)
    pub max_body_bytes: usize,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            dry_run: std::env::var("DRY_RUN")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16 * 1024 * 1024),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 使用自定义端口和演练模式覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16, dry_run: bool) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.dry_run = dry_run;
        config
    }

    /// 监听地址 `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
