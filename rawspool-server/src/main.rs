use rawspool_server::{Config, Server, print_banner, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (不存在时忽略)
    let _ = dotenv::dotenv();

    // 2. Windows 上默认交给服务控制管理器，--console 时前台运行
    #[cfg(windows)]
    if !rawspool_server::is_console_mode(std::env::args()) {
        return rawspool_server::service::run_dispatcher();
    }

    run_console()
}

#[tokio::main]
async fn run_console() -> anyhow::Result<()> {
    // 3. 加载配置
    let config = Config::from_env();

    // 4. 初始化日志
    setup_environment(&config)?;

    print_banner();

    tracing::info!(dry_run = config.dry_run, "🖨️ rawspool server starting...");

    // 5. 启动 HTTP 服务器 (ctrl-c / SIGTERM 关闭)
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
