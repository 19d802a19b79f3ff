//! Windows 服务宿主
//!
//! 不带 `--console` 启动时，进程交给服务控制管理器 (SCM) 调度。
//! SCM 的 Stop / Shutdown 控制取消 [`CancellationToken`]，
//! 与控制台模式下 ctrl-c 走同一条优雅关闭路径。
//!
//! ```text
//! sc create RawSpool binPath= "C:\rawspool\rawspool-server.exe"
//! sc start RawSpool
//! ```

use std::ffi::OsString;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
    ServiceType,
};
use windows_service::service_control_handler::{self, ServiceControlHandlerResult};
use windows_service::{define_windows_service, service_dispatcher};

use crate::core::{Config, Server};

/// 服务名 (sc create 时使用)
pub const SERVICE_NAME: &str = "RawSpool";

define_windows_service!(ffi_service_main, service_main);

/// 连接 SCM 并阻塞直到服务停止
///
/// 必须由 SCM 启动的进程调用；在普通终端中会失败
/// (ERROR_FAILED_SERVICE_CONTROLLER_CONNECT)，此时应使用 `--console`。
pub fn run_dispatcher() -> anyhow::Result<()> {
    service_dispatcher::start(SERVICE_NAME, ffi_service_main)?;
    Ok(())
}

fn service_main(_arguments: Vec<OsString>) {
    if let Err(e) = run_service() {
        tracing::error!("Service error: {:#}", e);
    }
}

fn run_service() -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let stop_token = shutdown.clone();

    let status_handle =
        service_control_handler::register(SERVICE_NAME, move |control| match control {
            ServiceControl::Stop | ServiceControl::Shutdown => {
                tracing::info!(?control, "Service stop requested");
                stop_token.cancel();
                ServiceControlHandlerResult::NoError
            }
            ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
            _ => ServiceControlHandlerResult::NotImplemented,
        })?;

    status_handle.set_service_status(status(
        ServiceState::Running,
        ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN,
        ServiceExitCode::Win32(0),
    ))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        let config = Config::from_env();
        crate::setup_environment(&config)?;
        tracing::info!(dry_run = config.dry_run, "🖨️ rawspool service starting...");

        Server::new(config).serve(shutdown).await
    });

    let exit_code = match &result {
        Ok(()) => ServiceExitCode::Win32(0),
        Err(_) => ServiceExitCode::ServiceSpecific(1),
    };
    status_handle.set_service_status(status(
        ServiceState::Stopped,
        ServiceControlAccept::empty(),
        exit_code,
    ))?;

    result
}

fn status(
    state: ServiceState,
    controls_accepted: ServiceControlAccept,
    exit_code: ServiceExitCode,
) -> ServiceStatus {
    ServiceStatus {
        service_type: ServiceType::OWN_PROCESS,
        current_state: state,
        controls_accepted,
        exit_code,
        checkpoint: 0,
        wait_hint: Duration::default(),
        process_id: None,
    }
}
