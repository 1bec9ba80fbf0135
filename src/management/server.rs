//! # HTTP 服务器
//!
//! 绑定监听地址并运行路由，收到 Ctrl+C 后优雅退出

use axum::Router;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::app::AppContext;
use crate::error::{BankError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub const fn context_arc(&self) -> &Arc<AppContext> {
        &self.context
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// HTTP 服务器
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    /// 按上下文中的配置创建服务器
    pub fn new(context: Arc<AppContext>) -> Result<Self> {
        let addr = context.config.server.socket_addr()?;
        if !context.config.admin.is_enabled() {
            lwarn!(
                "system",
                LogStage::Startup,
                LogComponent::Server,
                "admin_disabled",
                "未配置 admin.token_hash，管理接口未启用"
            );
        }
        let router = super::routes::create_router(AppState::new(context));
        Ok(Self { addr, router })
    }

    /// 监听地址
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// 启动服务器，直到收到关闭信号
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            BankError::config_with_source(format!("无法监听地址 {}", self.addr), e)
        })?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Server,
            "server_start",
            format!("HTTP 服务已启动: http://{}", self.addr)
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::Server,
            "server_stopped",
            "HTTP 服务已停止"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::Server,
            "signal_error",
            "监听关闭信号失败",
            error = err.to_string()
        );
        // 无法监听信号时保持运行
        std::future::pending::<()>().await;
    }
    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Server,
        "shutdown_signal",
        "收到关闭信号，开始优雅退出"
    );
}
