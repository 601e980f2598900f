use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::client::CONFIG_PATH;
use super::handlers::{dashboard_page, get_config, not_found, AppState};
use crate::error::{DashboardError, Result};
use crate::models::GatewayConfig;

/// 默认管理端口
pub const DEFAULT_ADMIN_PORT: u16 = 9100;

/// 创建管理面板路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(CONFIG_PATH, get(get_config))
        .route("/", get(dashboard_page))
        .fallback(not_found)
        .with_state(state)
}

/// 端口优先级：命令行 > admin_panel.port > 默认值
pub fn admin_port(config: &GatewayConfig, override_port: Option<u16>) -> u16 {
    override_port
        .or(config.admin_panel.port)
        .unwrap_or(DEFAULT_ADMIN_PORT)
}

/// 启动管理面板；admin_panel.enable 为 false 时不启动
pub async fn serve(config: GatewayConfig, override_port: Option<u16>) -> Result<()> {
    if !config.admin_panel.enable {
        tracing::info!("admin dashboard disabled");
        return Err(DashboardError::AdminPanelDisabled);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], admin_port(&config, override_port)));
    let app = create_router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "admin dashboard available at http://localhost:{}", addr.port());
    axum::serve(listener, app).await?;
    Ok(())
}
