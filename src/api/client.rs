use std::time::Duration;

use crate::error::{DashboardError, Result};
use crate::models::GatewayConfig;

/// 配置接口路径
pub const CONFIG_PATH: &str = "/api/config";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// 配置拉取客户端：单次请求，不重试
#[derive(Debug, Clone)]
pub struct ConfigClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConfigClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config_url(&self) -> String {
        format!("{}{}", self.base_url, CONFIG_PATH)
    }

    /// 非 2xx 返回 Load，body 不是合法文档返回 Parse
    pub async fn fetch_config(&self) -> Result<GatewayConfig> {
        let url = self.config_url();
        tracing::debug!(%url, "fetching config");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Load {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let config = serde_json::from_str::<GatewayConfig>(&body)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    /// 在随机端口启动一个只有 /api/config 的服务
    async fn spawn(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(CONFIG_PATH, get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_config_url_trims_slash() {
        let client = ConfigClient::new("http://localhost:9100/");
        assert_eq!(client.config_url(), "http://localhost:9100/api/config");
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let base = spawn(
            StatusCode::OK,
            r#"{"version": "2", "routes": [{"path": "/a", "method": "GET"}]}"#,
        )
        .await;
        let cfg = ConfigClient::new(base).fetch_config().await.unwrap();
        assert_eq!(cfg.version.as_deref(), Some("2"));
        assert_eq!(cfg.routes.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_load_error() {
        let base = spawn(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let err = ConfigClient::new(base).fetch_config().await.unwrap_err();
        assert!(matches!(err, DashboardError::Load { status: 500 }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let base = spawn(StatusCode::OK, r#"{"routes": [{"method": "GET"}]}"#).await;
        let err = ConfigClient::new(base).fetch_config().await.unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[tokio::test]
    async fn test_dashboard_refresh_end_to_end() {
        use crate::core::{Dashboard, LoadState};
        use crate::core::page::Page;

        let base = spawn(StatusCode::SERVICE_UNAVAILABLE, "").await;
        let client = ConfigClient::new(base);
        let mut dash = Dashboard::new(Page::new());
        match dash.refresh(&client).await {
            LoadState::Failed(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
