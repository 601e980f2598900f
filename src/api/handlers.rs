use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::core::page::Page;
use crate::core::Dashboard;
use crate::models::GatewayConfig;

/// 共享状态类型：启动时加载的只读配置
pub type AppState = Arc<GatewayConfig>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 仪表盘查询参数：`q` 过滤串，`open` 逗号分隔的展开卡片下标
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub q: Option<String>,
    pub open: Option<String>,
}

impl DashboardQuery {
    /// 展开卡片集合（去重、升序），无法解析的下标直接忽略
    pub fn open_indices(&self) -> BTreeSet<usize> {
        self.open
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect()
    }
}

// ---- 处理器 ----

/// GET /api/config
pub async fn get_config(State(config): State<AppState>) -> Json<GatewayConfig> {
    Json(config.as_ref().clone())
}

/// GET /
pub async fn dashboard_page(
    State(config): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    Html(render_dashboard(&config, &query))
}

/// 服务端渲染一次完整页面
pub fn render_dashboard(config: &GatewayConfig, query: &DashboardQuery) -> String {
    let mut dash = Dashboard::new(Page::new());
    let seq = dash.begin_load();
    dash.complete_load(seq, Ok(config.clone()));
    if let Some(q) = query.q.as_deref() {
        dash.set_filter_query(q);
    }
    for index in query.open_indices() {
        dash.toggle_route(index);
    }
    dash.page().to_html()
}

pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("not found: {}", uri.path()),
        }),
    )
        .into_response()
}
