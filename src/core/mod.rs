pub mod accordion;
pub mod filter;
pub mod format;
pub mod page;
pub mod render;

use crate::api::client::ConfigClient;
use crate::error::{DashboardError, Result};
use crate::models::GatewayConfig;

use filter::RouteFilter;
use page::{MountPoint, Page};
use render::{render_plugins, render_routes, render_server_info, version_label, RouteListView};

/// 加载状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// 失败描述
    Failed(String),
}

/// 仪表盘编排：拉取 -> 渲染全部区块 -> 初始化过滤器
pub struct Dashboard {
    page: Page,
    state: LoadState,
    config: Option<GatewayConfig>,
    filter: Option<RouteFilter>,
    /// 最近一次发出的请求序号
    dispatched: u64,
}

impl Dashboard {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            state: LoadState::Loading,
            config: None,
            filter: None,
            dispatched: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> Option<&GatewayConfig> {
        self.config.as_ref()
    }

    pub fn route_list(&self) -> Option<&RouteListView> {
        self.page.route_list()
    }

    pub fn filter_query(&self) -> &str {
        self.filter.as_ref().map(|f| f.query()).unwrap_or("")
    }

    /// 开始一次加载，返回请求序号
    pub fn begin_load(&mut self) -> u64 {
        self.dispatched += 1;
        self.state = LoadState::Loading;
        tracing::debug!(seq = self.dispatched, "config load dispatched");
        self.dispatched
    }

    /// 应用加载结果。序号早于最近一次请求的结果被丢弃，返回是否已应用
    pub fn complete_load(&mut self, seq: u64, result: Result<GatewayConfig>) -> bool {
        if seq < self.dispatched {
            tracing::debug!(seq, latest = self.dispatched, "stale config response discarded");
            return false;
        }
        match result {
            Ok(config) => self.apply_config(config),
            Err(err) => self.fail(err),
        }
        true
    }

    /// 手动刷新或首次加载
    pub async fn refresh(&mut self, client: &ConfigClient) -> &LoadState {
        let seq = self.begin_load();
        let result = client.fetch_config().await;
        self.complete_load(seq, result);
        &self.state
    }

    fn apply_config(&mut self, config: GatewayConfig) {
        self.page.restore_main();

        skip_missing(
            self.page
                .mount(MountPoint::VersionTag, version_label(config.version.as_deref())),
        );
        skip_missing(
            self.page
                .mount(MountPoint::ServerInfo, render_server_info(config.server.as_ref())),
        );
        skip_missing(
            self.page
                .mount(MountPoint::PluginsList, render_plugins(&config.plugins)),
        );
        skip_missing(self.page.mount_routes(render_routes(&config.routes)));

        // 过滤输入框不存在时不启用过滤
        self.filter = if self.page.has_mount(MountPoint::RouteFilter) {
            skip_missing(self.page.mount(MountPoint::RouteFilter, String::new()));
            Some(RouteFilter::new(config.routes.clone()))
        } else {
            None
        };

        tracing::info!(
            version = config.version.as_deref().unwrap_or("?"),
            plugins = config.plugins.len(),
            routes = config.routes.len(),
            "config loaded"
        );
        self.config = Some(config);
        self.state = LoadState::Loaded;
    }

    fn fail(&mut self, err: DashboardError) {
        tracing::warn!(error = %err, "admin init failed");
        let message = err.to_string();
        self.page.replace_main(&message);
        self.config = None;
        self.filter = None;
        self.state = LoadState::Failed(message);
    }

    /// 过滤输入变化：整体重新渲染路由列表，返回是否生效
    pub fn set_filter_query(&mut self, query: &str) -> bool {
        let filter = match self.filter.as_mut() {
            Some(f) => f,
            None => return false,
        };
        let view = render_routes(filter.apply(query));
        skip_missing(self.page.mount(MountPoint::RouteFilter, query.to_string()));
        skip_missing(self.page.mount_routes(view));
        true
    }

    /// 点击第 `index` 张卡片头部，返回新的展开状态
    pub fn toggle_route(&mut self, index: usize) -> Option<bool> {
        self.page.toggle_route(index)
    }
}

/// 缺失的挂载点只跳过该区块
fn skip_missing(result: Result<()>) {
    if let Err(err) = result {
        tracing::debug!(error = %err, "section skipped");
    }
}
