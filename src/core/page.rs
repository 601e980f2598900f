//! 页面模型：一组具名挂载点及其当前 markup。
//! ServerInfo / PluginsList / RoutesList / RouteFilter 位于主内容区，
//! VersionTag / Refresh 属于导航外框，主内容区被错误信息替换时不受影响。

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::format::{escape_attr, escape_html};
use super::render::RouteListView;
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MountPoint {
    VersionTag,
    Refresh,
    ServerInfo,
    PluginsList,
    RoutesList,
    RouteFilter,
}

impl MountPoint {
    pub const ALL: [MountPoint; 6] = [
        MountPoint::VersionTag,
        MountPoint::Refresh,
        MountPoint::ServerInfo,
        MountPoint::PluginsList,
        MountPoint::RoutesList,
        MountPoint::RouteFilter,
    ];

    /// 元素 id
    pub fn id(self) -> &'static str {
        match self {
            MountPoint::VersionTag => "version-tag",
            MountPoint::Refresh => "refresh",
            MountPoint::ServerInfo => "server-info",
            MountPoint::PluginsList => "plugins-list",
            MountPoint::RoutesList => "routes-list",
            MountPoint::RouteFilter => "route-filter",
        }
    }

    /// 是否位于主内容区
    pub fn in_main(self) -> bool {
        !matches!(self, MountPoint::VersionTag | MountPoint::Refresh)
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 导航按钮：(data-section, 标签)
const SECTIONS: [(&str, &str); 3] = [
    ("server", "Server"),
    ("plugins", "Plugins"),
    ("routes", "Routes"),
];

#[derive(Debug, Clone)]
pub struct Page {
    /// 页面初始布局包含的挂载点
    layout: BTreeSet<MountPoint>,
    /// 当前仍然存在的挂载点
    present: BTreeSet<MountPoint>,
    content: BTreeMap<MountPoint, String>,
    routes: Option<RouteListView>,
    main_error: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// 包含全部挂载点的标准页面
    pub fn new() -> Self {
        Self::with_mounts(MountPoint::ALL)
    }

    pub fn with_mounts<I: IntoIterator<Item = MountPoint>>(mounts: I) -> Self {
        let layout: BTreeSet<MountPoint> = mounts.into_iter().collect();
        Self {
            present: layout.clone(),
            layout,
            content: BTreeMap::new(),
            routes: None,
            main_error: None,
        }
    }

    pub fn has_mount(&self, point: MountPoint) -> bool {
        self.present.contains(&point)
    }

    fn require(&self, point: MountPoint) -> Result<()> {
        if self.has_mount(point) {
            Ok(())
        } else {
            Err(DashboardError::MissingMount(point))
        }
    }

    /// 写入挂载点内容（整体替换）。VersionTag 与 RouteFilter 存纯文本，输出时转义
    pub fn mount(&mut self, point: MountPoint, markup: String) -> Result<()> {
        self.require(point)?;
        self.content.insert(point, markup);
        Ok(())
    }

    /// 挂载路由列表，旧的卡片和手风琴状态一并丢弃
    pub fn mount_routes(&mut self, view: RouteListView) -> Result<()> {
        self.require(MountPoint::RoutesList)?;
        self.content.insert(MountPoint::RoutesList, view.to_markup());
        self.routes = Some(view);
        Ok(())
    }

    pub fn content(&self, point: MountPoint) -> Option<&str> {
        if !self.has_mount(point) {
            return None;
        }
        self.content.get(&point).map(String::as_str)
    }

    pub fn route_list(&self) -> Option<&RouteListView> {
        self.routes.as_ref()
    }

    /// 点击路由卡片头部
    pub fn toggle_route(&mut self, index: usize) -> Option<bool> {
        let view = self.routes.as_mut()?;
        let opened = view.toggle(index)?;
        self.content.insert(MountPoint::RoutesList, view.to_markup());
        Some(opened)
    }

    pub fn main_error(&self) -> Option<&str> {
        self.main_error.as_deref()
    }

    /// 用错误信息替换整个主内容区，主内容区内的挂载点随之消失
    pub fn replace_main(&mut self, message: &str) {
        self.present.retain(|p| !p.in_main());
        self.content.retain(|p, _| !p.in_main());
        self.routes = None;
        self.main_error = Some(message.to_string());
    }

    /// 恢复初始布局中的主内容区挂载点（内容为空）
    pub fn restore_main(&mut self) {
        if self.main_error.take().is_some() {
            self.present
                .extend(self.layout.iter().copied().filter(|p| p.in_main()));
        }
    }

    fn region(&self, point: MountPoint) -> String {
        self.content(point).unwrap_or_default().to_string()
    }

    fn main_html(&self) -> String {
        if let Some(err) = &self.main_error {
            return format!(
                r#"<div class="load-error">Failed to load config: {}</div>"#,
                escape_html(err)
            );
        }

        let mut html = String::new();
        if self.has_mount(MountPoint::ServerInfo) {
            html.push_str(&format!(
                r#"<section id="server" class="visible"><h2>Server</h2><div id="server-info">{}</div></section>"#,
                self.region(MountPoint::ServerInfo)
            ));
        }
        if self.has_mount(MountPoint::PluginsList) {
            html.push_str(&format!(
                r#"<section id="plugins" class="visible"><h2>Plugins</h2><div id="plugins-list">{}</div></section>"#,
                self.region(MountPoint::PluginsList)
            ));
        }
        html.push_str(r#"<section id="routes" class="visible"><h2>Routes</h2>"#);
        if self.has_mount(MountPoint::RouteFilter) {
            html.push_str(&format!(
                r#"<form method="get" action="/"><input id="route-filter" name="q" placeholder="Filter routes" value="{}"></form>"#,
                escape_attr(&self.region(MountPoint::RouteFilter))
            ));
        }
        if self.has_mount(MountPoint::RoutesList) {
            html.push_str(&format!(
                r#"<div id="routes-list">{}</div>"#,
                self.region(MountPoint::RoutesList)
            ));
        }
        html.push_str("</section>");
        html
    }

    /// 完整 HTML 文档
    pub fn to_html(&self) -> String {
        let mut header = String::from("<header><h1>Gateway Admin</h1>");
        if self.has_mount(MountPoint::VersionTag) {
            header.push_str(&format!(
                r#"<span id="version-tag">{}</span>"#,
                escape_html(&self.region(MountPoint::VersionTag))
            ));
        }
        if self.has_mount(MountPoint::Refresh) {
            header.push_str(r#"<a id="refresh" href="/">Refresh</a>"#);
        }
        header.push_str("</header>");

        let nav: String = SECTIONS
            .iter()
            .enumerate()
            .map(|(i, (id, label))| {
                let active = if i == 0 { r#" class="active""# } else { "" };
                format!(r#"<button data-section="{}"{}>{}</button>"#, id, active, label)
            })
            .collect();

        format!(
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Gateway Admin</title></head>",
                "<body>{}<aside><nav>{}</nav></aside><main>{}</main></body></html>"
            ),
            header,
            nav,
            self.main_html()
        )
    }
}
