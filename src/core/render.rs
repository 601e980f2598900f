//! 各区块渲染：配置切片 -> markup。全部是纯函数，挂载由 Page 负责。

use std::fmt;

use super::accordion::Accordion;
use super::format::{escape_attr, escape_html, summarize_config};
use crate::models::{BackendConfig, PluginConfig, RouteConfig, ServerConfig};

pub const NO_SERVER: &str = "No server config";
pub const NO_PLUGINS_CONFIGURED: &str = "No plugins configured";
pub const NO_ROUTES_CONFIGURED: &str = "No routes configured";
pub const NO_BACKENDS: &str = "No backends";
pub const NO_PLUGINS: &str = "No plugins";

/// 卡片正文每行的渲染高度（px），用于计算展开后的自然高度
const LINE_HEIGHT_PX: u32 = 22;

/// HTTP 方法分类，仅用于样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Other,
}

impl MethodClass {
    /// 大小写不敏感
    pub fn classify(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => MethodClass::Get,
            "POST" => MethodClass::Post,
            "PUT" => MethodClass::Put,
            "DELETE" => MethodClass::Delete,
            "PATCH" => MethodClass::Patch,
            _ => MethodClass::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MethodClass::Get => "GET",
            MethodClass::Post => "POST",
            MethodClass::Put => "PUT",
            MethodClass::Delete => "DELETE",
            MethodClass::Patch => "PATCH",
            MethodClass::Other => "OTHER",
        }
    }
}

impl fmt::Display for MethodClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn placeholder(text: &str) -> String {
    format!(r#"<div class="glass-card">{}</div>"#, text)
}

/// 版本标签：`v1.2.0`，缺失时 `v?`
pub fn version_label(version: Option<&str>) -> String {
    match version {
        Some(v) if !v.is_empty() => format!("v{}", v),
        _ => "v?".to_string(),
    }
}

pub fn render_server_info(server: Option<&ServerConfig>) -> String {
    let server = match server {
        Some(s) => s,
        None => return placeholder(NO_SERVER),
    };
    format!(
        concat!(
            r#"<div class="glass-card">"#,
            r#"<p class="meta"><span class="label">Port</span><span class="value">{}</span></p>"#,
            r#"<p class="meta"><span class="label">Timeout</span><span class="value">{} ms</span></p>"#,
            "</div>"
        ),
        escape_html(&server.port.to_string()),
        escape_html(&server.timeout.to_string()),
    )
}

pub fn render_plugins(plugins: &[PluginConfig]) -> String {
    if plugins.is_empty() {
        return placeholder(NO_PLUGINS_CONFIGURED);
    }
    plugins
        .iter()
        .map(|p| {
            format!(
                r#"<div class="plugin-item glass-card"><div class="plugin-name">{}</div><div class="plugin-config">{}</div></div>"#,
                escape_html(&p.name),
                escape_html(&summarize_config(&p.config)),
            )
        })
        .collect()
}

/// 后端描述：`METHOD URL`，超时为 0 或缺失时不显示
pub fn backend_descriptor(backend: &BackendConfig) -> String {
    match backend.timeout {
        Some(t) if t > 0 => format!("{} {} ({}ms)", backend.method, backend.url, t),
        _ => format!("{} {}", backend.method, backend.url),
    }
}

/// 路由级插件行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLine {
    pub name: String,
    pub summary: String,
}

/// 一张路由卡片的展示数据（未转义，写 markup 时统一转义）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCard {
    pub path: String,
    pub method: String,
    pub method_class: MethodClass,
    pub aggregate: String,
    pub transform: String,
    pub backends: Vec<BackendConfig>,
    pub plugins: Vec<PluginLine>,
}

impl RouteCard {
    pub fn from_route(route: &RouteConfig) -> Self {
        Self {
            path: route.path.clone(),
            method: route.method.clone(),
            method_class: MethodClass::classify(&route.method),
            aggregate: route.aggregate.clone(),
            transform: route.transform.clone(),
            backends: route.backends.clone(),
            plugins: route
                .plugins
                .iter()
                .map(|p| PluginLine {
                    name: p.name.clone(),
                    summary: summarize_config(&p.config),
                })
                .collect(),
        }
    }

    /// 正文的纯文本行（TUI 直接使用）
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Aggregate: {}", self.aggregate),
            format!("Transform: {}", self.transform),
            "Backends:".to_string(),
        ];
        if self.backends.is_empty() {
            lines.push(format!("  {}", NO_BACKENDS));
        } else {
            lines.extend(self.backends.iter().map(|b| format!("  {}", backend_descriptor(b))));
        }
        lines.push("Plugins:".to_string());
        if self.plugins.is_empty() {
            lines.push(format!("  {}", NO_PLUGINS));
        } else {
            lines.extend(self.plugins.iter().map(|p| format!("  {} – {}", p.name, p.summary)));
        }
        lines
    }

    pub fn natural_height(&self) -> u32 {
        self.body_lines().len() as u32 * LINE_HEIGHT_PX
    }

    fn backends_markup(&self) -> String {
        if self.backends.is_empty() {
            return format!("<li>{}</li>", NO_BACKENDS);
        }
        self.backends
            .iter()
            .map(|b| {
                let timeout = match b.timeout {
                    Some(t) if t > 0 => format!(" ({}ms)", t),
                    _ => String::new(),
                };
                format!(
                    "<li><code>{} {}</code>{}</li>",
                    escape_html(&b.method),
                    escape_html(&b.url),
                    timeout
                )
            })
            .collect()
    }

    fn plugins_markup(&self) -> String {
        if self.plugins.is_empty() {
            return format!("<li>{}</li>", NO_PLUGINS);
        }
        self.plugins
            .iter()
            .map(|p| {
                format!(
                    r#"<li><span class="plugin-name">{}</span> – <span class="plugin-config">{}</span></li>"#,
                    escape_html(&p.name),
                    escape_html(&p.summary)
                )
            })
            .collect()
    }

    /// 卡片 markup；展开状态由调用方传入
    pub fn to_markup(&self, index: usize, accordion: &Accordion) -> String {
        let open_class = if accordion.is_open(index) { " open" } else { "" };
        let style = accordion.body_style(index, self.natural_height());
        format!(
            concat!(
                r#"<div class="route-card{open}" data-index="{index}" data-path="{path_attr}" data-method="{method_attr}">"#,
                r#"<div class="route-header"><div class="left">"#,
                r#"<div class="method {class}">{method}</div><div class="path">{path}</div>"#,
                r#"</div><div class="right"><span class="toggle">{glyph}</span></div></div>"#,
                r#"<div class="route-details" style="{style}">"#,
                r#"<p class="meta"><span class="label">Aggregate:</span> <span class="value">{aggregate}</span></p>"#,
                r#"<p class="meta"><span class="label">Transform:</span> <span class="value">{transform}</span></p>"#,
                r#"<div class="meta"><span class="label">Backends:</span></div><ul>{backends}</ul>"#,
                r#"<div class="meta"><span class="label">Plugins:</span></div><ul>{plugins}</ul>"#,
                "</div></div>"
            ),
            open = open_class,
            index = index,
            path_attr = escape_attr(&self.path),
            method_attr = escape_attr(&self.method),
            class = self.method_class,
            method = escape_html(&self.method),
            path = escape_html(&self.path),
            glyph = accordion.glyph(index),
            style = style.to_css(),
            aggregate = escape_html(&self.aggregate),
            transform = escape_html(&self.transform),
            backends = self.backends_markup(),
            plugins = self.plugins_markup(),
        )
    }
}

/// 已挂载的路由列表：卡片 + 手风琴状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteListView {
    cards: Vec<RouteCard>,
    accordion: Accordion,
}

impl RouteListView {
    pub fn cards(&self) -> &[RouteCard] {
        &self.cards
    }

    pub fn accordion(&self) -> &Accordion {
        &self.accordion
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 点击卡片头部
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.accordion.toggle(index)
    }

    pub fn to_markup(&self) -> String {
        if self.cards.is_empty() {
            return placeholder(NO_ROUTES_CONFIGURED);
        }
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| card.to_markup(i, &self.accordion))
            .collect()
    }
}

/// 渲染路由列表，并为每张卡片挂上收起状态的手风琴
pub fn render_routes<'a, I>(routes: I) -> RouteListView
where
    I: IntoIterator<Item = &'a RouteConfig>,
{
    let cards: Vec<RouteCard> = routes.into_iter().map(RouteCard::from_route).collect();
    let accordion = Accordion::collapsed(cards.len());
    RouteListView { cards, accordion }
}
