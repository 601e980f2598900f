use serde::{Deserialize, Deserializer, Serialize};

/// 显式 `null`（Go 的 nil slice）与缺失字段一样按默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// 网关配置文档（只读，每次拉取整体替换）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_panel: AdminPanelConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: Vec<PluginConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Vec<RouteConfig>,
}

/// 服务端口与超时（毫秒）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub port: i64,
    pub timeout: i64,
}

/// 管理面板开关
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AdminPanelConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub port: Option<u16>,
}

/// 插件（全局或路由级），config 保留原始键顺序
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// 路由，(path, method) 仅用于展示和过滤，不保证唯一
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteConfig {
    pub path: String,
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub backends: Vec<BackendConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: Vec<PluginConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregate: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transform: String,
}

/// 后端
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}
