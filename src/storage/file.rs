use std::path::Path;

use crate::error::Result;
use crate::models::GatewayConfig;

/// 从文件加载网关配置，`.yaml`/`.yml` 按 YAML 解析，其余按 JSON。
/// 文件损坏直接返回错误，不做修补。
pub fn load_config(path: &Path) -> Result<GatewayConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let config = if is_yaml {
        serde_yaml::from_str::<GatewayConfig>(&content)?
    } else {
        serde_json::from_str::<GatewayConfig>(&content)?
    };

    tracing::info!(
        path = %path.display(),
        routes = config.routes.len(),
        plugins = config.plugins.len(),
        "gateway config loaded"
    );
    Ok(config)
}
