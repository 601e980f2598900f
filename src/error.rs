use crate::core::page::MountPoint;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Config load failed: {status}")]
    Load { status: u16 },

    #[error("Config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mount point not found: {0}")]
    MissingMount(MountPoint),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("admin dashboard disabled")]
    AdminPanelDisabled,

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
