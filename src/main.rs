pub mod api;
pub mod core;
pub mod error;
pub mod models;
pub mod storage;
pub mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::client::ConfigClient;
use crate::error::DashboardError;

/// 日志级别环境变量
const LOG_ENV: &str = "GATEWAY_ADMIN_LOG";
/// 管理面板地址环境变量
const URL_ENV: &str = "GATEWAY_ADMIN_URL";
const DEFAULT_URL: &str = "http://127.0.0.1:9100";

#[derive(Parser)]
#[command(name = "gateway-admin", version, about = "Read-only admin dashboard for gateway configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 启动管理面板：/api/config 与 HTML 仪表盘
    Serve {
        /// 网关配置文件（JSON 或 YAML）
        #[arg(short, long)]
        config: PathBuf,
        /// 覆盖 admin_panel.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// 终端仪表盘
    View {
        /// 管理面板地址，默认取 GATEWAY_ADMIN_URL
        #[arg(short, long)]
        url: Option<String>,
    },
}

/// 终端仪表盘默认关闭日志，避免写乱画面
fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Command::Serve { config, port } => {
            let gateway = storage::load_config(&config)?;
            runtime.block_on(api::routes::serve(gateway, port))
        }
        Command::View { url } => {
            let url = url
                .or_else(|| std::env::var(URL_ENV).ok())
                .unwrap_or_else(|| DEFAULT_URL.to_string());
            let loader = tui::Loader::new(ConfigClient::new(url), runtime.handle().clone());
            let mut app = tui::App::new(loader);
            app.run()?;
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(match cli.command {
        Command::Serve { .. } => "gateway_admin=info",
        Command::View { .. } => "off",
    });

    match run(cli) {
        Ok(()) => {}
        // 面板关闭不算失败
        Err(DashboardError::AdminPanelDisabled) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
