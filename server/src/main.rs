//! Serves the built Top SQL dashboard.
//!
//! ```bash
//! topsql-ui --ui-listen 0.0.0.0:14000 --assets-dir app/dist
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use topsql_server::{DEFAULT_LISTEN, ServerConfig, logging};

#[derive(Parser, Debug)]
#[command(name = "topsql-ui")]
#[command(about = "Static file server for the Top SQL dashboard")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long = "ui-listen", env = "TOPSQL_UI_LISTEN", default_value = DEFAULT_LISTEN)]
    ui_listen: SocketAddr,

    /// Directory holding the built dashboard (index.html and assets)
    #[arg(long, env = "TOPSQL_UI_ASSETS", default_value = "dist")]
    assets_dir: PathBuf,

    /// Also write a rotating log file into this directory
    #[arg(long, env = "TOPSQL_UI_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_dir.as_deref());

    let config = ServerConfig {
        listen: args.ui_listen,
        assets_dir: args.assets_dir,
    };

    if let Err(e) = topsql_server::run(config).await {
        tracing::error!("UI server failed: {e:#}");
        return Err(e);
    }
    Ok(())
}
