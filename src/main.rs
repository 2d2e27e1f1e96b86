mod api;
mod application;
mod config;
mod domain;
mod server;
mod utils;

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::api::ApiConfig;
use crate::config::{AppConfig, DEFAULT_PLACEHOLDER_ART};

#[derive(Parser)]
#[command(name = "sldl-web")]
#[command(about = "Web front end for slsk-batchdl", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "SLDL_WEB_PORT", default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "SLDL_WEB_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Working directory for sldl; uploaded files are stored here
    #[arg(long, env = "SLDL_APP_ROOT", default_value = ".")]
    app_root: PathBuf,

    /// Path to the sldl executable (defaults to <app-root>/sldl)
    #[arg(long, env = "SLDL_EXECUTABLE")]
    executable: Option<PathBuf>,

    /// Default download destination when the form leaves it empty
    #[arg(long, env = "SLDL_DOWNLOAD_PATH")]
    download_path: Option<String>,

    /// Default Soulseek username
    #[arg(long, env = "SLSK_USER")]
    user: Option<String>,

    /// Default Soulseek password
    #[arg(long, env = "SLSK_PASS", hide_env_values = true)]
    password: Option<String>,

    /// Search timeout passed to sldl, in milliseconds
    #[arg(long, env = "SLDL_SEARCH_TIMEOUT", default_value = "6000")]
    search_timeout: u64,

    /// Image shown when no cover art is found
    #[arg(long, env = "SLDL_PLACEHOLDER_ART", default_value = DEFAULT_PLACEHOLDER_ART)]
    placeholder_art: String,

    /// Timeout for cover art lookups, in seconds
    #[arg(long, env = "SLDL_ART_TIMEOUT", default_value = "10")]
    art_timeout: u64,
}

impl Cli {
    fn into_config(self) -> std::io::Result<AppConfig> {
        // sldl runs inside app_root, so relative upload paths must not depend on our cwd.
        let app_root = std::fs::canonicalize(&self.app_root)?;
        let executable = self
            .executable
            .unwrap_or_else(|| app_root.join("sldl"));

        Ok(AppConfig {
            app_root,
            executable,
            download_path: self.download_path,
            user: self.user,
            password: self.password,
            search_timeout_ms: self.search_timeout,
            placeholder_art_url: self.placeholder_art,
            api: ApiConfig {
                timeout_secs: self.art_timeout,
                ..ApiConfig::default()
            },
        })
    }
}

fn listen_addr(host: &str, port: u16) -> Result<SocketAddr, AddrParseError> {
    Ok((host.parse::<IpAddr>()?, port).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let addr = listen_addr(&cli.host, cli.port)?;
    let config = cli.into_config()?;

    server::run_server(addr, config).await
}
