use std::path::PathBuf;

use crate::api::ApiConfig;

pub const DEFAULT_PLACEHOLDER_ART: &str = "/static/img/placeholder.png";

/// Runtime settings, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Working directory for sldl and destination for uploaded files.
    pub app_root: PathBuf,
    pub executable: PathBuf,
    pub download_path: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub search_timeout_ms: u64,
    pub placeholder_art_url: String,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let app_root = PathBuf::from(".");
        Self {
            executable: app_root.join("sldl"),
            app_root,
            download_path: None,
            user: None,
            password: None,
            search_timeout_ms: 6000,
            placeholder_art_url: DEFAULT_PLACEHOLDER_ART.to_string(),
            api: ApiConfig::default(),
        }
    }
}
