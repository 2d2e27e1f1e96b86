use std::sync::Arc;

use crate::api::{ApiError, ArtClient};
use crate::application::{DownloadCoordinator, SearchCoordinator};
use crate::config::AppConfig;
use crate::domain::CommandBuilder;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub downloads: Arc<DownloadCoordinator>,
    pub search: Arc<SearchCoordinator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let builder = CommandBuilder::new(&config);
        let art = ArtClient::new(config.api.clone())?;

        let downloads = DownloadCoordinator::new(builder.clone(), config.app_root.clone());
        let search = SearchCoordinator::new(
            builder,
            config.app_root.clone(),
            art,
            config.placeholder_art_url.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            downloads: Arc::new(downloads),
            search: Arc::new(search),
        })
    }
}
