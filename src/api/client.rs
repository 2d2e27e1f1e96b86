use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, DeezerArtistResponse, ItunesSearchResponse};

const THUMBNAIL_SIZE: &str = "100x100bb";
const FULL_SIZE: &str = "600x600bb";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("API returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Looks up cover art on iTunes, falling back to a Deezer artist picture.
#[derive(Clone)]
pub struct ArtClient {
    config: ApiConfig,
    client: Client,
}

impl ArtClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Album artwork from iTunes, upgraded to the large variant.
    pub async fn album_art(&self, artist: &str, album: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.config.itunes_base_url),
            &[
                ("term", format!("{} {}", artist, album)),
                ("entity", "album".to_string()),
                ("limit", self.config.album_result_limit.to_string()),
            ],
        )?;

        let response: ItunesSearchResponse = self.get_json(url).await?;
        Ok(response
            .results
            .into_iter()
            .find_map(|album| album.artwork_url_100)
            .map(|thumb| thumb.replace(THUMBNAIL_SIZE, FULL_SIZE)))
    }

    /// Artist picture from Deezer.
    pub async fn artist_image(&self, artist: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(
            &format!("{}/search/artist", self.config.deezer_base_url),
            &[("q", artist)],
        )?;

        let response: DeezerArtistResponse = self.get_json(url).await?;
        Ok(response
            .data
            .into_iter()
            .next()
            .and_then(|artist| artist.picture_xl)
            .filter(|url| !url.is_empty()))
    }

    /// Best available art for an (artist, album) pair.
    ///
    /// Lookup failures are logged and treated as "no art".
    pub async fn resolve(&self, artist: &str, album: &str) -> Option<String> {
        if !album.is_empty() && album != "Unknown" {
            match self.album_art(artist, album).await {
                Ok(Some(url)) => return Some(url),
                Ok(None) => tracing::debug!("No iTunes artwork for {} - {}", artist, album),
                Err(e) => tracing::debug!("iTunes lookup failed for {} - {}: {}", artist, album, e),
            }
        }

        match self.artist_image(artist).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Deezer lookup failed for {}: {}", artist, e);
                None
            }
        }
    }
}
