use serde::{Deserialize, Serialize};

/// Response from the iTunes album search endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItunesSearchResponse {
    #[serde(default)]
    pub results: Vec<ItunesAlbum>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItunesAlbum {
    #[serde(rename = "collectionName", default)]
    pub collection_name: String,
    #[serde(rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
}

/// Response from the Deezer artist search endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeezerArtistResponse {
    #[serde(default)]
    pub data: Vec<DeezerArtist>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeezerArtist {
    #[serde(default)]
    pub name: String,
    pub picture_xl: Option<String>,
}

/// Configuration for the art metadata client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub itunes_base_url: String,
    pub deezer_base_url: String,
    pub album_result_limit: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            itunes_base_url: "https://itunes.apple.com".to_string(),
            deezer_base_url: "https://api.deezer.com".to_string(),
            album_result_limit: 5,
            timeout_secs: 10,
        }
    }
}
