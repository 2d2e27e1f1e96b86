pub mod client;
pub mod models;

pub use client::{ApiError, ArtClient};
pub use models::ApiConfig;
