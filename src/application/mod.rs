pub mod download_coordinator;
pub mod search_coordinator;

pub use download_coordinator::DownloadCoordinator;
pub use search_coordinator::SearchCoordinator;
