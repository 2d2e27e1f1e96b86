pub mod command;
pub mod error;
pub mod model;
pub mod parser;
pub mod ranking;

pub use command::CommandBuilder;
pub use error::AppError;
pub use model::{
    DownloadOptions, LineColor, SearchCandidate, SearchOptions, StreamEvent, ToolCommand,
};
