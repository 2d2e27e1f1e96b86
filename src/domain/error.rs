use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("No search query provided")]
    NoInput,

    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to start sldl: {0}")]
    Spawn(String),

    #[error("sldl exited with code {code}")]
    Tool { code: i32, stderr: String },
}
