use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashlightError {
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings document is malformed: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("Invalid options: {0}")]
    Builder(String),
}

pub type Result<T> = std::result::Result<T, FlashlightError>;
