use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("File type not allowed: {0}. Select a .pdf or .txt file.")]
    InvalidFileType(String),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TriageError>;
