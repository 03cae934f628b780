use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Margin {margin} leaves no usable space on a {width}x{height} page")]
    MarginTooLarge { margin: u32, width: u32, height: u32 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
