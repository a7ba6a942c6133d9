use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected parameters, caught eagerly before any work happens
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Acquisition device could not be reached; recoverable by the caller
    #[error("device connectivity error: {details}")]
    Connectivity { details: String },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("wav encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("chart encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Error {
        Error::Config(msg.into())
    }

    pub fn connectivity(details: impl Into<String>) -> Error {
        Error::Connectivity {
            details: details.into(),
        }
    }
}
