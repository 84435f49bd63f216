use thiserror::Error;

/// Errors produced while building palettes.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is outside its accepted range,
    /// e.g. a cluster count of zero.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input bytes could not be decoded into an image.
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
