use thiserror::Error;

/// Errors produced while converting an image into pixel tables.
///
/// A conversion either yields every requested table or one of these; no
/// partial CSV is ever returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The input bytes are not a decodable image.
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Requested raster dimensions are zero or outside the accepted range.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// A filter threshold is above its maximum.
    #[error("invalid {name} threshold {value} (maximum {max})")]
    InvalidThreshold {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV table could not be read back into records.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
