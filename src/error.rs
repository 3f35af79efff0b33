//! Error types for catalog loading, rendering and export.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the catalog or exporting a cover.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request for a catalog or asset failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON payload (remote catalog, cache entry, profile) could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An asset referenced by the visual tree could not be loaded.
    #[error("failed to load asset {url}: {reason}")]
    AssetLoad { url: String, reason: String },

    /// The rendered SVG could not be parsed for rasterization.
    #[error("failed to parse rendered SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// The computed output size cannot back a bitmap.
    #[error("cannot allocate a {width}x{height} canvas")]
    InvalidDimensions { width: f32, height: f32 },

    /// Encoding the captured bitmap failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
