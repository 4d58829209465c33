/// Result alias that carries the custom [`CarouselError`] type.
pub type Result<T> = std::result::Result<T, CarouselError>;

/// Common error type for the core crate.
///
/// Only the edges of the system are fallible: loading configuration or
/// content, building a catalog and parsing colours. Navigation and animation
/// never surface errors.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    /// A catalog must contain at least one flavor.
    #[error("flavor catalog must contain at least one entry")]
    EmptyCatalog,
    /// A display colour string could not be parsed.
    #[error("invalid colour `{0}`: expected #rrggbb or #rgb")]
    InvalidColor(String),
    /// Configuration or content JSON failed to decode.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
