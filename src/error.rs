use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("bad glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ConeError>;
