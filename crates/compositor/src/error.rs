use adforge_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("Failed to fetch image from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Image fetch from {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Image at {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: usize },

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("SVG error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error(transparent)]
    Geometry(#[from] CoreError),
}
