use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("tls error: {0}")]
    TlsError(#[from] rustls::Error),
    #[error("feed error: {0}")]
    FeedError(#[from] quick_xml::DeError),
    #[error("channel not found")]
    ChannelNotFound,
    #[error("video not found: {0}")]
    VideoNotFound(String),
    #[error("validation error: {0}")]
    ValidationError(String),
}
