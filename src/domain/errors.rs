use derive_more::{Display, From};

/// Failure reported to the host page through the JavaScript API.
#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum AppError {
    #[display(fmt = "Configuration Error: {}", _0)]
    Configuration(ConfigurationError),
    #[display(fmt = "Mount Error: a dashboard is already mounted")]
    #[from(ignore)]
    AlreadyMounted,
}

impl std::error::Error for AppError {}

/// Network, HTTP or payload failure while loading market data.
///
/// Any of these fails the whole refresh cycle; the poll controller retries it
/// with backoff.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum FetchError {
    #[display(fmt = "request failed: {}", _0)]
    Network(String),
    #[display(fmt = "HTTP {} from {}", status, url)]
    Http { status: u16, url: String },
    #[display(fmt = "malformed payload: {}", _0)]
    Payload(String),
}

impl std::error::Error for FetchError {}

/// User input that could not be interpreted. Never shown to the user; the
/// converter treats the amount as zero.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ValidationError {
    #[display(fmt = "unparseable amount {:?}", _0)]
    UnparseableAmount(String),
}

impl std::error::Error for ValidationError {}

/// Converter referenced an asset id that is not in the current list.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "unknown asset id {:?}", id)]
pub struct LookupMiss {
    pub id: String,
}

impl std::error::Error for LookupMiss {}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ConfigurationError {
    #[display(fmt = "invalid parameter: {}", _0)]
    InvalidParameter(String),
    #[display(fmt = "failed to parse configuration: {}", _0)]
    Malformed(String),
}

impl std::error::Error for ConfigurationError {}

pub type FetchResult<T> = Result<T, FetchError>;
