use thiserror::Error;

/// Loading the inventory failed. Always fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("inventory could not be loaded: HTTP {0}")]
    Status(u16),
    #[error("inventory request failed: {0}")]
    Transport(String),
    #[error("inventory payload could not be decoded: {0}")]
    Decode(String),
}

/// The expected gem value could not be looked up. The candidate is skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("value lookup request failed: {0}")]
    Request(String),
    #[error("value lookup returned HTTP {0}")]
    Status(u16),
    #[error("value lookup response has no usable goo_value: {0}")]
    MissingValue(String),
}

/// An owner-action link did not have the `GetGooValue( ... )` shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed goo link {link:?}: {reason}")]
pub struct MalformedLinkFormat {
    pub link: String,
    pub reason: String,
}

impl MalformedLinkFormat {
    pub fn new(link: &str, reason: impl Into<String>) -> Self {
        Self {
            link: link.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Errors that abort a grind run.
#[derive(Debug, Error)]
pub enum GrindError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    MalformedLink(#[from] MalformedLinkFormat),
    #[error("unexpected conversion response for asset {assetid}: HTTP {status}: {body}")]
    UnexpectedResponse {
        assetid: String,
        status: u16,
        body: String,
    },
    #[error("conversion request for asset {assetid} failed: {reason}")]
    Transport { assetid: String, reason: String },
}
