//! Common error types used throughout vodpath.
//!
//! Request decoding fails in exactly two ways: the client sent something
//! malformed ([`Error::BadRequest`]), or the server could not allocate the
//! per-request structures ([`Error::Internal`]). Every bad request carries a
//! [`Rejection`] tag naming the check that failed, for diagnostics only; the
//! client-facing response class is the same for all of them.

/// The specific check that rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A segment request carried no segment index, or index 0.
    #[error("missing or zero segment index")]
    MissingSegmentIndex,

    /// Bytes were left over after the filename grammar finished.
    #[error("did not consume whole name")]
    TrailingGarbage,

    /// The multi-uri request has more middle parts than supported.
    #[error("number of url parts exceeds the limit")]
    TooManyUriParts,

    /// The sequence mask selected none of the multi-uri parts.
    #[error("request has no uris")]
    NoUris,

    /// Every selected part was dropped by the requested track mask.
    #[error("request has no uris after track filtering")]
    NoUrisAfterTrackFiltering,

    /// The trim range is empty or inverted.
    #[error("clip from {from} is larger than clip to {to}")]
    InvalidClipRange { from: u32, to: u32 },

    /// A recognized uri parameter had a value its parser rejected.
    #[error("{param} parser failed")]
    InvalidParamValue { param: &'static str },

    /// The playback rate is malformed or outside the supported range.
    #[error("invalid rate, only 0.5 - 2 are supported")]
    InvalidRate,

    /// The file name matched none of the configured request formats.
    #[error("file name does not match any request format")]
    FileNameMismatch,

    /// The request uri has no file name component.
    #[error("unsupported request")]
    UnsupportedRequest,
}

/// Common error type for vodpath.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request is malformed; terminal for the request.
    #[error("Bad request: {0}")]
    BadRequest(#[from] Rejection),

    /// An internal error occurred (allocation failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// The configuration cannot produce a usable parser.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a new InvalidConfig error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error should be answered with a bad-request response.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// The rejection tag, if this is a bad request.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::BadRequest(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
