use std::error::Error as StdError;

/// Crate-wide result type for message operations.
pub type Result<T> = std::result::Result<T, Error>;

/// RPC error code strings returned to the transport layer.
pub mod codes {
    pub const PEER_ID_INVALID: &str = "PEER_ID_INVALID";
    pub const MEDIA_CAPTION_TOO_LONG: &str = "MEDIA_CAPTION_TOO_LONG";
    pub const MEDIA_INVALID: &str = "MEDIA_INVALID";
    pub const INTERNAL: &str = "INTERNAL_SERVER_ERROR";
}

/// Errors returned by `messages.sendMedia`.
///
/// Collaborator failures are carried through unchanged so the caller sees the
/// original cause and code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The addressing descriptor cannot be routed.
    #[error("invalid peer: {kind}")]
    InvalidPeer { kind: &'static str },

    /// Caption exceeds the configured maximum. `length` is in UTF-8 bytes.
    #[error("media caption too long: {length} > {max} bytes")]
    CaptionTooLong { length: usize, max: usize },

    #[error(transparent)]
    MediaBuildFailed(#[from] MediaError),

    #[error(transparent)]
    DeliveryFailed(#[from] DeliveryError),

    /// The record was about to leave the composer with a component unset.
    #[error("outbound message incomplete: {missing} not set")]
    IncompleteRecord { missing: &'static str },
}

impl Error {
    #[must_use]
    pub fn invalid_peer(kind: &'static str) -> Self {
        Self::InvalidPeer { kind }
    }

    /// Stable error code for the transport layer.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidPeer { .. } => codes::PEER_ID_INVALID,
            Self::CaptionTooLong { .. } => codes::MEDIA_CAPTION_TOO_LONG,
            Self::MediaBuildFailed(e) => e.code(),
            Self::DeliveryFailed(e) => e.code(),
            Self::IncompleteRecord { .. } => codes::INTERNAL,
        }
    }
}

/// Media-builder failures.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// This builder cannot produce the requested kind of media.
    #[error("unsupported media: {kind}")]
    Unsupported { kind: &'static str },

    #[error("invalid media: {message}")]
    Invalid { message: String },

    #[error("media build failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl MediaError {
    #[must_use]
    pub fn invalid(message: impl std::fmt::Display) -> Self {
        Self::Invalid {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Unsupported { .. } | Self::Invalid { .. } => codes::MEDIA_INVALID,
            Self::External { .. } => codes::INTERNAL,
        }
    }
}

/// Entities-fixer failure. Never fails a send.
#[derive(Debug, thiserror::Error)]
#[error("entities: {message}")]
pub struct EntitiesError {
    pub message: String,
}

impl EntitiesError {
    #[must_use]
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Delivery-subsystem failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The delivery subsystem rejected the message with its own code.
    #[error("{code}: {message}")]
    Rpc { code: String, message: String },

    /// The delivery subsystem could not be reached.
    #[error("delivery unavailable: {message}")]
    Unavailable { message: String },
}

impl DeliveryError {
    #[must_use]
    pub fn rpc(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Rpc { code, .. } => code,
            Self::Unavailable { .. } => codes::INTERNAL,
        }
    }
}

/// Draft-store failures. Only ever observed inside the detached task.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl DraftError {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
