use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Kind of a resolved message destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerType {
    User,
    Chat,
    Channel,
}

impl PeerType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Chat => "chat",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for PeerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical destination of a message, independent of how the caller
/// addressed it.
///
/// There is no "self" kind: a self-chat is a `User` peer whose id equals the
/// caller's own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub peer_type: PeerType,
    pub peer_id: i64,
}

impl Peer {
    #[must_use]
    pub fn user(peer_id: i64) -> Self {
        Self {
            peer_type: PeerType::User,
            peer_id,
        }
    }

    #[must_use]
    pub fn chat(peer_id: i64) -> Self {
        Self {
            peer_type: PeerType::Chat,
            peer_id,
        }
    }

    #[must_use]
    pub fn channel(peer_id: i64) -> Self {
        Self {
            peer_type: PeerType::Channel,
            peer_id,
        }
    }

    /// Whether this peer is the self-chat ("Saved Messages") of `user_id`.
    #[must_use]
    pub fn is_self_user(&self, user_id: i64) -> bool {
        self.peer_type == PeerType::User && self.peer_id == user_id
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.peer_type, self.peer_id)
    }
}

/// Caller identity attached to every request by the session layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcMetadata {
    pub user_id: i64,
    /// Auth key of the session the request arrived on.
    pub auth_id: i64,
    pub is_bot: bool,
}
