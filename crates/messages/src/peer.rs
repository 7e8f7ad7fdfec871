use std::sync::Arc;

use {
    courier_common::{Peer, PeerType, RpcMetadata},
    tracing::{debug, error},
};

use crate::{
    Error, Result,
    traits::{ChannelLookup, UserLookup},
    types::InputPeer,
};

/// Canonical peer plus what the optional lookups found out about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeer {
    pub peer: Peer,
    /// Discussion chat linked to a channel peer.
    pub linked_chat_id: Option<i64>,
    /// Either the caller or the target user is a bot.
    pub has_bot: bool,
}

/// Map an addressing descriptor to a canonical peer.
///
/// `self` is rewritten to the caller's own user peer. Unroutable shapes fail
/// with [`Error::InvalidPeer`].
pub fn resolve_peer(user_id: i64, input: &InputPeer) -> Result<Peer> {
    match input {
        InputPeer::SelfPeer => Ok(Peer::user(user_id)),
        InputPeer::User { user_id: id, .. } | InputPeer::UserFromMessage { user_id: id, .. } => {
            Ok(Peer::user(*id))
        },
        InputPeer::Chat { chat_id } => Ok(Peer::chat(*chat_id)),
        InputPeer::Channel { channel_id, .. }
        | InputPeer::ChannelFromMessage { channel_id, .. } => Ok(Peer::channel(*channel_id)),
        InputPeer::Empty => Err(Error::invalid_peer(input.kind())),
    }
}

/// Resolves peers and enriches them from channel and user state.
pub struct PeerResolver {
    channels: Arc<dyn ChannelLookup>,
    users: Arc<dyn UserLookup>,
}

impl PeerResolver {
    pub fn new(channels: Arc<dyn ChannelLookup>, users: Arc<dyn UserLookup>) -> Self {
        Self { channels, users }
    }

    pub async fn resolve(&self, md: &RpcMetadata, input: &InputPeer) -> Result<ResolvedPeer> {
        let peer = resolve_peer(md.user_id, input).inspect_err(|_| {
            error!(peer = ?input, "invalid peer");
        })?;

        let mut resolved = ResolvedPeer {
            peer,
            linked_chat_id: None,
            has_bot: md.is_bot,
        };
        match peer.peer_type {
            PeerType::User => {
                if !md.is_bot && !peer.is_self_user(md.user_id) {
                    resolved.has_bot = self.users.is_bot(peer.peer_id).await;
                }
            },
            PeerType::Chat => {},
            PeerType::Channel => {
                resolved.linked_chat_id = self
                    .channels
                    .linked_chat_id(peer.peer_id, md.user_id)
                    .await
                    .filter(|id| *id > 0);
            },
        }

        debug!(%peer, linked_chat_id = ?resolved.linked_chat_id, has_bot = resolved.has_bot, "resolved peer");
        Ok(resolved)
    }
}
