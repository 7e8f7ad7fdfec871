//! Collaborator interfaces used by the send pipeline.
//!
//! The optional lookups have `Noop` implementations that report "absent",
//! so a deployment without channel or user state still sends messages.

use {async_trait::async_trait, courier_common::Peer};

use crate::{
    error::{DeliveryError, DraftError, EntitiesError, MediaError},
    types::{InputMedia, Message, MessageMedia, OutboxRequest, Updates},
};

// ── Media ───────────────────────────────────────────────────────────────────

/// Turns a caller's media descriptor into stored media.
#[async_trait]
pub trait MediaBuilder: Send + Sync {
    async fn build(&self, media: &InputMedia) -> Result<MessageMedia, MediaError>;
}

// ── Entities ────────────────────────────────────────────────────────────────

/// Renormalizes text entities of a composed message.
#[async_trait]
pub trait EntitiesFixer: Send + Sync {
    /// Return the message with its text and entities normalized.
    ///
    /// `has_bot` is true when either side of the conversation is a bot.
    async fn fix(
        &self,
        user_id: i64,
        peer: &Peer,
        is_outgoing: bool,
        message: Message,
        has_bot: bool,
    ) -> Result<Message, EntitiesError>;
}

// ── Lookups ─────────────────────────────────────────────────────────────────

/// Channel state lookup.
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    /// Discussion chat linked to `channel_id`, if any.
    async fn linked_chat_id(&self, channel_id: i64, user_id: i64) -> Option<i64>;
}

pub struct NoopChannelLookup;

#[async_trait]
impl ChannelLookup for NoopChannelLookup {
    async fn linked_chat_id(&self, _channel_id: i64, _user_id: i64) -> Option<i64> {
        None
    }
}

/// User state lookup.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn is_bot(&self, user_id: i64) -> bool;
}

pub struct NoopUserLookup;

#[async_trait]
impl UserLookup for NoopUserLookup {
    async fn is_bot(&self, _user_id: i64) -> bool {
        false
    }
}

// ── Delivery ────────────────────────────────────────────────────────────────

/// Client of the downstream delivery subsystem.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send_message(&self, request: OutboxRequest) -> Result<Updates, DeliveryError>;
}

// ── Drafts ──────────────────────────────────────────────────────────────────

/// Draft storage.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn clear_draft(&self, user_id: i64, auth_id: i64, peer: &Peer) -> Result<(), DraftError>;
}

pub struct NoopDraftStore;

#[async_trait]
impl DraftStore for NoopDraftStore {
    async fn clear_draft(
        &self,
        _user_id: i64,
        _auth_id: i64,
        _peer: &Peer,
    ) -> Result<(), DraftError> {
        Ok(())
    }
}
