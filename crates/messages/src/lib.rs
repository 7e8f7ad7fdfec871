//! Outgoing message handlers.
//!
//! `messages.sendMedia` turns a send request into a canonical outbound
//! record and hands it to the delivery subsystem:
//! resolve peer → validate caption → compose record → deliver → clear draft
//! (detached).

pub mod compose;
pub mod dispatch;
pub mod drafts;
pub mod entities;
pub mod error;
pub mod media;
pub mod peer;
pub mod service;
pub mod traits;
pub mod types;
pub mod validate;

pub use {
    entities::BoundsEntitiesFixer,
    error::{DeliveryError, DraftError, EntitiesError, Error, MediaError, Result},
    media::InlineMediaBuilder,
    peer::{ResolvedPeer, resolve_peer},
    service::{Collaborators, MessagesCore},
    traits::{
        ChannelLookup, DeliveryClient, DraftStore, EntitiesFixer, MediaBuilder, NoopChannelLookup,
        NoopDraftStore, NoopUserLookup, UserLookup,
    },
    types::{
        InputMedia, InputPeer, InputReplyTo, Message, MessageMedia, OutboxRequest,
        SendMediaRequest, Update, Updates,
    },
};
