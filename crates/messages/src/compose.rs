//! Outbound record assembly.
//!
//! [`MessageBuilder`] tracks which components have been attached and refuses
//! to produce a [`Message`] until media is set and the record has been through
//! the entities fixer. [`MessageComposer`] drives it for a send request.

use std::sync::Arc;

use {
    courier_common::{Peer, RpcMetadata},
    tracing::{debug, error, warn},
};

use crate::{
    Error, Result,
    peer::ResolvedPeer,
    traits::{EntitiesFixer, MediaBuilder},
    types::{
        InputReplyTo, Message, MessageEntity, MessageMedia, MessageReplies, MessageReplyHeader,
        ReplyMarkup, SendMediaRequest,
    },
};

/// Step-by-step construction of an outbound [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    from_id: Peer,
    peer_id: Peer,
    date: i64,
    silent: bool,
    noforwards: bool,
    invert_media: bool,
    text: String,
    reply_markup: Option<ReplyMarkup>,
    entities: Vec<MessageEntity>,
    saved_peer_id: Option<Peer>,
    reply_to: Option<MessageReplyHeader>,
    replies: Option<MessageReplies>,
    media: Option<MessageMedia>,
    /// Record returned by the entities fixer. Cleared by every setter.
    fixed: Option<Message>,
}

impl MessageBuilder {
    /// Base fields: author, destination, request flags, and caption content.
    pub fn new(user_id: i64, peer: Peer, request: &SendMediaRequest) -> Self {
        Self {
            from_id: Peer::user(user_id),
            peer_id: peer,
            date: chrono::Utc::now().timestamp(),
            silent: request.silent,
            noforwards: request.noforwards,
            invert_media: request.invert_media,
            text: request.message.clone(),
            reply_markup: request.reply_markup.clone(),
            entities: request.entities.clone(),
            saved_peer_id: None,
            reply_to: None,
            replies: None,
            media: None,
            fixed: None,
        }
    }

    /// File the message under `peer` in the author's self-chat.
    #[must_use]
    pub fn saved_peer(mut self, peer: Peer) -> Self {
        self.saved_peer_id = Some(peer);
        self.fixed = None;
        self
    }

    /// Project a reply descriptor. Only message replies produce a header;
    /// story replies are accepted and ignored.
    #[must_use]
    pub fn reply_to(mut self, reply_to: Option<&InputReplyTo>) -> Self {
        match reply_to {
            Some(InputReplyTo::Message {
                reply_to_msg_id, ..
            }) => {
                self.reply_to = Some(MessageReplyHeader {
                    reply_to_msg_id: *reply_to_msg_id,
                });
            },
            Some(InputReplyTo::Story { .. }) | None => {},
        }
        self.fixed = None;
        self
    }

    /// Open an empty comment thread in the linked discussion chat.
    #[must_use]
    pub fn comments_in(mut self, linked_chat_id: Option<i64>) -> Self {
        self.replies = linked_chat_id.map(MessageReplies::comments_in);
        self.fixed = None;
        self
    }

    #[must_use]
    pub fn media(mut self, media: MessageMedia) -> Self {
        self.media = Some(media);
        self.fixed = None;
        self
    }

    /// Run the entities fixer over the record assembled so far.
    ///
    /// The fixer's output becomes the record as a whole. A fixer error keeps
    /// the unfixed record.
    pub async fn fix_entities(
        mut self,
        fixer: &dyn EntitiesFixer,
        user_id: i64,
        has_bot: bool,
    ) -> Result<Self> {
        let draft = self.assemble()?;
        let peer = self.peer_id;
        let fixed = match fixer.fix(user_id, &peer, true, draft.clone(), has_bot).await {
            Ok(fixed) => fixed,
            Err(e) => {
                warn!(%peer, error = %e, "entities fixer failed, keeping request entities");
                draft
            },
        };
        self.fixed = Some(fixed);
        Ok(self)
    }

    /// Finish the record. Fails if media was never attached or the record
    /// was changed after the last entities fix.
    pub fn build(self) -> Result<Message> {
        if self.media.is_none() {
            return Err(Error::IncompleteRecord { missing: "media" });
        }
        self.fixed.ok_or(Error::IncompleteRecord {
            missing: "entities",
        })
    }

    fn assemble(&self) -> Result<Message> {
        let media = self
            .media
            .clone()
            .ok_or(Error::IncompleteRecord { missing: "media" })?;
        Ok(Message {
            out: true,
            silent: self.silent,
            noforwards: self.noforwards,
            invert_media: self.invert_media,
            id: 0,
            from_id: self.from_id,
            peer_id: self.peer_id,
            saved_peer_id: self.saved_peer_id,
            reply_to: self.reply_to,
            date: self.date,
            media,
            message: self.text.clone(),
            reply_markup: self.reply_markup.clone(),
            entities: self.entities.clone(),
            replies: self.replies.clone(),
        })
    }
}

/// Builds the outbound record for a send request.
pub struct MessageComposer {
    media: Arc<dyn MediaBuilder>,
    entities: Arc<dyn EntitiesFixer>,
}

impl MessageComposer {
    pub fn new(media: Arc<dyn MediaBuilder>, entities: Arc<dyn EntitiesFixer>) -> Self {
        Self { media, entities }
    }

    /// Media is built before entities are fixed; the fixer sees the final
    /// media and caption.
    pub async fn compose(
        &self,
        md: &RpcMetadata,
        resolved: &ResolvedPeer,
        request: &SendMediaRequest,
    ) -> Result<Message> {
        let peer = resolved.peer;
        let mut builder = MessageBuilder::new(md.user_id, peer, request)
            .reply_to(request.reply_to.as_ref())
            .comments_in(resolved.linked_chat_id);
        if peer.is_self_user(md.user_id) {
            builder = builder.saved_peer(peer);
        }

        let media = self.media.build(&request.media).await.inspect_err(|e| {
            error!(media = request.media.kind(), error = %e, "messages.sendMedia - media build failed");
        })?;
        debug!(media = request.media.kind(), "media built");

        builder
            .media(media)
            .fix_entities(self.entities.as_ref(), md.user_id, resolved.has_bot)
            .await?
            .build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::{
            error::{EntitiesError, MediaError},
            types::{EntityKind, InputMedia, InputPeer},
        },
        async_trait::async_trait,
    };

    struct GeoOnly;

    #[async_trait]
    impl MediaBuilder for GeoOnly {
        async fn build(&self, media: &InputMedia) -> std::result::Result<MessageMedia, MediaError> {
            match media {
                InputMedia::GeoPoint { geo_point } => Ok(MessageMedia::Geo { geo: *geo_point }),
                other => Err(MediaError::Unsupported { kind: other.kind() }),
            }
        }
    }

    struct Uppercase;

    #[async_trait]
    impl EntitiesFixer for Uppercase {
        async fn fix(
            &self,
            _user_id: i64,
            _peer: &Peer,
            _is_outgoing: bool,
            mut message: Message,
            _has_bot: bool,
        ) -> std::result::Result<Message, EntitiesError> {
            message.message = message.message.to_uppercase();
            message.entities.clear();
            Ok(message)
        }
    }

    /// Marks the record silent and drops the keyboard.
    struct Quiet;

    #[async_trait]
    impl EntitiesFixer for Quiet {
        async fn fix(
            &self,
            _user_id: i64,
            _peer: &Peer,
            _is_outgoing: bool,
            mut message: Message,
            _has_bot: bool,
        ) -> std::result::Result<Message, EntitiesError> {
            message.silent = true;
            message.reply_markup = None;
            Ok(message)
        }
    }

    struct Broken;

    #[async_trait]
    impl EntitiesFixer for Broken {
        async fn fix(
            &self,
            _user_id: i64,
            _peer: &Peer,
            _is_outgoing: bool,
            _message: Message,
            _has_bot: bool,
        ) -> std::result::Result<Message, EntitiesError> {
            Err(EntitiesError::new("malformed"))
        }
    }

    fn geo_request() -> SendMediaRequest {
        let mut req = SendMediaRequest::new(
            InputPeer::SelfPeer,
            InputMedia::GeoPoint {
                geo_point: crate::types::GeoPoint { lat: 1.0, long: 2.0 },
            },
            1,
        );
        req.message = "caption".into();
        req.entities = vec![MessageEntity {
            kind: EntityKind::Bold,
            offset: 0,
            length: 3,
        }];
        req
    }

    fn md() -> RpcMetadata {
        RpcMetadata {
            user_id: 10,
            auth_id: 20,
            is_bot: false,
        }
    }

    fn resolved(peer: Peer) -> ResolvedPeer {
        ResolvedPeer {
            peer,
            linked_chat_id: None,
            has_bot: false,
        }
    }

    #[test]
    fn build_requires_media() {
        let err = MessageBuilder::new(1, Peer::user(2), &geo_request())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord { .. }));
    }

    #[test]
    fn build_requires_fixed_entities() {
        let err = MessageBuilder::new(1, Peer::user(2), &geo_request())
            .media(MessageMedia::Empty)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord {
            missing: "entities"
        }));
    }

    #[tokio::test]
    async fn setter_after_fix_requires_refix() {
        let err = MessageBuilder::new(1, Peer::user(2), &geo_request())
            .media(MessageMedia::Empty)
            .fix_entities(&Uppercase, 1, false)
            .await
            .unwrap()
            .comments_in(Some(9))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord {
            missing: "entities"
        }));
    }

    #[tokio::test]
    async fn fixer_output_replaces_whole_record() {
        let mut req = geo_request();
        req.reply_markup = Some(ReplyMarkup::Inline { rows: Vec::new() });
        let composer = MessageComposer::new(Arc::new(GeoOnly), Arc::new(Quiet));
        let msg = composer
            .compose(&md(), &resolved(Peer::chat(5)), &req)
            .await
            .unwrap();
        assert!(msg.silent);
        assert!(msg.reply_markup.is_none());
        assert_eq!(msg.message, "caption");
    }

    #[tokio::test]
    async fn fix_entities_without_media_is_incomplete() {
        let err = MessageBuilder::new(1, Peer::user(2), &geo_request())
            .fix_entities(&Uppercase, 1, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord { missing: "media" }));
    }

    #[test]
    fn story_reply_leaves_header_empty() {
        let builder = MessageBuilder::new(1, Peer::user(2), &geo_request()).reply_to(Some(
            &InputReplyTo::Story {
                peer: InputPeer::SelfPeer,
                story_id: 3,
            },
        ));
        assert!(builder.reply_to.is_none());
    }

    #[tokio::test]
    async fn composes_self_chat_message() {
        let composer = MessageComposer::new(Arc::new(GeoOnly), Arc::new(Uppercase));
        let msg = composer
            .compose(&md(), &resolved(Peer::user(10)), &geo_request())
            .await
            .unwrap();
        assert!(msg.out);
        assert_eq!(msg.from_id, Peer::user(10));
        assert_eq!(msg.saved_peer_id, Some(Peer::user(10)));
        assert_eq!(msg.message, "CAPTION");
        assert!(msg.entities.is_empty());
        assert!(matches!(msg.media, MessageMedia::Geo { .. }));
        assert!(msg.replies.is_none());
    }

    #[tokio::test]
    async fn other_user_has_no_saved_peer() {
        let composer = MessageComposer::new(Arc::new(GeoOnly), Arc::new(Uppercase));
        let msg = composer
            .compose(&md(), &resolved(Peer::user(11)), &geo_request())
            .await
            .unwrap();
        assert!(msg.saved_peer_id.is_none());
    }

    #[tokio::test]
    async fn fixer_error_keeps_request_entities() {
        let composer = MessageComposer::new(Arc::new(GeoOnly), Arc::new(Broken));
        let msg = composer
            .compose(&md(), &resolved(Peer::chat(5)), &geo_request())
            .await
            .unwrap();
        assert_eq!(msg.message, "caption");
        assert_eq!(msg.entities.len(), 1);
    }

    #[tokio::test]
    async fn media_error_is_surfaced() {
        let composer = MessageComposer::new(Arc::new(GeoOnly), Arc::new(Uppercase));
        let mut req = geo_request();
        req.media = InputMedia::Document {
            id: 1,
            access_hash: 0,
        };
        let err = composer
            .compose(&md(), &resolved(Peer::chat(5)), &req)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MediaBuildFailed(MediaError::Unsupported { kind: "document" })
        ));
    }
}
