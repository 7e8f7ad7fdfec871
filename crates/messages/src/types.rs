//! Request and record types for outgoing messages.
//!
//! Input descriptors (`Input*`) are closed tagged unions as they arrive from
//! the transport layer. The outbound [`Message`] is the canonical record
//! handed to the delivery subsystem.

use {
    courier_common::Peer,
    serde::{Deserialize, Serialize},
};

// ── Input descriptors ───────────────────────────────────────────────────────

/// How the caller addressed the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPeer {
    /// Placeholder peer; never routable.
    Empty,
    /// The caller's own self-chat.
    #[serde(rename = "self")]
    SelfPeer,
    User {
        user_id: i64,
        #[serde(default)]
        access_hash: i64,
    },
    Chat {
        chat_id: i64,
    },
    Channel {
        channel_id: i64,
        #[serde(default)]
        access_hash: i64,
    },
    /// A user seen in a message the caller has access to.
    UserFromMessage {
        peer: Box<InputPeer>,
        msg_id: i32,
        user_id: i64,
    },
    /// A channel seen in a message the caller has access to.
    ChannelFromMessage {
        peer: Box<InputPeer>,
        msg_id: i32,
        channel_id: i64,
    },
}

impl InputPeer {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::SelfPeer => "self",
            Self::User { .. } => "user",
            Self::Chat { .. } => "chat",
            Self::Channel { .. } => "channel",
            Self::UserFromMessage { .. } => "user_from_message",
            Self::ChannelFromMessage { .. } => "channel_from_message",
        }
    }
}

/// What the new message replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputReplyTo {
    Message {
        reply_to_msg_id: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top_msg_id: Option<i32>,
    },
    Story {
        peer: InputPeer,
        story_id: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub long: f64,
}

/// Media attached to an outgoing message, as described by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputMedia {
    Empty,
    UploadedPhoto {
        file_id: i64,
        #[serde(default)]
        spoiler: bool,
    },
    Photo {
        id: i64,
        #[serde(default)]
        access_hash: i64,
    },
    UploadedDocument {
        file_id: i64,
        mime_type: String,
        #[serde(default)]
        file_name: Option<String>,
    },
    Document {
        id: i64,
        #[serde(default)]
        access_hash: i64,
    },
    GeoPoint {
        geo_point: GeoPoint,
    },
    Contact {
        phone_number: String,
        first_name: String,
        #[serde(default)]
        last_name: String,
        #[serde(default)]
        vcard: String,
    },
    Venue {
        geo_point: GeoPoint,
        title: String,
        address: String,
        #[serde(default)]
        provider: String,
        #[serde(default)]
        venue_id: String,
    },
    Dice {
        emoticon: String,
    },
}

impl InputMedia {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::UploadedPhoto { .. } => "uploaded_photo",
            Self::Photo { .. } => "photo",
            Self::UploadedDocument { .. } => "uploaded_document",
            Self::Document { .. } => "document",
            Self::GeoPoint { .. } => "geo_point",
            Self::Contact { .. } => "contact",
            Self::Venue { .. } => "venue",
            Self::Dice { .. } => "dice",
        }
    }
}

/// Formatting span over the message text. Offsets and lengths are in UTF-16
/// code units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(flatten)]
    pub kind: EntityKind,
    pub offset: i32,
    pub length: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Mention,
    Hashtag,
    BotCommand,
    Url,
    Email,
    Bold,
    Italic,
    Underline,
    Strike,
    Spoiler,
    Blockquote,
    Code,
    Pre { language: String },
    TextUrl { url: String },
    MentionName { user_id: i64 },
    CustomEmoji { document_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

/// Keyboard attached to a message. Passed through to the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyMarkup {
    KeyboardHide {
        #[serde(default)]
        selective: bool,
    },
    ForceReply {
        #[serde(default)]
        single_use: bool,
        #[serde(default)]
        placeholder: Option<String>,
    },
    Keyboard {
        rows: Vec<Vec<KeyboardButton>>,
        #[serde(default)]
        resize: bool,
        #[serde(default)]
        single_use: bool,
    },
    Inline {
        rows: Vec<Vec<KeyboardButton>>,
    },
}

/// A "send message with media" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMediaRequest {
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub background: bool,
    #[serde(default)]
    pub clear_draft: bool,
    #[serde(default)]
    pub noforwards: bool,
    #[serde(default)]
    pub invert_media: bool,
    pub peer: InputPeer,
    #[serde(default)]
    pub reply_to: Option<InputReplyTo>,
    pub media: InputMedia,
    /// Caption.
    #[serde(default)]
    pub message: String,
    /// Client-generated idempotency key.
    pub random_id: i64,
    #[serde(default)]
    pub reply_markup: Option<ReplyMarkup>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    #[serde(default)]
    pub schedule_date: Option<i32>,
    /// Accepted for wire compatibility; sending on behalf of another peer is
    /// not handled here.
    #[serde(default)]
    pub send_as: Option<InputPeer>,
}

impl SendMediaRequest {
    /// A request with every optional field left at its default.
    #[must_use]
    pub fn new(peer: InputPeer, media: InputMedia, random_id: i64) -> Self {
        Self {
            silent: false,
            background: false,
            clear_draft: false,
            noforwards: false,
            invert_media: false,
            peer,
            reply_to: None,
            media,
            message: String::new(),
            random_id,
            reply_markup: None,
            entities: Vec::new(),
            schedule_date: None,
            send_as: None,
        }
    }
}

// ── Outbound record ─────────────────────────────────────────────────────────

/// Media as stored on the outbound record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageMedia {
    Empty,
    Photo {
        photo_id: i64,
        #[serde(default)]
        spoiler: bool,
    },
    Document {
        document_id: i64,
    },
    Geo {
        geo: GeoPoint,
    },
    Contact {
        phone_number: String,
        first_name: String,
        last_name: String,
        vcard: String,
        user_id: i64,
    },
    Venue {
        geo: GeoPoint,
        title: String,
        address: String,
        provider: String,
        venue_id: String,
    },
    Dice {
        value: i32,
        emoticon: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReplyHeader {
    pub reply_to_msg_id: i32,
}

/// Comment-thread linkage of a channel post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReplies {
    pub comments: bool,
    pub replies: i32,
    pub replies_pts: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_repliers: Vec<Peer>,
    /// Linked discussion chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_max_id: Option<i32>,
}

impl MessageReplies {
    /// Empty comment thread living in `linked_chat_id`.
    #[must_use]
    pub fn comments_in(linked_chat_id: i64) -> Self {
        Self {
            comments: true,
            replies: 0,
            replies_pts: 0,
            recent_repliers: Vec::new(),
            channel_id: Some(linked_chat_id),
            max_id: None,
            read_max_id: None,
        }
    }
}

/// Canonical outbound message record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub out: bool,
    pub silent: bool,
    pub noforwards: bool,
    pub invert_media: bool,
    /// Assigned by the delivery subsystem; zero until then.
    pub id: i32,
    pub from_id: Peer,
    pub peer_id: Peer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_peer_id: Option<Peer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageReplyHeader>,
    pub date: i64,
    pub media: MessageMedia,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<MessageReplies>,
}

/// Message plus delivery options, as accepted by the delivery subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub no_webpage: bool,
    pub background: bool,
    pub random_id: i64,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<i32>,
}

/// One call to the delivery subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRequest {
    pub user_id: i64,
    pub auth_key_id: i64,
    pub peer: Peer,
    pub message: OutboxMessage,
}

// ── Delivery result ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Update {
    /// Maps the client's `random_id` to the assigned message id.
    MessageId { id: i32, random_id: i64 },
    NewMessage {
        message: Message,
        pts: i32,
        pts_count: i32,
    },
    NewChannelMessage {
        message: Message,
        pts: i32,
        pts_count: i32,
    },
    NewScheduledMessage { message: Message },
}

/// Result of a successful send, returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Updates {
    pub updates: Vec<Update>,
    pub date: i64,
    pub seq: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_with_defaults() {
        let req: SendMediaRequest = serde_json::from_str(
            r#"{
                "peer": {"type": "self"},
                "media": {"type": "geo_point", "geo_point": {"lat": 1.5, "long": 2.5}},
                "random_id": 9
            }"#,
        )
        .unwrap();
        assert_eq!(req.peer, InputPeer::SelfPeer);
        assert!(req.message.is_empty());
        assert!(!req.clear_draft);
        assert!(req.reply_to.is_none());
        assert_eq!(req.random_id, 9);
    }

    #[test]
    fn entity_kind_is_flattened() {
        let entity = MessageEntity {
            kind: EntityKind::TextUrl {
                url: "https://example.com".into(),
            },
            offset: 0,
            length: 4,
        };
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["type"], "text_url");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["length"], 4);
        let back: MessageEntity = serde_json::from_value(value).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn replies_for_linked_chat_start_empty() {
        let replies = MessageReplies::comments_in(77);
        assert!(replies.comments);
        assert_eq!(replies.channel_id, Some(77));
        assert_eq!(replies.replies, 0);
        assert_eq!(replies.replies_pts, 0);
        assert!(replies.recent_repliers.is_empty());
    }
}
