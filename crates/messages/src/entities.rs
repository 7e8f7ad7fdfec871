use {async_trait::async_trait, courier_common::Peer};

use crate::{
    error::EntitiesError,
    traits::EntitiesFixer,
    types::{EntityKind, Message},
    validate::utf16_len,
};

/// Drops entities that fall outside the text and orders the rest by offset.
///
/// Fails when a mention-name entity points at no user.
pub struct BoundsEntitiesFixer;

#[async_trait]
impl EntitiesFixer for BoundsEntitiesFixer {
    async fn fix(
        &self,
        _user_id: i64,
        _peer: &Peer,
        _is_outgoing: bool,
        mut message: Message,
        _has_bot: bool,
    ) -> Result<Message, EntitiesError> {
        if message
            .entities
            .iter()
            .any(|e| matches!(e.kind, EntityKind::MentionName { user_id } if user_id <= 0))
        {
            return Err(EntitiesError::new("mention name without user"));
        }

        let text_len = i64::try_from(utf16_len(&message.message)).unwrap_or(i64::MAX);
        message.entities.retain(|e| {
            e.offset >= 0 && e.length > 0 && i64::from(e.offset) + i64::from(e.length) <= text_len
        });
        message.entities.sort_by_key(|e| (e.offset, std::cmp::Reverse(e.length)));
        Ok(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::types::{MessageEntity, MessageMedia},
    };

    fn entity(kind: EntityKind, offset: i32, length: i32) -> MessageEntity {
        MessageEntity {
            kind,
            offset,
            length,
        }
    }

    fn message(text: &str, entities: Vec<MessageEntity>) -> Message {
        Message {
            out: true,
            silent: false,
            noforwards: false,
            invert_media: false,
            id: 0,
            from_id: Peer::user(1),
            peer_id: Peer::user(2),
            saved_peer_id: None,
            reply_to: None,
            date: 0,
            media: MessageMedia::Empty,
            message: text.into(),
            reply_markup: None,
            entities,
            replies: None,
        }
    }

    async fn fix(msg: Message) -> Result<Message, EntitiesError> {
        BoundsEntitiesFixer
            .fix(1, &Peer::user(2), true, msg, false)
            .await
    }

    #[tokio::test]
    async fn drops_out_of_bounds_and_empty() {
        let fixed = fix(message("hello", vec![
            entity(EntityKind::Bold, 0, 5),
            entity(EntityKind::Italic, 3, 10),
            entity(EntityKind::Code, 2, 0),
            entity(EntityKind::Underline, -1, 2),
        ]))
        .await
        .unwrap();
        assert_eq!(fixed.entities, vec![entity(EntityKind::Bold, 0, 5)]);
    }

    #[tokio::test]
    async fn counts_utf16_units() {
        // The emoji takes two UTF-16 code units.
        let fixed = fix(message("😀 hi", vec![
            entity(EntityKind::Bold, 0, 2),
            entity(EntityKind::Italic, 3, 2),
            entity(EntityKind::Strike, 3, 3),
        ]))
        .await
        .unwrap();
        assert_eq!(fixed.entities.len(), 2);
    }

    #[tokio::test]
    async fn sorts_by_offset_outer_first() {
        let fixed = fix(message("abcdef", vec![
            entity(EntityKind::Italic, 2, 1),
            entity(EntityKind::Bold, 0, 2),
            entity(EntityKind::Underline, 2, 4),
        ]))
        .await
        .unwrap();
        let offsets: Vec<_> = fixed.entities.iter().map(|e| (e.offset, e.length)).collect();
        assert_eq!(offsets, vec![(0, 2), (2, 4), (2, 1)]);
    }

    #[tokio::test]
    async fn rejects_mention_without_user() {
        let err = fix(message("@x", vec![entity(
            EntityKind::MentionName { user_id: 0 },
            0,
            2,
        )]))
        .await
        .unwrap_err();
        assert!(err.message.contains("mention"));
    }
}
