//! In-process stand-ins for the delivery and draft services.

use std::sync::atomic::{AtomicI32, Ordering};

use {
    async_trait::async_trait,
    courier_common::{Peer, PeerType},
    courier_messages::{
        DeliveryClient, DeliveryError, DraftError, DraftStore, OutboxRequest, Update, Updates,
    },
    tracing::info,
};

/// Accepts every message and assigns sequential ids and pts.
#[derive(Default)]
pub struct LoopbackDelivery {
    next_id: AtomicI32,
}

#[async_trait]
impl DeliveryClient for LoopbackDelivery {
    async fn send_message(&self, request: OutboxRequest) -> Result<Updates, DeliveryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let OutboxRequest {
            peer,
            message: outbox,
            ..
        } = request;
        let mut message = outbox.message;
        message.id = id;
        let date = message.date;

        let delivered = if outbox.schedule_date.is_some() {
            Update::NewScheduledMessage { message }
        } else if peer.peer_type == PeerType::Channel {
            Update::NewChannelMessage {
                message,
                pts: id,
                pts_count: 1,
            }
        } else {
            Update::NewMessage {
                message,
                pts: id,
                pts_count: 1,
            }
        };
        info!(%peer, id, random_id = outbox.random_id, "loopback delivered message");

        Ok(Updates {
            updates: vec![
                Update::MessageId {
                    id,
                    random_id: outbox.random_id,
                },
                delivered,
            ],
            date,
            seq: 0,
        })
    }
}

/// Logs draft clears instead of storing drafts.
pub struct LoggingDraftStore;

#[async_trait]
impl DraftStore for LoggingDraftStore {
    async fn clear_draft(&self, user_id: i64, auth_id: i64, peer: &Peer) -> Result<(), DraftError> {
        info!(user_id, auth_id, %peer, "draft cleared");
        Ok(())
    }
}
