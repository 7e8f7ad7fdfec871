use std::sync::Arc;

use {
    courier_common::{Peer, RpcMetadata},
    tracing::{debug, error},
};

use crate::{
    Result,
    traits::DeliveryClient,
    types::{Message, OutboxMessage, OutboxRequest, SendMediaRequest, Updates},
};

/// Transport options carried next to the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryFlags {
    pub background: bool,
    pub random_id: i64,
    pub schedule_date: Option<i32>,
}

impl From<&SendMediaRequest> for DeliveryFlags {
    fn from(request: &SendMediaRequest) -> Self {
        Self {
            background: request.background,
            random_id: request.random_id,
            schedule_date: request.schedule_date,
        }
    }
}

/// Hands composed records to the delivery subsystem.
pub struct DeliveryDispatcher {
    client: Arc<dyn DeliveryClient>,
    no_webpage: bool,
}

impl DeliveryDispatcher {
    pub fn new(client: Arc<dyn DeliveryClient>, no_webpage: bool) -> Self {
        Self { client, no_webpage }
    }

    /// One attempt; the downstream error is returned as-is.
    pub async fn dispatch(
        &self,
        md: &RpcMetadata,
        peer: Peer,
        flags: DeliveryFlags,
        message: Message,
    ) -> Result<Updates> {
        let request = OutboxRequest {
            user_id: md.user_id,
            auth_key_id: md.auth_id,
            peer,
            message: OutboxMessage {
                no_webpage: self.no_webpage,
                background: flags.background,
                random_id: flags.random_id,
                message,
                schedule_date: flags.schedule_date,
            },
        };

        let updates = self.client.send_message(request).await.inspect_err(|e| {
            error!(%peer, code = e.code(), error = %e, "messages.sendMedia - delivery failed");
        })?;
        debug!(%peer, updates = updates.updates.len(), "message delivered");
        Ok(updates)
    }
}
