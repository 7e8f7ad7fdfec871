use std::sync::Arc;

use {
    courier_common::RpcMetadata,
    courier_config::MessagesConfig,
    tracing::{debug, error},
};

#[cfg(feature = "metrics")]
use {
    courier_metrics::{counter, histogram, labels, messages as msg_metrics},
    std::time::Instant,
};

use crate::{
    Result,
    compose::MessageComposer,
    dispatch::{DeliveryDispatcher, DeliveryFlags},
    drafts::DraftClearScheduler,
    peer::PeerResolver,
    traits::{
        ChannelLookup, DeliveryClient, DraftStore, EntitiesFixer, MediaBuilder, NoopChannelLookup,
        NoopDraftStore, NoopUserLookup, UserLookup,
    },
    types::{SendMediaRequest, Updates},
    validate::CaptionValidator,
};

/// External services the pipeline calls into.
pub struct Collaborators {
    pub media: Arc<dyn MediaBuilder>,
    pub entities: Arc<dyn EntitiesFixer>,
    pub delivery: Arc<dyn DeliveryClient>,
    pub drafts: Arc<dyn DraftStore>,
    pub channels: Arc<dyn ChannelLookup>,
    pub users: Arc<dyn UserLookup>,
}

impl Collaborators {
    /// Required services only; drafts and lookups default to `Noop`.
    pub fn new(
        media: Arc<dyn MediaBuilder>,
        entities: Arc<dyn EntitiesFixer>,
        delivery: Arc<dyn DeliveryClient>,
    ) -> Self {
        Self {
            media,
            entities,
            delivery,
            drafts: Arc::new(NoopDraftStore),
            channels: Arc::new(NoopChannelLookup),
            users: Arc::new(NoopUserLookup),
        }
    }

    #[must_use]
    pub fn with_drafts(mut self, drafts: Arc<dyn DraftStore>) -> Self {
        self.drafts = drafts;
        self
    }

    #[must_use]
    pub fn with_channels(mut self, channels: Arc<dyn ChannelLookup>) -> Self {
        self.channels = channels;
        self
    }

    #[must_use]
    pub fn with_users(mut self, users: Arc<dyn UserLookup>) -> Self {
        self.users = users;
        self
    }
}

/// `messages.*` request handlers.
pub struct MessagesCore {
    resolver: PeerResolver,
    validator: CaptionValidator,
    composer: MessageComposer,
    dispatcher: DeliveryDispatcher,
    drafts: DraftClearScheduler,
}

impl MessagesCore {
    pub fn new(config: &MessagesConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            media,
            entities,
            delivery,
            drafts,
            channels,
            users,
        } = collaborators;
        Self {
            resolver: PeerResolver::new(channels, users),
            validator: CaptionValidator::new(config.max_caption_length),
            composer: MessageComposer::new(media, entities),
            dispatcher: DeliveryDispatcher::new(delivery, config.no_webpage),
            drafts: DraftClearScheduler::new(drafts),
        }
    }

    /// Background draft cleanups started by this handler.
    pub fn drafts(&self) -> &DraftClearScheduler {
        &self.drafts
    }

    /// `messages.sendMedia`: resolve, validate, compose, deliver, then clear
    /// the draft in the background if asked to.
    pub async fn send_media(&self, md: &RpcMetadata, request: SendMediaRequest) -> Result<Updates> {
        #[cfg(feature = "metrics")]
        let started = Instant::now();
        #[cfg(feature = "metrics")]
        counter!(msg_metrics::SEND_MEDIA_TOTAL).increment(1);

        let result = self.run_send_media(md, &request).await;

        #[cfg(feature = "metrics")]
        histogram!(msg_metrics::SEND_MEDIA_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        if let Err(ref e) = result {
            #[cfg(feature = "metrics")]
            counter!(msg_metrics::SEND_MEDIA_ERRORS_TOTAL, labels::CODE => e.code().to_string())
                .increment(1);
            debug!(user_id = md.user_id, code = e.code(), "messages.sendMedia failed");
        }
        result
    }

    async fn run_send_media(&self, md: &RpcMetadata, request: &SendMediaRequest) -> Result<Updates> {
        let resolved = self.resolver.resolve(md, &request.peer).await?;
        self.validator.validate(&request.message).inspect_err(|e| {
            error!(error = %e, "messages.sendMedia - invalid caption");
        })?;

        let message = self.composer.compose(md, &resolved, request).await?;
        let updates = self
            .dispatcher
            .dispatch(md, resolved.peer, DeliveryFlags::from(request), message)
            .await?;

        if request.clear_draft {
            debug!(user_id = md.user_id, peer = %resolved.peer, "scheduling draft clear");
            self.drafts.schedule(md.user_id, md.auth_id, resolved.peer);
        }
        Ok(updates)
    }
}
