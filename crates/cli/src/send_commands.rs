use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    anyhow::{Context, Result},
    clap::Args,
    courier_common::RpcMetadata,
    courier_config::CourierConfig,
    courier_messages::{
        BoundsEntitiesFixer, Collaborators, InlineMediaBuilder, MessagesCore, SendMediaRequest,
    },
    courier_metrics::{MetricsRecorderConfig, init_metrics},
    tracing::debug,
};

use crate::loopback::{LoggingDraftStore, LoopbackDelivery};

#[derive(Args)]
pub struct SendMediaArgs {
    /// JSON request file, or `-` for stdin.
    #[arg(long)]
    request: PathBuf,
    /// Caller user id.
    #[arg(long)]
    user_id: i64,
    /// Caller auth key id.
    #[arg(long, default_value_t = 0)]
    auth_id: i64,
    /// Treat the caller as a bot.
    #[arg(long, default_value_t = false)]
    bot: bool,
    /// Print collected metrics to stderr after the send.
    #[arg(long, default_value_t = false)]
    print_metrics: bool,
}

pub async fn handle_send_media(args: SendMediaArgs, config: &CourierConfig) -> Result<()> {
    let metrics = init_metrics(MetricsRecorderConfig {
        enabled: config.metrics.enabled,
        global_labels: config.metrics.labels.clone(),
    })?;

    let request = read_request(&args.request)?;
    let md = RpcMetadata {
        user_id: args.user_id,
        auth_id: args.auth_id,
        is_bot: args.bot,
    };

    let collaborators = Collaborators::new(
        Arc::new(InlineMediaBuilder),
        Arc::new(BoundsEntitiesFixer),
        Arc::new(LoopbackDelivery::default()),
    )
    .with_drafts(Arc::new(LoggingDraftStore));
    let core = MessagesCore::new(&config.messages, collaborators);

    let result = core.send_media(&md, request).await;
    debug!(pending = core.drafts().pending(), "waiting for draft cleanups");
    core.drafts().shutdown().await;

    let updates = result.map_err(|e| anyhow::anyhow!("{}: {e}", e.code()))?;
    println!("{}", serde_json::to_string_pretty(&updates)?);

    if args.print_metrics {
        eprintln!("{}", metrics.render());
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<SendMediaRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("invalid sendMedia request")
}
