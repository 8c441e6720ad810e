use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use planka_duebot::{config, filter, notify, planka};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Notify an automation hub about board cards due soon"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured due-date horizon in days
    #[arg(long)]
    horizon: Option<u32>,

    /// Walk and filter, but log matches instead of calling the webhook
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.app.log_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let horizon_days = args.horizon.unwrap_or(cfg.app.horizon_days);
    let look_ahead = horizon_days > 0;

    let client = planka::PlankaClient::login(
        &cfg.planka.base_url,
        &cfg.planka.username,
        &cfg.planka.password,
    )
    .await?;
    let me = client.me().await?;
    let who = me.name.or(me.username).unwrap_or(me.id);
    info!(user = %who, "authenticated to board");

    let tree = client.fetch_tree().await?;
    let today = chrono::Utc::now().date_naive();
    let records = filter::collect_due(&tree, today, horizon_days)?;
    info!(matches = records.len(), horizon_days, "due-date scan complete");

    if args.dry_run {
        for record in &records {
            info!(
                task = %record.task_name,
                due = %record.due_date,
                status = %record.due_status,
                url = %record.card_url,
                "would notify"
            );
        }
        return Ok(());
    }

    let webhook = notify::WebhookClient::new(&cfg.hub.base_url, &cfg.hub.webhook_id)?;
    let summary = notify::dispatch_all(&webhook, &records, look_ahead).await;
    info!(sent = summary.sent, failed = summary.failed, "run complete");

    Ok(())
}
