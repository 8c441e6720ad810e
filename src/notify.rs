use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::model::NotificationRecord;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery seam for notifications. The real implementation POSTs to the
/// automation hub; tests substitute a recording mock.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, payload: &Value) -> Result<()>;
}

/// HTTP sink posting to `<hub_url>/api/webhook/<webhook_id>`.
#[derive(Clone)]
pub struct WebhookClient {
    http: Client,
    endpoint: Url,
}

impl fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl WebhookClient {
    pub fn new(hub_base_url: &str, webhook_id: &str) -> Result<Self> {
        let base = Url::parse(hub_base_url).context("invalid hub base URL")?;
        let endpoint = base
            .join(&format!("api/webhook/{}", webhook_id))
            .context("invalid webhook endpoint")?;
        let http = Client::builder()
            .user_agent("planka-duebot/0.1")
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .expect("reqwest client");
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WebhookSink for WebhookClient {
    async fn deliver(&self, payload: &Value) -> Result<()> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .context("failed to reach automation hub")?;
        // The hub signals acceptance with 200 exactly.
        if res.status() != StatusCode::OK {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("webhook error {}: {}", status, body));
        }
        Ok(())
    }
}

/// Counts from one dispatch pass. Failed deliveries are logged and counted,
/// never escalated to the process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// JSON body for one notification. The minimal key set is always present;
/// look-ahead mode adds the countdown fields.
pub fn build_payload(record: &NotificationRecord, look_ahead: bool) -> Value {
    let mut payload = json!({
        "taskname": record.task_name,
        "due_date": record.due_date,
        "card_url": record.card_url,
    });
    if look_ahead {
        let obj = payload.as_object_mut().expect("payload is an object");
        obj.insert("days_until_due".into(), json!(record.days_until_due));
        obj.insert("due_status".into(), json!(record.due_status));
    }
    payload
}

/// Deliver every record in order, one call at a time. A failed call is
/// logged and counted; later records are still attempted.
pub async fn dispatch_all(
    sink: &dyn WebhookSink,
    records: &[NotificationRecord],
    look_ahead: bool,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for record in records {
        let payload = build_payload(record, look_ahead);
        match sink.deliver(&payload).await {
            Ok(()) => {
                info!(task = %record.task_name, due = %record.due_date, "notification sent");
                summary.sent += 1;
            }
            Err(err) => {
                warn!(?err, task = %record.task_name, "webhook delivery failed");
                summary.failed += 1;
            }
        }
    }
    summary
}
