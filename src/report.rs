//! Result reporter: best-effort delivery of a finished level to the tracking endpoint.

use crate::config::ReportParams;
use crate::engine::{CompletionToken, SessionId};
use crate::error::{LedgerError, LfResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::Display;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Wire body expected by the tracking endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    /// 1-based level number, as a string.
    pub level_id: String,
    pub score: u32,
    /// Whole seconds from level start to completion.
    pub time: u64,
}

impl SubmissionPayload {
    pub fn new(learner: &str, token: &CompletionToken) -> Self {
        Self {
            name: learner.to_string(),
            level_id: token.level_number().to_string(),
            score: token.score,
            time: token.elapsed_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    NotAttempted,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub session: SessionId,
    pub status: SubmissionStatus,
}

pub struct Reporter {
    client: Client,
    params: ReportParams,
}

impl Reporter {
    pub fn new(params: ReportParams) -> LfResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(params.timeout_ms))
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self { client, params })
    }

    pub fn is_enabled(&self) -> bool {
        !self.params.endpoint.is_empty()
    }

    /// Sends the result. The response body is never inspected: any completed
    /// HTTP exchange counts as sent.
    pub async fn submit(&self, learner: &str, token: CompletionToken) -> SubmissionReceipt {
        let session = token.session;
        if !self.is_enabled() {
            return SubmissionReceipt {
                session,
                status: SubmissionStatus::NotAttempted,
            };
        }

        let payload = SubmissionPayload::new(learner, &token);
        let body = match serde_json::to_string(&payload) {
            Ok(b) => b,
            Err(e) => {
                warn!("Could not encode submission: {}", e);
                return SubmissionReceipt {
                    session,
                    status: SubmissionStatus::Failed,
                };
            }
        };

        info!(
            "📤 Submitting level {} for {}: score {}, {}s",
            payload.level_id, payload.name, payload.score, payload.time
        );

        let attempts = self.params.max_retries + 1;
        for attempt in 1..=attempts {
            match self.post_once(&body).await {
                Ok(()) => {
                    info!("Submission sent (response not inspected)");
                    return SubmissionReceipt {
                        session,
                        status: SubmissionStatus::Sent,
                    };
                }
                Err(e) => {
                    warn!("Submission attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(self.params.retry_backoff_ms))
                            .await;
                    }
                }
            }
        }

        SubmissionReceipt {
            session,
            status: SubmissionStatus::Failed,
        }
    }

    /// Fire-and-forget: runs `submit` on the tokio runtime.
    pub fn dispatch(
        self: &Arc<Self>,
        learner: String,
        token: CompletionToken,
    ) -> JoinHandle<SubmissionReceipt> {
        let reporter = Arc::clone(self);
        tokio::spawn(async move { reporter.submit(&learner, token).await })
    }

    async fn post_once(&self, body: &str) -> LfResult<()> {
        self.client
            .post(&self.params.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(())
    }
}
