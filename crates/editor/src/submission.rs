//! Best-effort submission of the user's name to a form endpoint.
//!
//! The outcome never affects the editor flow: failures are logged and the
//! session moves on after its fixed delay either way.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use posterframe_common::config::SubmissionConfig;
use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::name::UserName;

static POSTERFRAME_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct NamePayload<'a> {
    name: &'a str,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// No endpoint configured.
    Disabled,
    /// The endpoint answered with a success status.
    Accepted { status: u16 },
    /// Network error or non-success status.
    Failed { reason: String },
}

/// Posts names to the configured endpoint.
#[derive(Debug, Clone)]
pub struct NameSubmitter {
    endpoint: Option<String>,
    client: Client,
}

impl NameSubmitter {
    pub fn new(config: &SubmissionConfig) -> PosterResult<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(POSTERFRAME_USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PosterError::config(format!("Failed to construct HTTP client: {e}")))?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    /// A submitter that never contacts the network.
    pub fn disabled() -> PosterResult<Self> {
        Self::new(&SubmissionConfig {
            endpoint: None,
            ..SubmissionConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// POST `{"name": ...}` as JSON. Never returns an error.
    pub async fn submit(&self, name: &UserName) -> SubmissionOutcome {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return SubmissionOutcome::Disabled;
        };

        let payload = NamePayload {
            name: name.as_str(),
        };
        match self.client.post(endpoint).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(status = %response.status(), "Name submitted");
                SubmissionOutcome::Accepted {
                    status: response.status().as_u16(),
                }
            }
            Ok(response) => {
                tracing::warn!(
                    endpoint,
                    status = %response.status(),
                    "Name submission rejected"
                );
                SubmissionOutcome::Failed {
                    reason: format!("HTTP {}", response.status()),
                }
            }
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "Name submission failed");
                SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Submit on a detached task and return immediately.
    pub fn submit_detached(&self, name: UserName) -> tokio::task::JoinHandle<SubmissionOutcome> {
        let submitter = self.clone();
        tokio::spawn(async move { submitter.submit(&name).await })
    }
}
