//! Best-effort supervisor handoff.
//!
//! The composed message travels with the user through the share link; this
//! side channel mirrors it to an optional webhook so the supervisor desk sees
//! requests even when the user never opens the chat. A failure here must not
//! block submission: it is logged and reported as `encaminhado: false`.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use crate::despacho::Modo;

#[derive(Debug, Serialize)]
pub struct Handoff<'a> {
    pub token: &'a str,
    pub modo: Modo,
    pub mensagem: &'a str,
    pub link: &'a str,
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    forward_url: Option<String>,
}

impl Notifier {
    pub fn new(forward_url: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("failed to build forward HTTP client")?;
        Ok(Notifier {
            client,
            forward_url,
        })
    }

    /// Posts the handoff to the configured webhook. Returns whether it got
    /// through; `false` covers both "not configured" and "failed".
    pub async fn forward(&self, handoff: &Handoff<'_>) -> bool {
        let Some(url) = &self.forward_url else {
            return false;
        };

        match self
            .client
            .post(url)
            .json(handoff)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
        {
            Ok(_) => {
                tracing::info!(token = handoff.token, "despacho forwarded to supervisor");
                true
            }
            Err(e) => {
                tracing::warn!(token = handoff.token, "supervisor forward failed: {e}");
                false
            }
        }
    }
}
