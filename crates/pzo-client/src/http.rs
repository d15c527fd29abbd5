//! reqwest-backed [`OrderEndpoint`].

use std::time::Duration;

use anyhow::{Context, Result};
use pzo_schemas::{OrderReply, OrderRequest};
use tracing::debug;

use crate::{OrderAccepted, OrderEndpoint, SubmitError};

pub const ORDER_PATH: &str = "/api/order";

/// Posts orders to `{base_url}/api/order`.
///
/// The timeout lives here, in the transport; the submission controller
/// itself never times out.
#[derive(Debug, Clone)]
pub struct HttpOrderEndpoint {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOrderEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build order http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn order_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ORDER_PATH)
    }
}

#[async_trait::async_trait]
impl OrderEndpoint for HttpOrderEndpoint {
    fn endpoint_name(&self) -> &'static str {
        "http"
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAccepted, SubmitError> {
        let url = self.order_url();
        debug!(%url, "posting order");

        let resp = self
            .http
            .post(&url)
            .json(order)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(describe_transport(&e)))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(describe_transport(&e)))?;

        // A body that is not JSON (or has no message) is not fatal on its own:
        // a rejection stays a rejection.
        let message = serde_json::from_slice::<OrderReply>(&body)
            .ok()
            .and_then(|r| r.message);

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match message {
            Some(message) => Ok(OrderAccepted { message }),
            None => Err(SubmitError::Decode(format!(
                "order endpoint returned HTTP {} without a message",
                status.as_u16()
            ))),
        }
    }
}

fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "the order service did not answer in time".to_string()
    } else if e.is_connect() {
        "could not reach the order service".to_string()
    } else {
        format!("order request failed: {e}")
    }
}
