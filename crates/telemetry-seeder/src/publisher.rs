//! Message publishing to the ingestion data plane.

use crate::config::PublishConfig;
use crate::error::{Result, SeederError};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Delivery guarantee requested from the ingestion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
}

impl QoS {
    pub fn level(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
        }
    }
}

impl TryFrom<u8> for QoS {
    type Error = SeederError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            _ => Err(SeederError::Config(format!(
                "unsupported qos level {} (expected 0 or 1)",
                level
            ))),
        }
    }
}

/// Sends one message to a topic.
#[async_trait]
pub trait Publisher: Send {
    async fn publish(&mut self, topic: &str, qos: QoS, payload: &[u8]) -> Result<()>;
}

/// Publisher that posts each message to `{scheme}://{endpoint}/topics/{topic}`.
#[derive(Clone)]
pub struct HttpPublisher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPublisher {
    pub fn new(endpoint: &str, config: &PublishConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let raw = format!("{}://{}", config.scheme, endpoint.trim_end_matches('/'));
        let base_url = Url::parse(&raw)
            .map_err(|e| SeederError::Config(format!("invalid endpoint '{}': {}", raw, e)))?;

        Ok(Self { client, base_url })
    }

    /// URL for a topic. The topic is a single percent-encoded path segment,
    /// so `/`, `#` and `?` stay part of the topic name.
    pub fn topic_url(&self, topic: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SeederError::Config(format!("endpoint '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["topics", topic]);
        Ok(url)
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&mut self, topic: &str, qos: QoS, payload: &[u8]) -> Result<()> {
        let response = self
            .client
            .post(self.topic_url(topic)?)
            .query(&[("qos", qos.level())])
            .header("Content-Type", "application/json")
            .body(payload.to_vec())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(SeederError::Publish { status, body })
        }
    }
}

/// Publisher that sends nothing and only counts.
#[derive(Debug, Default)]
pub struct DryRunPublisher {
    pub messages: u64,
    pub bytes: u64,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&mut self, topic: &str, qos: QoS, payload: &[u8]) -> Result<()> {
        self.messages += 1;
        self.bytes += payload.len() as u64;
        debug!(topic, qos = qos.level(), bytes = payload.len(), "dry run publish");
        Ok(())
    }
}
