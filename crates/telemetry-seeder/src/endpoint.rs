//! Ingestion endpoint resolution.

use crate::config::{EndpointConfig, EndpointType};
use crate::error::{Result, SeederError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Finds the network address of the ingestion endpoint.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    async fn resolve(&self) -> Result<String>;
}

/// Resolver that returns a preconfigured address.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    address: String,
}

impl StaticResolver {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl EndpointResolver for StaticResolver {
    async fn resolve(&self) -> Result<String> {
        if self.address.trim().is_empty() {
            return Err(SeederError::Resolve("configured endpoint is empty".to_string()));
        }
        Ok(self.address.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeEndpointResponse {
    endpoint_address: Option<String>,
}

/// Resolver that asks a directory service for the endpoint address.
#[derive(Clone)]
pub struct DirectoryResolver {
    client: reqwest::Client,
    lookup_url: String,
    endpoint_type: EndpointType,
}

impl DirectoryResolver {
    pub fn new(directory_url: &str, endpoint_type: EndpointType, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let lookup_url = format!("{}/endpoint", directory_url.trim_end_matches('/'));

        Ok(Self {
            client,
            lookup_url,
            endpoint_type,
        })
    }
}

#[async_trait]
impl EndpointResolver for DirectoryResolver {
    async fn resolve(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.lookup_url)
            .query(&[("endpointType", self.endpoint_type.as_str())])
            .send()
            .await
            .map_err(|e| SeederError::Resolve(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SeederError::Resolve(format!(
                "directory returned {} - {}",
                status, body
            )));
        }

        let described: DescribeEndpointResponse = response
            .json()
            .await
            .map_err(|e| SeederError::Resolve(e.to_string()))?;

        match described.endpoint_address {
            Some(address) if !address.trim().is_empty() => {
                info!("Resolved {} endpoint: {}", self.endpoint_type.as_str(), address);
                Ok(address)
            }
            _ => Err(SeederError::Resolve(
                "directory response has no endpoint address".to_string(),
            )),
        }
    }
}

/// Picks a resolver from configuration. A fixed address wins over a directory lookup.
pub fn resolver_from_config(
    config: &EndpointConfig,
    timeout: Duration,
) -> Result<Box<dyn EndpointResolver>> {
    if let Some(address) = &config.address {
        return Ok(Box::new(StaticResolver::new(address.clone())));
    }
    if let Some(url) = &config.directory_url {
        return Ok(Box::new(DirectoryResolver::new(url, config.endpoint_type, timeout)?));
    }
    Err(SeederError::Config(
        "no endpoint address or directory URL configured".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver() {
        let resolver = StaticResolver::new("abc-ats.iot.example.com");
        assert_eq!(resolver.resolve().await.unwrap(), "abc-ats.iot.example.com");

        let empty = StaticResolver::new("  ");
        assert!(matches!(empty.resolve().await, Err(SeederError::Resolve(_))));
    }

    #[tokio::test]
    async fn test_resolver_from_config_prefers_address() {
        let config = EndpointConfig {
            address: Some("fixed.example.com".to_string()),
            directory_url: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        };
        let resolver = resolver_from_config(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(resolver.resolve().await.unwrap(), "fixed.example.com");
    }

    #[test]
    fn test_resolver_from_config_requires_source() {
        let result = resolver_from_config(&EndpointConfig::default(), Duration::from_secs(1));
        assert!(matches!(result, Err(SeederError::Config(_))));
    }

    #[test]
    fn test_describe_response_parsing() {
        let parsed: DescribeEndpointResponse =
            serde_json::from_str(r#"{"endpointAddress":"abc-ats.iot.example.com"}"#).unwrap();
        assert_eq!(parsed.endpoint_address.as_deref(), Some("abc-ats.iot.example.com"));

        let parsed: DescribeEndpointResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.endpoint_address.is_none());
    }
}
