use super::error_handling::FetchError;
use crate::config::ServiceConfig;
use crate::domain::sample::{Sample, SampleQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The external, latency-bearing fetch operation behind the default adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SampleService: Send + Sync {
    async fn get_samples(&self, query: &SampleQuery) -> Result<Vec<Sample>>;
}

/// Real implementation that fetches samples over HTTP
pub struct HttpSampleService {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSampleService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SampleService for HttpSampleService {
    async fn get_samples(&self, query: &SampleQuery) -> Result<Vec<Sample>> {
        debug!(endpoint = %self.endpoint, ?query, "Requesting samples");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query.to_params())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::Error::new(FetchError::timed_out(self.timeout))
                } else {
                    anyhow::Error::new(e)
                }
            })
            .with_context(|| format!("GET {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            }
            .into());
        }

        let samples: Vec<Sample> = response
            .json()
            .await
            .context("Sample service returned malformed JSON")?;
        Ok(samples.into_iter().take(query.limit).collect())
    }
}

/// In-memory service with a fixed catalogue; used for offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSampleService {
    samples: Vec<(Option<String>, Sample)>,
}

impl StaticSampleService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample(mut self, tag: Option<&str>, sample: impl Into<String>) -> Self {
        self.samples
            .push((tag.map(str::to_string), Sample::new(sample)));
        self
    }

    pub fn demo() -> Self {
        Self::new()
            .with_sample(Some("drums"), "kick")
            .with_sample(Some("drums"), "snare")
            .with_sample(Some("drums"), "hihat")
            .with_sample(Some("keys"), "rhodes")
            .with_sample(None, "field-recording")
    }
}

#[async_trait]
impl SampleService for StaticSampleService {
    async fn get_samples(&self, query: &SampleQuery) -> Result<Vec<Sample>> {
        Ok(self
            .samples
            .iter()
            .filter(|(tag, _)| match &query.tag {
                Some(wanted) => tag.as_deref() == Some(wanted.as_str()),
                None => true,
            })
            .map(|(_, sample)| sample.clone())
            .take(query.limit)
            .collect())
    }
}
