use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_LIMIT: usize = 20;

/// One item returned by the sample service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sample(pub String);

impl Sample {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Sample {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options passed to the sample fetch on every trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleQuery {
    pub tag: Option<String>,
    pub limit: usize,
}

impl Default for SampleQuery {
    fn default() -> Self {
        Self {
            tag: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SampleQuery {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Query-string pairs for the HTTP service. `tag` is omitted when unset.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(tag) = &self.tag {
            params.push(("tag", tag.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = SampleQuery::default();
        assert_eq!(query.tag, None);
        assert_eq!(query.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_params_without_tag() {
        let query = SampleQuery::default().with_limit(5);
        assert_eq!(query.to_params(), vec![("limit", "5".to_string())]);
    }

    #[test]
    fn test_params_with_tag() {
        let query = SampleQuery::default().with_tag("drums");
        let params = query.to_params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("tag", "drums".to_string())));
    }

    #[test]
    fn test_sample_deserializes_from_plain_strings() {
        let samples: Vec<Sample> = serde_json::from_str(r#"["hello", "world"]"#).unwrap();
        assert_eq!(samples, vec![Sample::from("hello"), Sample::from("world")]);
        assert_eq!(samples[0].to_string(), "hello");
    }
}
