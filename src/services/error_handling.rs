use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Failure channel of a fetch. Delivered to the view through the same
/// completion callback as a successful result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("External service error: {service} - {message}")]
    Service { service: String, message: String },

    #[error("Service responded with HTTP status {code}")]
    Status { code: u16 },

    #[error("Fetch timed out after {duration_secs} seconds")]
    TimedOut { duration_secs: u64 },

    #[error("Fetch aborted: {reason}")]
    Aborted { reason: String },
}

impl FetchError {
    /// Whole seconds, rounded up so sub-second limits never read as zero.
    pub fn timed_out(limit: Duration) -> Self {
        FetchError::TimedOut {
            duration_secs: limit.as_secs() + u64::from(limit.subsec_nanos() > 0),
        }
    }

    /// Converts a service failure, keeping a typed `FetchError` if one is
    /// anywhere in the chain.
    pub fn from_service(service: &str, error: &anyhow::Error) -> Self {
        if let Some(typed) = error.chain().find_map(|cause| cause.downcast_ref::<FetchError>()) {
            return typed.clone();
        }
        FetchError::Service {
            service: service.to_string(),
            message: format!("{:#}", error),
        }
    }
}

/// Structured logging helpers
pub struct LogHelper;

impl LogHelper {
    pub fn log_fetch_failure(view_id: Uuid, token: u64, error: &FetchError) {
        warn!(
            view_id = %view_id,
            token = token,
            error = %error,
            "Fetch failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_from_service_wraps_plain_errors() {
        let err = anyhow::anyhow!("connection refused");
        let converted = FetchError::from_service("samples", &err);
        assert_eq!(
            converted,
            FetchError::Service {
                service: "samples".to_string(),
                message: "connection refused".to_string(),
            }
        );
    }

    #[test]
    fn test_from_service_keeps_typed_error_under_context() {
        let err: anyhow::Result<()> = Err(FetchError::Status { code: 503 }.into());
        let err = err.context("fetching samples").unwrap_err();
        assert_eq!(
            FetchError::from_service("samples", &err),
            FetchError::Status { code: 503 }
        );
    }

    #[test]
    fn test_timed_out_rounds_up_partial_seconds() {
        assert_eq!(
            FetchError::timed_out(Duration::from_millis(20)),
            FetchError::TimedOut { duration_secs: 1 }
        );
        assert_eq!(
            FetchError::timed_out(Duration::from_secs(3)),
            FetchError::TimedOut { duration_secs: 3 }
        );
        assert_eq!(
            FetchError::timed_out(Duration::from_millis(2500)),
            FetchError::TimedOut { duration_secs: 3 }
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::TimedOut { duration_secs: 5 }.to_string(),
            "Fetch timed out after 5 seconds"
        );
        assert_eq!(
            FetchError::Status { code: 404 }.to_string(),
            "Service responded with HTTP status 404"
        );
    }
}
