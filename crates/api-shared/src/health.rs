use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service for the HTTP API
///
/// Reports liveness plus whether advice is grounded by a loaded knowledge base.
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Arguments
    /// * `grounded` - whether the knowledge base was loaded at startup
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health(grounded: bool) -> HealthRes {
        let message = if grounded {
            "Med-AI is alive"
        } else {
            "Med-AI is alive (no knowledge base loaded)"
        };
        HealthRes {
            ok: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_grounding() {
        assert_eq!(
            HealthService::check_health(true),
            HealthRes {
                ok: true,
                message: "Med-AI is alive".into(),
            }
        );
    }

    #[test]
    fn test_check_health_reports_missing_knowledge_base() {
        let res = HealthService::check_health(false);

        assert!(res.ok);
        assert_eq!(res.message, "Med-AI is alive (no knowledge base loaded)");
    }
}
