//! # Metrics
//!
//! Prometheus counters for the two flows worth watching: comment moderation
//! outcomes and admin login outcomes.

use domains::{DomainError, DomainResult};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OutcomeLabels {
    outcome: &'static str,
}

#[derive(Debug)]
pub struct Metrics {
    registry: Registry,
    comment_submissions: Family<OutcomeLabels, Counter>,
    logins: Family<OutcomeLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("campus");

        let comment_submissions = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "comment_submissions",
            "Comment submissions by moderation outcome",
            comment_submissions.clone(),
        );

        let logins = Family::<OutcomeLabels, Counter>::default();
        registry.register("admin_logins", "Admin login attempts by outcome", logins.clone());

        Self {
            registry,
            comment_submissions,
            logins,
        }
    }

    pub fn record_comment<T>(&self, result: &DomainResult<T>) {
        let outcome = match result {
            Ok(_) => "accepted",
            Err(DomainError::EmptyInput { .. }) => "empty",
            Err(DomainError::NotFound { .. }) => "not_found",
            Err(DomainError::CommentsDisabled) => "disabled",
            Err(DomainError::ForbiddenContent) => "blocked",
            Err(_) => "error",
        };
        self.comment_submissions
            .get_or_create(&OutcomeLabels { outcome })
            .inc();
    }

    pub fn record_login<T>(&self, result: &DomainResult<T>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(DomainError::Auth(_)) => "rejected",
            Err(DomainError::Validation(_)) => "invalid",
            Err(_) => "error",
        };
        self.logins.get_or_create(&OutcomeLabels { outcome }).inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
