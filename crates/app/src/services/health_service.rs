//! Health service — probes dependencies and reports how the process is doing.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::ports::HealthProbe;

/// Outcome of one probe or of the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a single probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    /// Milliseconds the probe took.
    pub duration_ms: u128,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    /// Seconds since the service was created.
    pub uptime_secs: u64,
    pub environment: String,
}

impl HealthReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

pub struct HealthService<P> {
    probe: P,
    started: Instant,
    environment: String,
}

impl<P: HealthProbe> HealthService<P> {
    pub fn new(probe: P, environment: impl Into<String>) -> Self {
        Self {
            probe,
            started: Instant::now(),
            environment: environment.into(),
        }
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Run every probe and fold the results into one report.
    #[tracing::instrument(skip(self))]
    pub async fn report(&self) -> HealthReport {
        let start = Instant::now();
        let outcome = self.probe.check().await;
        let duration_ms = start.elapsed().as_millis();

        let check = match outcome {
            Ok(()) => HealthCheck {
                name: self.probe.name(),
                status: HealthStatus::Healthy,
                duration_ms,
                description: self.probe.description(),
                error: None,
            },
            Err(err) => {
                tracing::warn!(probe = self.probe.name(), error = %err, "health probe failed");
                HealthCheck {
                    name: self.probe.name(),
                    status: HealthStatus::Unhealthy,
                    duration_ms,
                    description: self.probe.description(),
                    error: Some(err.to_string()),
                }
            }
        };

        let status = if check.status == HealthStatus::Healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport {
            status,
            checks: vec![check],
            uptime_secs: self.uptime().as_secs(),
            environment: self.environment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::in_memory::InMemoryStore;

    #[tokio::test]
    async fn should_report_healthy_when_probe_succeeds() {
        let svc = HealthService::new(InMemoryStore::default(), "Testing");

        let report = svc.report().await;

        assert!(report.is_healthy());
        assert_eq!(report.environment, "Testing");
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].name, "memory");
        assert!(report.checks[0].error.is_none());
    }

    #[tokio::test]
    async fn should_report_unhealthy_when_probe_fails() {
        let store = InMemoryStore {
            unhealthy: true,
            ..InMemoryStore::default()
        };
        let svc = HealthService::new(store, "Testing");

        let report = svc.report().await;

        assert!(!report.is_healthy());
        assert_eq!(report.checks[0].status, HealthStatus::Unhealthy);
        assert!(report.checks[0].error.is_some());
    }
}
