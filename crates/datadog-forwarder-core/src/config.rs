// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ReconcileError;
use crate::template::ForwarderTarget;
use std::env;

const DEFAULT_LOOKUP_CONCURRENCY: usize = 5;

/// Configuration for one reconciliation run.
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Destination function the subscription filters point at.
    pub target: ForwarderTarget,
    /// Upper bound on in-flight subscription filter lookups, to stay under
    /// the platform's API rate limits.
    pub lookup_concurrency: usize,
}

impl ForwarderConfig {
    pub fn new(target: ForwarderTarget) -> Self {
        ForwarderConfig {
            target,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ReconcileError> {
        let target = env::var("DD_FORWARDER_ARN")
            .map(ForwarderTarget::Arn)
            .map_err(|_| {
                ReconcileError::InvalidConfig(
                    "DD_FORWARDER_ARN environment variable is not set".to_string(),
                )
            })?;
        let lookup_concurrency = env::var("DD_FORWARDER_LOOKUP_CONCURRENCY")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LOOKUP_CONCURRENCY);

        let config = ForwarderConfig {
            target,
            lookup_concurrency,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if let Some(arn) = self.target.as_arn() {
            if arn.trim().is_empty() {
                return Err(ReconcileError::InvalidConfig(
                    "forwarder ARN cannot be empty".to_string(),
                ));
            }
        }

        if self.lookup_concurrency == 0 {
            return Err(ReconcileError::InvalidConfig(
                "lookup concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
