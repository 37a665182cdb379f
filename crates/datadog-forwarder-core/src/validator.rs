// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ReconcileError;
use crate::provider::CloudProvider;
use crate::template::ForwarderTarget;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a forwarder target validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The target resolved to an invokable function.
    Verified,
    /// The target is a deployment-time expression; presence cannot be
    /// confirmed until the template is rendered.
    Unresolved,
}

/// Confirms the configured forwarder exists before any subscription filter
/// is created. Read-only; gates the whole reconciliation run.
pub struct ForwarderValidator {
    provider: Arc<dyn CloudProvider + Send + Sync>,
}

impl ForwarderValidator {
    pub fn new(provider: Arc<dyn CloudProvider + Send + Sync>) -> Self {
        ForwarderValidator { provider }
    }

    pub async fn validate(
        &self,
        target: &ForwarderTarget,
    ) -> Result<ValidationOutcome, ReconcileError> {
        match target {
            ForwarderTarget::Arn(arn) => match self.provider.invoke_lookup(arn).await {
                Ok(()) => {
                    debug!("Forwarder {arn} exists and is invokable");
                    Ok(ValidationOutcome::Verified)
                }
                Err(e) => {
                    debug!("Forwarder lookup for {arn} failed: {e}");
                    Err(ReconcileError::ForwarderNotFound(arn.clone()))
                }
            },
            ForwarderTarget::Expression(_) => Ok(ValidationOutcome::Unresolved),
        }
    }
}
