// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by the cloud provider collaborator.
///
/// A `NotFound` from a subscription filter listing is an expected condition
/// (the log group may be declared in the template but not deployed yet) and
/// is absorbed by the quota checker. Only the forwarder existence lookup
/// turns a provider error into a fatal [`ReconcileError`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("cloud request failed: {0}")]
    Request(String),
}

/// Fatal errors for a reconciliation run.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("forwarder \"{0}\" does not exist or cannot be invoked")]
    ForwarderNotFound(String),
}
