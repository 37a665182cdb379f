// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Pre-deploy reconciliation of function log group subscriptions against the
//! Datadog forwarder.
//!
//! Given a compiled infrastructure template and a read-only view of the
//! deployed account, the [`Reconciler`] subscribes every function-managed log
//! group to the configured forwarder, without ever pushing a log group past
//! the platform's subscription filter quota and without blocking repeated
//! deployments once its own filter is in place. Per-log-group conditions are
//! returned as deploy-time warnings; only a dead forwarder target fails the
//! run.

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod provider;
pub mod quota;
pub mod reconciler;
pub mod template;
pub mod validator;

pub use config::ForwarderConfig;
pub use error::{ProviderError, ReconcileError};
pub use provider::{CloudProvider, SubscriptionFilterRecord};
pub use quota::{SubscriptionQuotaChecker, MAX_LOG_GROUP_SUBSCRIPTIONS};
pub use reconciler::{Reconciler, NO_RESOURCES_WARNING, UNRESOLVED_TARGET_WARNING};
pub use template::{
    ForwarderTarget, InfrastructureTemplate, Resource, SubscriptionFilter,
    LAMBDA_LOG_GROUP_PREFIX, MATCH_ALL_FILTER_PATTERN,
};
pub use validator::{ForwarderValidator, ValidationOutcome};
