// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A subscription filter currently attached to a live log group.
///
/// Fetched per quota check and discarded afterwards; the reconciler never
/// persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionFilterRecord {
    pub filter_name: String,
    pub destination_arn: String,
    pub log_group_name: String,
    /// Creation timestamp in epoch milliseconds, when the platform reports one.
    pub creation_time: Option<i64>,
}

/// Read-only view of the deployed account, supplied by the surrounding
/// deployment pipeline.
#[async_trait]
pub trait CloudProvider {
    /// Resolve invoke metadata for a function identifier. Errors when the
    /// function does not exist or cannot be invoked.
    async fn invoke_lookup(&self, identifier: &str) -> Result<(), ProviderError>;

    /// List the subscription filters attached to a log group.
    async fn list_subscription_filters(
        &self,
        log_group_name: &str,
    ) -> Result<Vec<SubscriptionFilterRecord>, ProviderError>;

    /// Deployed stack identifier, when one can be derived for the current
    /// deployment.
    fn stack_identifier(&self) -> Option<String>;

    fn service_identifier(&self) -> String;

    fn stage_identifier(&self) -> String;
}
