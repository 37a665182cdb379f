// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::provider::CloudProvider;
use std::sync::Arc;
use tracing::debug;

/// Platform-enforced maximum number of subscription filters per log group.
pub const MAX_LOG_GROUP_SUBSCRIPTIONS: usize = 2;

/// Decides whether a subscription filter can be added to a log group without
/// exceeding the platform quota.
pub struct SubscriptionQuotaChecker {
    provider: Arc<dyn CloudProvider + Send + Sync>,
}

impl SubscriptionQuotaChecker {
    pub fn new(provider: Arc<dyn CloudProvider + Send + Sync>) -> Self {
        SubscriptionQuotaChecker { provider }
    }

    /// Whether a filter named with `expected_name_prefix` may be created on
    /// `log_group_name`.
    ///
    /// A filter from a previous run of our own (name starts with the expected
    /// prefix) always admits: re-adding it overwrites in place and cannot push
    /// the group over quota. Otherwise the group admits only while it is below
    /// [`MAX_LOG_GROUP_SUBSCRIPTIONS`].
    ///
    /// A failed listing (including a log group that does not exist yet because
    /// it is declared in this very template) counts as zero live filters.
    /// Single attempt per log group; the pipeline can be re-run idempotently.
    pub async fn can_subscribe(&self, log_group_name: &str, expected_name_prefix: &str) -> bool {
        let filters = match self.provider.list_subscription_filters(log_group_name).await {
            Ok(filters) => filters,
            Err(e) => {
                debug!(
                    "Could not list subscription filters for {log_group_name} ({e}); treating as none"
                );
                Vec::new()
            }
        };

        if filters
            .iter()
            .any(|filter| filter.filter_name.starts_with(expected_name_prefix))
        {
            debug!("Log group {log_group_name} already carries our subscription filter");
            return true;
        }

        filters.len() < MAX_LOG_GROUP_SUBSCRIPTIONS
    }
}
