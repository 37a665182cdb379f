// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::ForwarderConfig;
use crate::error::ReconcileError;
use crate::provider::CloudProvider;
use crate::quota::{SubscriptionQuotaChecker, MAX_LOG_GROUP_SUBSCRIPTIONS};
use crate::template::InfrastructureTemplate;
use crate::validator::{ForwarderValidator, ValidationOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Result entry returned when the compiled template carries no resource
/// section at all.
pub const NO_RESOURCES_WARNING: &str =
    "no compiled resources section found; skipping log group subscription setup";

/// Advisory returned when the forwarder target cannot be verified before the
/// template is rendered.
pub const UNRESOLVED_TARGET_WARNING: &str =
    "forwarder target is an unresolved deployment-time expression; skipping the existence check";

/// Sequences the forwarder validation, quota checks and template mutations
/// for one deployment.
///
/// Per-log-group conditions never abort the run; they are collected into the
/// returned warning sequence so the deployment pipeline can surface them to
/// the operator. Only a dead forwarder target is fatal, and it fails the run
/// before the template is touched.
pub struct Reconciler {
    provider: Arc<dyn CloudProvider + Send + Sync>,
    config: ForwarderConfig,
}

struct NamingContext {
    stack: Option<String>,
    service: String,
    stage: String,
}

impl NamingContext {
    /// Name stem our subscription filters carry on this log group across
    /// repeated deployments. The stack identifier wins over the
    /// service/stage pair when both are derivable: it is more specific and
    /// stable across service renames.
    fn expected_filter_prefix(&self, log_group_logical_id: &str) -> String {
        let subscription_id = InfrastructureTemplate::subscription_logical_id(log_group_logical_id);
        match &self.stack {
            Some(stack) => format!("{stack}-{subscription_id}"),
            None => format!("{}-{}-{}", self.service, self.stage, subscription_id),
        }
    }
}

impl Reconciler {
    pub fn new(provider: Arc<dyn CloudProvider + Send + Sync>, config: ForwarderConfig) -> Self {
        Reconciler { provider, config }
    }

    /// Subscribe every admissible function log group in the template to the
    /// configured forwarder.
    ///
    /// Returns the accumulated warning sequence; empty means full success.
    /// The fatal paths are an invalid configuration and a literal forwarder
    /// ARN that fails the existence lookup; both leave the template
    /// unmodified.
    pub async fn reconcile(
        &self,
        template: &mut InfrastructureTemplate,
    ) -> Result<Vec<String>, ReconcileError> {
        // a zero lookup bound would park the fan-out on an empty semaphore
        self.config.validate()?;

        if !template.has_resources() {
            info!("Compiled template has no resources; nothing to subscribe");
            return Ok(vec![NO_RESOURCES_WARNING.to_string()]);
        }

        let mut warnings = Vec::new();

        // The forwarder gate must settle before any log group is processed.
        let validator = ForwarderValidator::new(Arc::clone(&self.provider));
        match validator.validate(&self.config.target).await? {
            ValidationOutcome::Verified => {}
            ValidationOutcome::Unresolved => {
                warn!("Cannot verify the forwarder before deploy; continuing");
                warnings.push(UNRESOLVED_TARGET_WARNING.to_string());
            }
        }

        let log_groups: Vec<(String, String)> = template
            .lambda_log_groups()
            .map(|(logical_id, name)| (logical_id.to_string(), name.to_string()))
            .collect();
        debug!(
            "Found {} function log groups in the compiled template",
            log_groups.len()
        );

        let naming = NamingContext {
            stack: self.provider.stack_identifier(),
            service: self.provider.service_identifier(),
            stage: self.provider.stage_identifier(),
        };

        // Quota lookups are independent network calls; fan them out, bounded
        // by the configured concurrency.
        let checker = Arc::new(SubscriptionQuotaChecker::new(Arc::clone(&self.provider)));
        let semaphore = Arc::new(Semaphore::new(self.config.lookup_concurrency));
        let mut lookups = JoinSet::new();
        for (index, (logical_id, log_group_name)) in log_groups.iter().enumerate() {
            let prefix = naming.expected_filter_prefix(logical_id);
            let log_group_name = log_group_name.clone();
            let checker = Arc::clone(&checker);
            let semaphore = Arc::clone(&semaphore);
            lookups.spawn(async move {
                // the semaphore is never closed while lookups are draining
                let _permit = semaphore.acquire_owned().await.ok();
                (index, checker.can_subscribe(&log_group_name, &prefix).await)
            });
        }

        let mut admitted: Vec<Option<bool>> = vec![None; log_groups.len()];
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((index, can_subscribe)) => admitted[index] = Some(can_subscribe),
                Err(e) => error!("Subscription filter lookup task failed: {e}"),
            }
        }

        // Single-writer pass over the template, in scan order.
        for (index, (logical_id, log_group_name)) in log_groups.iter().enumerate() {
            match admitted[index] {
                Some(true) => {
                    debug!("Subscribing log group {log_group_name} to the forwarder");
                    template.add_subscription(logical_id, &self.config.target);
                }
                Some(false) => {
                    warn!("Log group {log_group_name} is at the subscription filter quota; skipping");
                    warnings.push(format!(
                        "log group {log_group_name} already has {MAX_LOG_GROUP_SUBSCRIPTIONS} subscription filters; not subscribing it to the forwarder"
                    ));
                }
                None => {
                    warnings.push(format!(
                        "subscription filter check for log group {log_group_name} did not complete; not subscribing it to the forwarder"
                    ));
                }
            }
        }

        Ok(warnings)
    }
}
