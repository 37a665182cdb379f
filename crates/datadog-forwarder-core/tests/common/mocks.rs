// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock cloud provider for driving the reconciler in tests

use async_trait::async_trait;
use datadog_forwarder_core::{CloudProvider, ProviderError, SubscriptionFilterRecord};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the deployed account.
///
/// Log groups without a registered filter list answer the listing with a
/// not-found error, the same way the live API does for a group that has not
/// been created yet. Listing calls are recorded so tests can assert that the
/// fatal forwarder gate stops the run before any log group is touched.
pub struct MockCloudProvider {
    forwarder_exists: bool,
    stack: Option<String>,
    service: String,
    stage: String,
    filters: Mutex<HashMap<String, Vec<SubscriptionFilterRecord>>>,
    list_calls: Mutex<Vec<String>>,
}

impl MockCloudProvider {
    pub fn new() -> Self {
        MockCloudProvider {
            forwarder_exists: true,
            stack: None,
            service: "my-service".to_string(),
            stage: "dev".to_string(),
            filters: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn without_forwarder(mut self) -> Self {
        self.forwarder_exists = false;
        self
    }

    pub fn with_stack(mut self, stack: &str) -> Self {
        self.stack = Some(stack.to_string());
        self
    }

    pub fn with_filters(self, log_group_name: &str, filter_names: &[&str]) -> Self {
        self.set_live_filters(log_group_name, filter_names);
        self
    }

    /// Replace the live filter list for a log group, e.g. to simulate the
    /// state after a deploy between two reconciliation runs.
    pub fn set_live_filters(&self, log_group_name: &str, filter_names: &[&str]) {
        let records = filter_names
            .iter()
            .map(|name| filter_record(name, log_group_name))
            .collect();
        self.filters
            .lock()
            .unwrap()
            .insert(log_group_name.to_string(), records);
    }

    /// Log group names whose filters were listed, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudProvider for MockCloudProvider {
    async fn invoke_lookup(&self, identifier: &str) -> Result<(), ProviderError> {
        if self.forwarder_exists {
            Ok(())
        } else {
            Err(ProviderError::NotFound(identifier.to_string()))
        }
    }

    async fn list_subscription_filters(
        &self,
        log_group_name: &str,
    ) -> Result<Vec<SubscriptionFilterRecord>, ProviderError> {
        self.list_calls
            .lock()
            .unwrap()
            .push(log_group_name.to_string());
        match self.filters.lock().unwrap().get(log_group_name) {
            Some(records) => Ok(records.clone()),
            None => Err(ProviderError::NotFound(log_group_name.to_string())),
        }
    }

    fn stack_identifier(&self) -> Option<String> {
        self.stack.clone()
    }

    fn service_identifier(&self) -> String {
        self.service.clone()
    }

    fn stage_identifier(&self) -> String {
        self.stage.clone()
    }
}

/// Provider whose filter listing panics, to drive the path where a lookup
/// task fails to join. The forwarder lookup itself succeeds so the run gets
/// past the gate.
pub struct PanickingCloudProvider;

#[async_trait]
impl CloudProvider for PanickingCloudProvider {
    async fn invoke_lookup(&self, _identifier: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn list_subscription_filters(
        &self,
        log_group_name: &str,
    ) -> Result<Vec<SubscriptionFilterRecord>, ProviderError> {
        panic!("listing filters for {log_group_name} takes down its own task only")
    }

    fn stack_identifier(&self) -> Option<String> {
        None
    }

    fn service_identifier(&self) -> String {
        "my-service".to_string()
    }

    fn stage_identifier(&self) -> String {
        "dev".to_string()
    }
}

pub fn filter_record(filter_name: &str, log_group_name: &str) -> SubscriptionFilterRecord {
    SubscriptionFilterRecord {
        filter_name: filter_name.to_string(),
        destination_arn: "arn:aws:lambda:us-east-1:000000000000:function:unrelated".to_string(),
        log_group_name: log_group_name.to_string(),
        creation_time: Some(1_700_000_000_000),
    }
}
