// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory model of the compiled infrastructure template.
//!
//! The reconciler only inspects log group resources and appends subscription
//! filter resources; everything else in the template passes through as an
//! opaque [`Resource::Other`] so a conversion back to template JSON is
//! lossless.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Reserved name prefix for log groups managed by the function platform.
pub const LAMBDA_LOG_GROUP_PREFIX: &str = "/aws/lambda/";

/// Filter pattern matching every log entry.
pub const MATCH_ALL_FILTER_PATTERN: &str = "";

const LOG_GROUP_TYPE: &str = "AWS::Logs::LogGroup";
const SUBSCRIPTION_FILTER_TYPE: &str = "AWS::Logs::SubscriptionFilter";

/// Destination the subscription filters point at.
///
/// Only the literal ARN form can be checked against the live account; an
/// expression is an unresolved deployment-time construct (e.g. an import or
/// a parameter reference) that the pipeline resolves at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForwarderTarget {
    Arn(String),
    Expression(Value),
}

impl ForwarderTarget {
    pub fn as_arn(&self) -> Option<&str> {
        match self {
            ForwarderTarget::Arn(arn) => Some(arn),
            ForwarderTarget::Expression(_) => None,
        }
    }
}

/// A subscription filter resource declared in the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionFilter {
    pub destination_arn: ForwarderTarget,
    pub filter_pattern: String,
    /// Logical id of the log group this filter attaches to. A reference, not
    /// ownership; the named resource must exist in the same template.
    pub log_group: String,
}

/// A single resource in the compiled template.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// A log group with a literal name. Retains the raw resource JSON so
    /// unrelated declarations (retention, deletion policy, ...) survive
    /// conversion; log groups are only ever read, never rewritten.
    LogGroup {
        log_group_name: String,
        resource: Value,
    },
    SubscriptionFilter(SubscriptionFilter),
    /// Any resource this crate does not inspect, passed through untouched.
    Other(Value),
}

impl Resource {
    /// Log group resource with the given name and no other properties.
    pub fn log_group(log_group_name: impl Into<String>) -> Self {
        let log_group_name = log_group_name.into();
        let resource = json!({
            "Type": LOG_GROUP_TYPE,
            "Properties": { "LogGroupName": log_group_name.clone() },
        });
        Resource::LogGroup {
            log_group_name,
            resource,
        }
    }

    /// Build a resource from its template JSON form.
    ///
    /// Log groups whose `LogGroupName` is not a plain string (an unresolved
    /// expression cannot be matched against the platform prefix) and
    /// subscription filters that do not have the exact shape
    /// [`InfrastructureTemplate::add_subscription`] writes are kept as
    /// [`Resource::Other`], so [`Resource::to_value`] re-emits them byte for
    /// byte.
    pub fn from_value(value: &Value) -> Self {
        let resource_type = value.get("Type").and_then(Value::as_str);
        let properties = value.get("Properties").and_then(Value::as_object);

        match (resource_type, properties) {
            (Some(LOG_GROUP_TYPE), Some(properties)) => {
                match properties.get("LogGroupName").and_then(Value::as_str) {
                    Some(name) => Resource::LogGroup {
                        log_group_name: name.to_string(),
                        resource: value.clone(),
                    },
                    None => Resource::Other(value.clone()),
                }
            }
            (Some(SUBSCRIPTION_FILTER_TYPE), Some(properties)) => {
                match parse_subscription_filter(value, properties) {
                    Some(filter) => Resource::SubscriptionFilter(filter),
                    None => Resource::Other(value.clone()),
                }
            }
            _ => Resource::Other(value.clone()),
        }
    }

    /// Template JSON form of this resource.
    pub fn to_value(&self) -> Value {
        match self {
            Resource::LogGroup { resource, .. } => resource.clone(),
            Resource::SubscriptionFilter(filter) => json!({
                "Type": SUBSCRIPTION_FILTER_TYPE,
                "Properties": {
                    "DestinationArn": filter.destination_arn,
                    "FilterPattern": filter.filter_pattern,
                    "LogGroupName": { "Ref": filter.log_group },
                },
            }),
            Resource::Other(value) => value.clone(),
        }
    }
}

/// Parse a subscription filter only when it carries exactly the declarations
/// the mutator writes: `Type` + `Properties`, the three modeled properties,
/// a string filter pattern and a single-key `Ref` back-reference. Anything
/// else (a `RoleArn`, a `FilterName`, an expression pattern, ...) must stay
/// opaque or the rebuilt JSON would drop it.
fn parse_subscription_filter(value: &Value, properties: &Map<String, Value>) -> Option<SubscriptionFilter> {
    if value.as_object()?.len() != 2 || properties.len() != 3 {
        return None;
    }
    let reference = properties.get("LogGroupName")?.as_object()?;
    if reference.len() != 1 {
        return None;
    }
    let log_group = reference.get("Ref")?.as_str()?;
    let filter_pattern = properties.get("FilterPattern")?.as_str()?;
    let destination = properties.get("DestinationArn")?;
    let destination_arn = match destination.as_str() {
        Some(arn) => ForwarderTarget::Arn(arn.to_string()),
        None => ForwarderTarget::Expression(destination.clone()),
    };
    Some(SubscriptionFilter {
        destination_arn,
        filter_pattern: filter_pattern.to_string(),
        log_group: log_group.to_string(),
    })
}

/// Compiled infrastructure template, keyed by logical resource id.
///
/// Some deployment configurations compile no resource section at all; that
/// state is kept distinct from an empty one so the reconciler can report the
/// run as skipped rather than silently doing nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfrastructureTemplate {
    resources: Option<BTreeMap<String, Resource>>,
}

impl InfrastructureTemplate {
    pub fn new(resources: BTreeMap<String, Resource>) -> Self {
        InfrastructureTemplate {
            resources: Some(resources),
        }
    }

    /// Template with no resource section at all.
    pub fn empty() -> Self {
        InfrastructureTemplate::default()
    }

    /// Parse the `Resources` section out of a compiled template document.
    pub fn from_value(value: &Value) -> Self {
        let resources = value.get("Resources").and_then(Value::as_object).map(|map| {
            map.iter()
                .map(|(logical_id, resource)| (logical_id.clone(), Resource::from_value(resource)))
                .collect()
        });
        InfrastructureTemplate { resources }
    }

    /// Render the template back to its JSON document form.
    pub fn to_value(&self) -> Value {
        match &self.resources {
            Some(resources) => {
                let map: Map<String, Value> = resources
                    .iter()
                    .map(|(logical_id, resource)| (logical_id.clone(), resource.to_value()))
                    .collect();
                json!({ "Resources": map })
            }
            None => json!({}),
        }
    }

    pub fn has_resources(&self) -> bool {
        self.resources.is_some()
    }

    pub fn resources(&self) -> Option<&BTreeMap<String, Resource>> {
        self.resources.as_ref()
    }

    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.as_ref().and_then(|map| map.get(logical_id))
    }

    /// Log groups belonging to serverless functions, as
    /// `(logical_id, log_group_name)` pairs in template iteration order.
    pub fn lambda_log_groups(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.resources
            .iter()
            .flat_map(|map| map.iter())
            .filter_map(|(logical_id, resource)| match resource {
                Resource::LogGroup { log_group_name, .. }
                    if log_group_name.starts_with(LAMBDA_LOG_GROUP_PREFIX) =>
                {
                    Some((logical_id.as_str(), log_group_name.as_str()))
                }
                _ => None,
            })
    }

    /// Logical id of the subscription filter derived from a log group's
    /// logical id. Deterministic so repeated runs land on the same resource.
    pub fn subscription_logical_id(log_group_logical_id: &str) -> String {
        format!("{log_group_logical_id}Subscription")
    }

    /// Append a match-all subscription filter for a log group resource.
    ///
    /// An existing resource under the derived logical id is overwritten
    /// (last-writer-wins), which keeps re-runs idempotent.
    pub fn add_subscription(&mut self, log_group_logical_id: &str, target: &ForwarderTarget) {
        if let Some(resources) = &mut self.resources {
            resources.insert(
                Self::subscription_logical_id(log_group_logical_id),
                Resource::SubscriptionFilter(SubscriptionFilter {
                    destination_arn: target.clone(),
                    filter_pattern: MATCH_ALL_FILTER_PATTERN.to_string(),
                    log_group: log_group_logical_id.to_string(),
                }),
            );
        }
    }
}
