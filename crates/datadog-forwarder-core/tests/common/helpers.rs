// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Template builders shared across integration tests

use datadog_forwarder_core::{ForwarderTarget, InfrastructureTemplate};
use serde_json::{json, Map};

pub const FORWARDER_ARN: &str =
    "arn:aws:lambda:us-east-1:000000000000:function:datadog-forwarder";

pub fn forwarder_arn() -> ForwarderTarget {
    ForwarderTarget::Arn(FORWARDER_ARN.to_string())
}

/// Compiled template containing one log group resource per
/// `(logical_id, log_group_name)` pair.
pub fn compiled_template(log_groups: &[(&str, &str)]) -> InfrastructureTemplate {
    let mut resources = Map::new();
    for (logical_id, log_group_name) in log_groups {
        resources.insert(
            logical_id.to_string(),
            json!({
                "Type": "AWS::Logs::LogGroup",
                "Properties": { "LogGroupName": log_group_name }
            }),
        );
    }
    InfrastructureTemplate::from_value(&json!({ "Resources": resources }))
}
