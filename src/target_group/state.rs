// This file is part of the terraform-provider-ionoscloud project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{AttributeType, Block, Description, NestedBlock, Schema};
use tf_provider::value::{self, Value};

use crate::sdk::compute::{HealthCheck, Target, TargetGroup, TargetGroupProperties};
use crate::utils::{
    computed, computed_view, known, optional, optional_computed, required, text, Timeouts,
    WithSchema,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetState {
    pub ip: Value<String>,
    pub port: Value<i64>,
    pub weight: Value<i64>,
    pub health_check_enabled: Value<bool>,
    pub maintenance_enabled: Value<bool>,
}

impl From<&TargetState> for Target {
    fn from(value: &TargetState) -> Self {
        Target {
            ip: text(&value.ip),
            port: known(&value.port).unwrap_or_default(),
            weight: known(&value.weight).unwrap_or_default(),
            health_check_enabled: known(&value.health_check_enabled),
            maintenance_enabled: known(&value.maintenance_enabled),
        }
    }
}

impl From<Target> for TargetState {
    fn from(value: Target) -> Self {
        TargetState {
            ip: Value::Value(value.ip),
            port: Value::Value(value.port),
            weight: Value::Value(value.weight),
            health_check_enabled: value.health_check_enabled.into(),
            maintenance_enabled: value.maintenance_enabled.into(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckState {
    pub check_timeout: Value<i64>,
    pub check_interval: Value<i64>,
    pub retries: Value<i64>,
}

impl From<&HealthCheckState> for HealthCheck {
    fn from(value: &HealthCheckState) -> Self {
        HealthCheck {
            check_timeout: known(&value.check_timeout),
            check_interval: known(&value.check_interval),
            retries: known(&value.retries),
        }
    }
}

impl From<HealthCheck> for HealthCheckState {
    fn from(value: HealthCheck) -> Self {
        HealthCheckState {
            check_timeout: value.check_timeout.into(),
            check_interval: value.check_interval.into(),
            retries: value.retries.into(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGroupState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub algorithm: Value<String>,
    pub protocol: Value<String>,
    pub protocol_version: Value<String>,
    pub targets: Value<Vec<Value<TargetState>>>,
    #[serde(with = "value::serde_as_vec")]
    pub health_check: Value<HealthCheckState>,
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts>,
}

impl TargetGroupState {
    fn block() -> Block {
        Block {
            description: Description::plain("Target group of an application load balancer"),
            attributes: map! {
                "id" => computed(AttributeType::String, "Id of the target group"),
                "name" => required(AttributeType::String, "Name of the target group"),
                "algorithm" => required(
                    AttributeType::String,
                    "Balancing algorithm: ROUND_ROBIN, LEAST_CONNECTION, RANDOM or SOURCE_IP",
                ),
                "protocol" => required(AttributeType::String, "Forwarding protocol: HTTP"),
                "protocol_version" => optional_computed(
                    AttributeType::String,
                    "Forwarding protocol version: HTTP1 or HTTP2",
                ),
            },
            blocks: map! {
                "targets" => NestedBlock::List(Block {
                    description: Description::plain("Backend receiving the traffic"),
                    attributes: map! {
                        "ip" => required(AttributeType::String, "IP of the target"),
                        "port" => required(AttributeType::Number, "Port of the target"),
                        "weight" => required(AttributeType::Number, "Share of the traffic, 0 to 256"),
                        "health_check_enabled" => optional_computed(
                            AttributeType::Bool,
                            "Check the health of the target",
                        ),
                        "maintenance_enabled" => optional_computed(
                            AttributeType::Bool,
                            "Take the target out of the rotation",
                        ),
                    },
                    ..Default::default()
                }),
                "health_check" => NestedBlock::Optional(Block {
                    description: Description::plain("Health check of the targets"),
                    attributes: map! {
                        "check_timeout" => optional_computed(
                            AttributeType::Number,
                            "Maximum time in ms to wait for a target to answer",
                        ),
                        "check_interval" => optional_computed(
                            AttributeType::Number,
                            "Time in ms between two checks",
                        ),
                        "retries" => optional_computed(
                            AttributeType::Number,
                            "Failed checks before a target is considered down",
                        ),
                    },
                    ..Default::default()
                }),
                "timeouts" => NestedBlock::Optional(Timeouts::block()),
            },
            ..Default::default()
        }
    }

    /// Full description of the target group, also used to replace it
    pub fn properties(&self) -> TargetGroupProperties {
        TargetGroupProperties {
            name: text(&self.name),
            algorithm: text(&self.algorithm),
            protocol: text(&self.protocol),
            protocol_version: known(&self.protocol_version),
            targets: Some(
                self.targets
                    .iter()
                    .flatten()
                    .filter_map(Value::as_ref_option)
                    .map(Into::into)
                    .collect(),
            ),
            health_check: self.health_check.as_ref_option().map(Into::into),
        }
    }

    pub fn apply(&mut self, group: TargetGroup) {
        let properties = group.properties;
        self.id = Value::Value(group.id);
        self.name = Value::Value(properties.name);
        self.algorithm = Value::Value(properties.algorithm);
        self.protocol = Value::Value(properties.protocol);
        self.protocol_version = properties.protocol_version.into();
        self.targets = Value::Value(
            properties
                .targets
                .unwrap_or_default()
                .into_iter()
                .map(|target| Value::Value(target.into()))
                .collect(),
        );
        // The API fills in a default health check: only track it when configured
        if self.health_check.is_value() {
            self.health_check =
                Value::from(properties.health_check.map(HealthCheckState::from));
        }
    }
}

impl WithSchema for TargetGroupState {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Self::block(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGroupDataState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub partial_match: Value<bool>,
    pub algorithm: Value<String>,
    pub protocol: Value<String>,
    pub protocol_version: Value<String>,
    pub targets: Value<Vec<Value<TargetState>>>,
    #[serde(with = "value::serde_as_vec")]
    pub health_check: Value<HealthCheckState>,
}

impl TargetGroupDataState {
    pub fn apply(&mut self, group: TargetGroup) {
        let mut full = TargetGroupState {
            health_check: Value::Value(Default::default()),
            ..Default::default()
        };
        full.apply(group);

        self.id = full.id;
        self.name = full.name;
        self.algorithm = full.algorithm;
        self.protocol = full.protocol;
        self.protocol_version = full.protocol_version;
        self.targets = full.targets;
        self.health_check = full.health_check;
    }
}

impl WithSchema for TargetGroupDataState {
    fn schema() -> Schema {
        let mut block = TargetGroupState::block();
        block.blocks.remove("timeouts");

        let mut attributes = computed_view(&block);
        attributes.insert(
            "id".into(),
            optional_computed(AttributeType::String, "Id of the target group to look up"),
        );
        attributes.insert(
            "name".into(),
            optional_computed(AttributeType::String, "Name of the target group to look up"),
        );
        attributes.insert(
            "partial_match".into(),
            optional(AttributeType::Bool, "Match name as a case-insensitive substring"),
        );

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a target group"),
                attributes,
                ..Default::default()
            },
        }
    }
}
