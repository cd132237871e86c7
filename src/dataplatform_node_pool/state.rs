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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{AttributeType, Block, Description, NestedBlock, Schema};
use tf_provider::value::{self, Value};

use crate::sdk::dataplatform::{MaintenanceWindow, NodePool, NodePoolProperties};
use crate::utils::{
    computed, computed_view, known, optional, optional_computed, required, text, Timeouts,
    WithSchema,
};

pub type Labels = Value<BTreeMap<String, Value<String>>>;

fn labels_to_api(labels: &Labels) -> Option<BTreeMap<String, String>> {
    labels.as_ref_option().map(|labels| {
        labels
            .iter()
            .filter_map(|(k, v)| Some((k.clone(), v.as_ref_option()?.clone())))
            .collect()
    })
}

fn labels_from_api(labels: Option<BTreeMap<String, String>>) -> Labels {
    Value::from(labels.filter(|labels| !labels.is_empty()).map(|labels| {
        labels
            .into_iter()
            .map(|(k, v)| (k, Value::Value(v)))
            .collect::<BTreeMap<_, _>>()
    }))
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceWindowState {
    pub day_of_the_week: Value<String>,
    pub time: Value<String>,
}

impl From<&MaintenanceWindowState> for MaintenanceWindow {
    fn from(value: &MaintenanceWindowState) -> Self {
        MaintenanceWindow {
            time: text(&value.time),
            day_of_the_week: text(&value.day_of_the_week),
        }
    }
}

impl From<MaintenanceWindow> for MaintenanceWindowState {
    fn from(value: MaintenanceWindow) -> Self {
        MaintenanceWindowState {
            day_of_the_week: Value::Value(value.day_of_the_week),
            time: Value::Value(value.time),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePoolState {
    pub id: Value<String>,
    pub cluster_id: Value<String>,
    pub name: Value<String>,
    pub version: Value<String>,
    pub datacenter_id: Value<String>,
    pub node_count: Value<i64>,
    pub cpu_family: Value<String>,
    pub cores_count: Value<i64>,
    pub ram_size: Value<i64>,
    pub availability_zone: Value<String>,
    pub storage_type: Value<String>,
    pub storage_size: Value<i64>,
    pub labels: Labels,
    pub annotations: Labels,
    #[serde(with = "value::serde_as_vec")]
    pub maintenance_window: Value<MaintenanceWindowState>,
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts>,
}

impl NodePoolState {
    fn block() -> Block {
        let immutable = |attr_type, description: &str| {
            optional_computed(attr_type, &format!("{description}, cannot be changed"))
        };
        let labels = |description: &str| {
            optional(AttributeType::Map(Box::new(AttributeType::String)), description)
        };

        Block {
            description: Description::plain("Node pool of a managed Stackable Data Platform cluster"),
            attributes: map! {
                "id" => computed(AttributeType::String, "Id of the node pool"),
                "cluster_id" => required(
                    AttributeType::String,
                    "Data Platform cluster of the node pool, cannot be changed",
                ),
                "name" => required(AttributeType::String, "Name of the node pool, cannot be changed"),
                "version" => computed(AttributeType::String, "Data Platform version of the node pool"),
                "datacenter_id" => computed(AttributeType::String, "Datacenter of the node pool"),
                "node_count" => required(AttributeType::Number, "Number of nodes"),
                "cpu_family" => immutable(AttributeType::String, "CPU family of the nodes"),
                "cores_count" => immutable(AttributeType::Number, "Number of CPU cores per node"),
                "ram_size" => immutable(AttributeType::Number, "Memory per node in MB, multiple of 1024"),
                "availability_zone" => immutable(
                    AttributeType::String,
                    "Availability zone of the nodes: AUTO, ZONE_1 or ZONE_2",
                ),
                "storage_type" => immutable(AttributeType::String, "Storage type of the nodes: HDD or SSD"),
                "storage_size" => immutable(AttributeType::Number, "Storage per node in GB"),
                "labels" => labels("Kubernetes labels of the nodes"),
                "annotations" => labels("Kubernetes annotations of the nodes"),
            },
            blocks: map! {
                "maintenance_window" => NestedBlock::Optional(Block {
                    description: Description::plain("Weekly window during which maintenance may happen"),
                    attributes: map! {
                        "day_of_the_week" => required(AttributeType::String, "Day of the week (eg: Monday)"),
                        "time" => required(AttributeType::String, "Start time, UTC (eg: 12:00:00)"),
                    },
                    ..Default::default()
                }),
                "timeouts" => NestedBlock::Optional(Timeouts::block()),
            },
            ..Default::default()
        }
    }

    pub fn cluster_id(&self) -> &str {
        self.cluster_id.as_deref_option().unwrap_or_default()
    }

    pub fn properties(&self) -> NodePoolProperties {
        NodePoolProperties {
            name: known(&self.name),
            node_count: known(&self.node_count),
            cpu_family: known(&self.cpu_family),
            cores_count: known(&self.cores_count),
            ram_size: known(&self.ram_size),
            availability_zone: known(&self.availability_zone),
            storage_type: known(&self.storage_type),
            storage_size: known(&self.storage_size),
            maintenance_window: self.maintenance_window.as_ref_option().map(Into::into),
            labels: labels_to_api(&self.labels),
            annotations: labels_to_api(&self.annotations),
            ..Default::default()
        }
    }

    /// Patch holding the attributes that can change on an existing node pool
    pub fn patch(&self) -> NodePoolProperties {
        NodePoolProperties {
            node_count: known(&self.node_count),
            maintenance_window: self.maintenance_window.as_ref_option().map(Into::into),
            labels: Some(labels_to_api(&self.labels).unwrap_or_default()),
            annotations: Some(labels_to_api(&self.annotations).unwrap_or_default()),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, pool: NodePool) {
        let properties = pool.properties;
        self.id = Value::Value(pool.id);
        self.name = properties.name.into();
        self.version = properties.data_platform_version.into();
        self.datacenter_id = properties.datacenter_id.into();
        self.node_count = properties.node_count.into();
        self.cpu_family = properties.cpu_family.into();
        self.cores_count = properties.cores_count.into();
        self.ram_size = properties.ram_size.into();
        self.availability_zone = properties.availability_zone.into();
        self.storage_type = properties.storage_type.into();
        self.storage_size = properties.storage_size.into();
        self.labels = labels_from_api(properties.labels);
        self.annotations = labels_from_api(properties.annotations);
        // The API assigns a window when none is given: only track it when configured
        if self.maintenance_window.is_value() {
            self.maintenance_window =
                Value::from(properties.maintenance_window.map(MaintenanceWindowState::from));
        }
    }
}

impl WithSchema for NodePoolState {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Self::block(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePoolDataState {
    pub id: Value<String>,
    pub cluster_id: Value<String>,
    pub name: Value<String>,
    pub partial_match: Value<bool>,
    pub version: Value<String>,
    pub datacenter_id: Value<String>,
    pub node_count: Value<i64>,
    pub cpu_family: Value<String>,
    pub cores_count: Value<i64>,
    pub ram_size: Value<i64>,
    pub availability_zone: Value<String>,
    pub storage_type: Value<String>,
    pub storage_size: Value<i64>,
    pub labels: Labels,
    pub annotations: Labels,
    #[serde(with = "value::serde_as_vec")]
    pub maintenance_window: Value<MaintenanceWindowState>,
}

impl NodePoolDataState {
    pub fn cluster_id(&self) -> &str {
        self.cluster_id.as_deref_option().unwrap_or_default()
    }

    pub fn apply(&mut self, pool: NodePool) {
        let mut full = NodePoolState {
            maintenance_window: Value::Value(MaintenanceWindowState::default()),
            ..Default::default()
        };
        full.apply(pool);

        self.id = full.id;
        self.name = full.name;
        self.version = full.version;
        self.datacenter_id = full.datacenter_id;
        self.node_count = full.node_count;
        self.cpu_family = full.cpu_family;
        self.cores_count = full.cores_count;
        self.ram_size = full.ram_size;
        self.availability_zone = full.availability_zone;
        self.storage_type = full.storage_type;
        self.storage_size = full.storage_size;
        self.labels = full.labels;
        self.annotations = full.annotations;
        self.maintenance_window = full.maintenance_window;
    }
}

impl WithSchema for NodePoolDataState {
    fn schema() -> Schema {
        let mut block = NodePoolState::block();
        block.blocks.remove("timeouts");

        let mut attributes = computed_view(&block);
        attributes.insert(
            "cluster_id".into(),
            required(AttributeType::String, "Data Platform cluster of the node pool"),
        );
        attributes.insert(
            "id".into(),
            optional_computed(AttributeType::String, "Id of the node pool to look up"),
        );
        attributes.insert(
            "name".into(),
            optional_computed(AttributeType::String, "Name of the node pool to look up"),
        );
        attributes.insert(
            "partial_match".into(),
            optional(AttributeType::Bool, "Match name as a case-insensitive substring"),
        );

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a Data Platform node pool"),
                attributes,
                ..Default::default()
            },
        }
    }
}
