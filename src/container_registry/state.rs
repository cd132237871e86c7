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

use crate::sdk::registry::{
    FeatureToggle, Registry, RegistryFeatures, RegistryPatch, RegistryProperties, WeeklySchedule,
};
use crate::utils::{
    computed, computed_view, known, optional, optional_computed, required, text, Timeouts,
    WithSchema,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleState {
    pub days: Value<Vec<Value<String>>>,
    pub time: Value<String>,
}

impl From<&ScheduleState> for WeeklySchedule {
    fn from(value: &ScheduleState) -> Self {
        WeeklySchedule {
            days: value
                .days
                .iter()
                .flatten()
                .filter_map(|day| day.as_ref_option().cloned())
                .collect(),
            time: text(&value.time),
        }
    }
}

impl From<WeeklySchedule> for ScheduleState {
    fn from(value: WeeklySchedule) -> Self {
        ScheduleState {
            days: Value::Value(value.days.into_iter().map(Value::Value).collect()),
            time: Value::Value(value.time),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesState {
    pub vulnerability_scanning: Value<bool>,
}

impl From<&FeaturesState> for RegistryFeatures {
    fn from(value: &FeaturesState) -> Self {
        RegistryFeatures {
            vulnerability_scanning: known(&value.vulnerability_scanning)
                .map(|enabled| FeatureToggle { enabled }),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub location: Value<String>,
    pub hostname: Value<String>,
    pub storage_usage_bytes: Value<i64>,
    #[serde(with = "value::serde_as_vec")]
    pub garbage_collection_schedule: Value<ScheduleState>,
    #[serde(with = "value::serde_as_vec")]
    pub features: Value<FeaturesState>,
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts>,
}

impl RegistryState {
    fn block() -> Block {
        Block {
            description: Description::plain("Private container registry"),
            attributes: map! {
                "id" => computed(AttributeType::String, "Id of the registry"),
                "name" => required(
                    AttributeType::String,
                    "Name of the registry, part of its hostname, cannot be changed",
                ),
                "location" => required(
                    AttributeType::String,
                    "Location of the registry (eg: de/fra), cannot be changed",
                ),
                "hostname" => computed(AttributeType::String, "Hostname to push and pull images"),
                "storage_usage_bytes" => computed(AttributeType::Number, "Storage used by the registry"),
            },
            blocks: map! {
                "garbage_collection_schedule" => NestedBlock::Optional(Block {
                    description: Description::plain("Weekly garbage collection"),
                    attributes: map! {
                        "days" => required(
                            AttributeType::List(Box::new(AttributeType::String)),
                            "Days of the week (eg: Monday)",
                        ),
                        "time" => required(AttributeType::String, "Start time, UTC (eg: 01:23:00+00:00)"),
                    },
                    ..Default::default()
                }),
                "features" => NestedBlock::Optional(Block {
                    description: Description::plain("Optional registry features"),
                    attributes: map! {
                        "vulnerability_scanning" => optional(
                            AttributeType::Bool,
                            "Scan pushed images for known vulnerabilities",
                        ),
                    },
                    ..Default::default()
                }),
                "timeouts" => NestedBlock::Optional(Timeouts::block()),
            },
            ..Default::default()
        }
    }

    pub fn properties(&self) -> RegistryProperties {
        RegistryProperties {
            name: known(&self.name),
            location: known(&self.location),
            garbage_collection_schedule: self
                .garbage_collection_schedule
                .as_ref_option()
                .map(Into::into),
            features: self.features.as_ref_option().map(Into::into),
            ..Default::default()
        }
    }

    /// Patch holding the mutable blocks that differ from `prior`
    pub fn patch_from(&self, prior: &RegistryState) -> RegistryPatch {
        RegistryPatch {
            garbage_collection_schedule: self
                .garbage_collection_schedule
                .as_ref_option()
                .filter(|_| self.garbage_collection_schedule != prior.garbage_collection_schedule)
                .map(Into::into),
            features: self
                .features
                .as_ref_option()
                .filter(|_| self.features != prior.features)
                .map(Into::into),
        }
    }

    pub fn apply(&mut self, registry: Registry) {
        let properties = registry.properties;
        self.id = Value::Value(registry.id);
        self.name = properties.name.into();
        self.location = properties.location.into();
        self.hostname = properties.hostname.into();
        self.storage_usage_bytes = properties.storage_usage.map(|usage| usage.bytes).into();
        self.garbage_collection_schedule =
            Value::from(properties.garbage_collection_schedule.map(ScheduleState::from));

        // Registries always report their features: only track them when configured
        let scanning = properties
            .features
            .and_then(|features| features.vulnerability_scanning)
            .map(|toggle| toggle.enabled);
        if let Value::Value(features) = &mut self.features {
            features.vulnerability_scanning = scanning.into();
        }
    }
}

impl WithSchema for RegistryState {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Self::block(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryDataState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub partial_match: Value<bool>,
    pub location: Value<String>,
    pub hostname: Value<String>,
    pub storage_usage_bytes: Value<i64>,
    #[serde(with = "value::serde_as_vec")]
    pub garbage_collection_schedule: Value<ScheduleState>,
    #[serde(with = "value::serde_as_vec")]
    pub features: Value<FeaturesState>,
}

impl RegistryDataState {
    pub fn apply(&mut self, registry: Registry) {
        let mut full = RegistryState {
            features: Value::Value(FeaturesState::default()),
            ..Default::default()
        };
        full.apply(registry);

        self.id = full.id;
        self.name = full.name;
        self.location = full.location;
        self.hostname = full.hostname;
        self.storage_usage_bytes = full.storage_usage_bytes;
        self.garbage_collection_schedule = full.garbage_collection_schedule;
        self.features = full.features;
    }
}

impl WithSchema for RegistryDataState {
    fn schema() -> Schema {
        let mut block = RegistryState::block();
        block.blocks.remove("timeouts");

        let mut attributes = computed_view(&block);
        attributes.insert(
            "id".into(),
            optional_computed(AttributeType::String, "Id of the registry to look up"),
        );
        attributes.insert(
            "name".into(),
            optional_computed(AttributeType::String, "Name of the registry to look up"),
        );
        attributes.insert(
            "partial_match".into(),
            optional(AttributeType::Bool, "Match name as a case-insensitive substring"),
        );
        attributes.insert(
            "location".into(),
            optional_computed(
                AttributeType::String,
                "Only consider the registries of this location",
            ),
        );

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a container registry"),
                attributes,
                ..Default::default()
            },
        }
    }
}
