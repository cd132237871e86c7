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

use tf_provider::schema::{AttributeType, Block, Description, NestedBlock, Schema};
use tf_provider::value::{self, Value};
use tf_provider::map;

use crate::sdk::psql::{Cluster, ClusterProperties, Connection, DbUser, MaintenanceWindow};
use crate::utils::{
    computed, computed_view, known, optional, optional_computed, required, sensitive, text,
    Timeouts, WithSchema,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionState {
    pub datacenter_id: Value<String>,
    pub lan_id: Value<String>,
    pub cidr: Value<String>,
}

impl ConnectionState {
    fn block() -> Block {
        Block {
            description: Description::plain("Network the cluster is attached to"),
            attributes: map! {
                "datacenter_id" => required(AttributeType::String, "Datacenter to connect the cluster to"),
                "lan_id" => required(AttributeType::String, "LAN to connect the cluster to"),
                "cidr" => required(
                    AttributeType::String,
                    "IP and subnet of the database in the LAN (eg: 192.168.1.100/24)",
                ),
            },
            ..Default::default()
        }
    }
}

impl From<&ConnectionState> for Connection {
    fn from(value: &ConnectionState) -> Self {
        Connection {
            datacenter_id: text(&value.datacenter_id),
            lan_id: text(&value.lan_id),
            cidr: text(&value.cidr),
        }
    }
}

impl From<Connection> for ConnectionState {
    fn from(value: Connection) -> Self {
        ConnectionState {
            datacenter_id: Value::Value(value.datacenter_id),
            lan_id: Value::Value(value.lan_id),
            cidr: Value::Value(value.cidr),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceWindowState {
    pub day_of_the_week: Value<String>,
    pub time: Value<String>,
}

impl MaintenanceWindowState {
    pub fn block() -> Block {
        Block {
            description: Description::plain("Weekly window during which maintenance may happen"),
            attributes: map! {
                "day_of_the_week" => required(AttributeType::String, "Day of the week (eg: Monday)"),
                "time" => required(AttributeType::String, "Start time, UTC (eg: 16:30:59)"),
            },
            ..Default::default()
        }
    }
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
pub struct CredentialsState {
    pub username: Value<String>,
    pub password: Value<String>,
}

/// Known nested blocks of a list
fn known_items<T>(items: &Value<Vec<Value<T>>>) -> impl Iterator<Item = &T> {
    items.iter().flatten().filter_map(Value::as_ref_option)
}

fn connections_state(connections: Option<Vec<Connection>>) -> Value<Vec<Value<ConnectionState>>> {
    Value::Value(
        connections
            .unwrap_or_default()
            .into_iter()
            .map(|connection| Value::Value(connection.into()))
            .collect(),
    )
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterState {
    pub id: Value<String>,
    pub display_name: Value<String>,
    pub postgres_version: Value<String>,
    pub instances: Value<i64>,
    pub cores: Value<i64>,
    pub ram: Value<i64>,
    pub storage_size: Value<i64>,
    pub storage_type: Value<String>,
    pub location: Value<String>,
    pub backup_location: Value<String>,
    pub synchronization_mode: Value<String>,
    pub dns_name: Value<String>,
    pub connections: Value<Vec<Value<ConnectionState>>>,
    #[serde(with = "value::serde_as_vec")]
    pub credentials: Value<CredentialsState>,
    #[serde(with = "value::serde_as_vec")]
    pub maintenance_window: Value<MaintenanceWindowState>,
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts>,
}

impl ClusterState {
    fn block() -> Block {
        Block {
            description: Description::plain("Managed PostgreSQL cluster"),
            attributes: map! {
                "id" => computed(AttributeType::String, "Id of the cluster"),
                "display_name" => required(AttributeType::String, "Human readable name of the cluster"),
                "postgres_version" => required(AttributeType::String, "PostgreSQL version (eg: 15)"),
                "instances" => required(
                    AttributeType::Number,
                    "Total number of instances, one primary and the rest standbys (1 to 5)",
                ),
                "cores" => required(AttributeType::Number, "Number of CPU cores per instance"),
                "ram" => required(AttributeType::Number, "Memory per instance in MB, multiple of 1024"),
                "storage_size" => required(AttributeType::Number, "Storage per instance in MB"),
                "storage_type" => required(
                    AttributeType::String,
                    "Storage type: HDD, SSD, SSD Premium or SSD Standard",
                ),
                "location" => required(
                    AttributeType::String,
                    "Physical location of the cluster (eg: de/fra), cannot be changed",
                ),
                "backup_location" => optional_computed(
                    AttributeType::String,
                    "S3 location of the backups (eg: eu-central-2), cannot be changed",
                ),
                "synchronization_mode" => required(
                    AttributeType::String,
                    "Replication mode: ASYNCHRONOUS, SYNCHRONOUS or STRICTLY_SYNCHRONOUS",
                ),
                "dns_name" => computed(AttributeType::String, "DNS name pointing to the primary instance"),
            },
            blocks: map! {
                "connections" => NestedBlock::List(ConnectionState::block()),
                "credentials" => NestedBlock::Optional(Block {
                    description: Description::plain(
                        "Initial database user, only used when the cluster is created",
                    ),
                    attributes: map! {
                        "username" => required(AttributeType::String, "Name of the database user"),
                        "password" => sensitive(required(AttributeType::String, "Password of the database user")),
                    },
                    ..Default::default()
                }),
                "maintenance_window" => NestedBlock::Optional(MaintenanceWindowState::block()),
                "timeouts" => NestedBlock::Optional(Timeouts::block()),
            },
            ..Default::default()
        }
    }

    pub fn properties(&self) -> ClusterProperties {
        ClusterProperties {
            display_name: known(&self.display_name),
            postgres_version: known(&self.postgres_version),
            instances: known(&self.instances),
            cores: known(&self.cores),
            ram: known(&self.ram),
            storage_size: known(&self.storage_size),
            storage_type: known(&self.storage_type),
            connections: Some(known_items(&self.connections).map(Into::into).collect()),
            location: known(&self.location),
            backup_location: known(&self.backup_location),
            synchronization_mode: known(&self.synchronization_mode),
            maintenance_window: self.maintenance_window.as_ref_option().map(Into::into),
            credentials: self.credentials.as_ref_option().map(|credentials| DbUser {
                username: text(&credentials.username),
                password: text(&credentials.password),
            }),
            dns_name: None,
        }
    }

    /// Patch holding the mutable attributes that differ from `prior`
    pub fn patch_from(&self, prior: &ClusterState) -> ClusterProperties {
        fn diff<T: Clone + PartialEq>(prior: &Value<T>, planned: &Value<T>) -> Option<T> {
            known(planned).filter(|_| prior != planned)
        }

        ClusterProperties {
            display_name: diff(&prior.display_name, &self.display_name),
            postgres_version: diff(&prior.postgres_version, &self.postgres_version),
            instances: diff(&prior.instances, &self.instances),
            cores: diff(&prior.cores, &self.cores),
            ram: diff(&prior.ram, &self.ram),
            storage_size: diff(&prior.storage_size, &self.storage_size),
            storage_type: diff(&prior.storage_type, &self.storage_type),
            synchronization_mode: diff(&prior.synchronization_mode, &self.synchronization_mode),
            maintenance_window: diff(&prior.maintenance_window, &self.maintenance_window)
                .map(|window| (&window).into()),
            ..Default::default()
        }
    }

    /// Copy the remote attributes, the credentials are never returned by the API
    pub fn apply(&mut self, cluster: Cluster) {
        let properties = cluster.properties;
        self.id = Value::Value(cluster.id);
        self.display_name = properties.display_name.into();
        self.postgres_version = properties.postgres_version.into();
        self.instances = properties.instances.into();
        self.cores = properties.cores.into();
        self.ram = properties.ram.into();
        self.storage_size = properties.storage_size.into();
        self.storage_type = properties.storage_type.into();
        self.location = properties.location.into();
        self.backup_location = properties.backup_location.into();
        self.synchronization_mode = properties.synchronization_mode.into();
        self.dns_name = properties.dns_name.into();
        self.connections = connections_state(properties.connections);
        // The API assigns a window when none is given: only track it when configured
        if self.maintenance_window.is_value() {
            self.maintenance_window =
                Value::from(properties.maintenance_window.map(MaintenanceWindowState::from));
        }
    }
}

impl WithSchema for ClusterState {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Self::block(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterDataState {
    pub id: Value<String>,
    pub display_name: Value<String>,
    pub partial_match: Value<bool>,
    pub postgres_version: Value<String>,
    pub instances: Value<i64>,
    pub cores: Value<i64>,
    pub ram: Value<i64>,
    pub storage_size: Value<i64>,
    pub storage_type: Value<String>,
    pub location: Value<String>,
    pub backup_location: Value<String>,
    pub synchronization_mode: Value<String>,
    pub dns_name: Value<String>,
    pub connections: Value<Vec<Value<ConnectionState>>>,
    #[serde(with = "value::serde_as_vec")]
    pub maintenance_window: Value<MaintenanceWindowState>,
}

impl ClusterDataState {
    pub fn apply(&mut self, cluster: Cluster) {
        let mut full = ClusterState {
            maintenance_window: Value::Value(MaintenanceWindowState::default()),
            ..Default::default()
        };
        full.apply(cluster);

        self.id = full.id;
        self.display_name = full.display_name;
        self.postgres_version = full.postgres_version;
        self.instances = full.instances;
        self.cores = full.cores;
        self.ram = full.ram;
        self.storage_size = full.storage_size;
        self.storage_type = full.storage_type;
        self.location = full.location;
        self.backup_location = full.backup_location;
        self.synchronization_mode = full.synchronization_mode;
        self.dns_name = full.dns_name;
        self.connections = full.connections;
        self.maintenance_window = full.maintenance_window;
    }
}

impl WithSchema for ClusterDataState {
    fn schema() -> Schema {
        let mut block = ClusterState::block();
        block.blocks.remove("credentials");
        block.blocks.remove("timeouts");

        let mut attributes = computed_view(&block);
        attributes.insert(
            "id".into(),
            optional_computed(AttributeType::String, "Id of the cluster to look up"),
        );
        attributes.insert(
            "display_name".into(),
            optional_computed(AttributeType::String, "Display name of the cluster to look up"),
        );
        attributes.insert(
            "partial_match".into(),
            optional(
                AttributeType::Bool,
                "Match display_name as a case-insensitive substring",
            ),
        );

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a managed PostgreSQL cluster"),
                attributes,
                ..Default::default()
            },
        }
    }
}
