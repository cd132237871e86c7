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

use crate::sdk::vpn::{Connection, WireguardGateway, WireguardGatewayProperties};
use crate::utils::{
    computed, computed_view, known, optional, optional_computed, required, sensitive, text,
    Timeouts, WithSchema,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionState {
    pub datacenter_id: Value<String>,
    pub lan_id: Value<String>,
    pub ipv4_cidr: Value<String>,
    pub ipv6_cidr: Value<String>,
}

impl From<&ConnectionState> for Connection {
    fn from(value: &ConnectionState) -> Self {
        Connection {
            datacenter_id: text(&value.datacenter_id),
            lan_id: text(&value.lan_id),
            ipv4_cidr: known(&value.ipv4_cidr),
            ipv6_cidr: known(&value.ipv6_cidr),
        }
    }
}

impl From<Connection> for ConnectionState {
    fn from(value: Connection) -> Self {
        ConnectionState {
            datacenter_id: Value::Value(value.datacenter_id),
            lan_id: Value::Value(value.lan_id),
            ipv4_cidr: value.ipv4_cidr.into(),
            ipv6_cidr: value.ipv6_cidr.into(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayState {
    pub id: Value<String>,
    pub location: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub gateway_ip: Value<String>,
    pub interface_ipv4_cidr: Value<String>,
    pub interface_ipv6_cidr: Value<String>,
    pub private_key: Value<String>,
    pub listen_port: Value<i64>,
    pub public_key: Value<String>,
    pub status: Value<String>,
    pub connection: Value<Vec<Value<ConnectionState>>>,
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts>,
}

impl GatewayState {
    fn block() -> Block {
        Block {
            description: Description::plain("WireGuard VPN gateway"),
            attributes: map! {
                "id" => computed(AttributeType::String, "Id of the gateway"),
                "location" => required(
                    AttributeType::String,
                    "Location of the gateway (eg: de/fra), selects the regional endpoint, cannot be changed",
                ),
                "name" => required(AttributeType::String, "Name of the gateway"),
                "description" => optional(AttributeType::String, "Description of the gateway"),
                "gateway_ip" => required(AttributeType::String, "Public IP of the gateway"),
                "interface_ipv4_cidr" => optional(
                    AttributeType::String,
                    "IPv4 address and subnet of the WireGuard interface",
                ),
                "interface_ipv6_cidr" => optional(
                    AttributeType::String,
                    "IPv6 address and subnet of the WireGuard interface",
                ),
                "private_key" => sensitive(required(
                    AttributeType::String,
                    "WireGuard private key of the gateway, never read back",
                )),
                "listen_port" => optional_computed(
                    AttributeType::Number,
                    "UDP port of the WireGuard interface (default: 51820)",
                ),
                "public_key" => computed(AttributeType::String, "WireGuard public key of the gateway"),
                "status" => computed(AttributeType::String, "Current status of the gateway"),
            },
            blocks: map! {
                "connection" => NestedBlock::List(Block {
                    description: Description::plain("LAN the gateway is attached to"),
                    attributes: map! {
                        "datacenter_id" => required(AttributeType::String, "Datacenter of the LAN"),
                        "lan_id" => required(AttributeType::String, "LAN to attach the gateway to"),
                        "ipv4_cidr" => optional(AttributeType::String, "IPv4 address and subnet of the gateway in the LAN"),
                        "ipv6_cidr" => optional(AttributeType::String, "IPv6 address and subnet of the gateway in the LAN"),
                    },
                    ..Default::default()
                }),
                "timeouts" => NestedBlock::Optional(Timeouts::block()),
            },
            ..Default::default()
        }
    }

    pub fn location(&self) -> &str {
        self.location.as_deref_option().unwrap_or_default()
    }

    /// Full description of the gateway, also used to replace it
    pub fn properties(&self) -> WireguardGatewayProperties {
        WireguardGatewayProperties {
            name: text(&self.name),
            description: known(&self.description),
            gateway_ip: text(&self.gateway_ip),
            interface_ipv4_cidr: known(&self.interface_ipv4_cidr),
            interface_ipv6_cidr: known(&self.interface_ipv6_cidr),
            connections: self
                .connection
                .iter()
                .flatten()
                .filter_map(Value::as_ref_option)
                .map(Into::into)
                .collect(),
            private_key: known(&self.private_key),
            listen_port: known(&self.listen_port),
        }
    }

    /// Copy the remote attributes, the private key is never returned by the API
    pub fn apply(&mut self, gateway: WireguardGateway) {
        let properties = gateway.properties;
        self.id = Value::Value(gateway.id);
        self.name = Value::Value(properties.name);
        self.description = properties.description.into();
        self.gateway_ip = Value::Value(properties.gateway_ip);
        self.interface_ipv4_cidr = properties.interface_ipv4_cidr.into();
        self.interface_ipv6_cidr = properties.interface_ipv6_cidr.into();
        self.listen_port = properties.listen_port.into();
        self.connection = Value::Value(
            properties
                .connections
                .into_iter()
                .map(|connection| Value::Value(connection.into()))
                .collect(),
        );
        self.public_key = gateway.metadata.public_key.clone().into();
        self.status = gateway.metadata.current_state().map(str::to_owned).into();
    }
}

impl WithSchema for GatewayState {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Self::block(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayDataState {
    pub id: Value<String>,
    pub location: Value<String>,
    pub name: Value<String>,
    pub partial_match: Value<bool>,
    pub description: Value<String>,
    pub gateway_ip: Value<String>,
    pub interface_ipv4_cidr: Value<String>,
    pub interface_ipv6_cidr: Value<String>,
    pub listen_port: Value<i64>,
    pub public_key: Value<String>,
    pub status: Value<String>,
    pub connection: Value<Vec<Value<ConnectionState>>>,
}

impl GatewayDataState {
    pub fn location(&self) -> &str {
        self.location.as_deref_option().unwrap_or_default()
    }

    pub fn apply(&mut self, gateway: WireguardGateway) {
        let mut full = GatewayState::default();
        full.apply(gateway);

        self.id = full.id;
        self.name = full.name;
        self.description = full.description;
        self.gateway_ip = full.gateway_ip;
        self.interface_ipv4_cidr = full.interface_ipv4_cidr;
        self.interface_ipv6_cidr = full.interface_ipv6_cidr;
        self.listen_port = full.listen_port;
        self.public_key = full.public_key;
        self.status = full.status;
        self.connection = full.connection;
    }
}

impl WithSchema for GatewayDataState {
    fn schema() -> Schema {
        let mut block = GatewayState::block();
        block.blocks.remove("timeouts");
        block.attributes.remove("private_key");

        let mut attributes = computed_view(&block);
        attributes.insert(
            "location".into(),
            required(AttributeType::String, "Location of the gateway (eg: de/fra)"),
        );
        attributes.insert(
            "id".into(),
            optional_computed(AttributeType::String, "Id of the gateway to look up"),
        );
        attributes.insert(
            "name".into(),
            optional_computed(AttributeType::String, "Name of the gateway to look up"),
        );
        attributes.insert(
            "partial_match".into(),
            optional(AttributeType::Bool, "Match name as a case-insensitive substring"),
        );

        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Look up a WireGuard VPN gateway"),
                attributes,
                ..Default::default()
            },
        }
    }
}
