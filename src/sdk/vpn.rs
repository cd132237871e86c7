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

//! VPN Gateway API (WireGuard)
//!
//! The API is regional: each location has its own endpoint.

use serde::{Deserialize, Serialize};

use crate::resolver::Named;

use super::{ApiClient, ApiError, Collection, Credentials, Entity, Envelope};

pub const LOCATIONS: &[&str] = &[
    "de/fra", "de/txl", "es/vit", "fr/par", "gb/lhr", "us/ewr", "us/las", "us/mci",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireguardGatewayProperties {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "gatewayIP")]
    pub gateway_ip: String,
    #[serde(rename = "interfaceIPv4CIDR", skip_serializing_if = "Option::is_none")]
    pub interface_ipv4_cidr: Option<String>,
    #[serde(rename = "interfaceIPv6CIDR", skip_serializing_if = "Option::is_none")]
    pub interface_ipv6_cidr: Option<String>,
    pub connections: Vec<Connection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub datacenter_id: String,
    pub lan_id: String,
    #[serde(rename = "ipv4CIDR", default, skip_serializing_if = "Option::is_none")]
    pub ipv4_cidr: Option<String>,
    #[serde(rename = "ipv6CIDR", default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
}

pub type WireguardGateway = Entity<WireguardGatewayProperties>;

impl Named for WireguardGateway {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.properties.name
    }
}

/// Regional endpoint of `location` (`de/fra` is served by `https://vpn.de-fra.ionos.com`)
pub fn regional_url(location: &str) -> String {
    format!("https://vpn.{}.ionos.com", location.replace('/', "-"))
}

#[derive(Debug, Clone)]
pub struct VpnClient {
    http: reqwest::Client,
    credentials: Credentials,
    /// Replaces every regional endpoint
    endpoint: Option<String>,
}

impl VpnClient {
    pub fn new(http: reqwest::Client, credentials: Credentials, endpoint: Option<String>) -> Self {
        Self {
            http,
            credentials,
            endpoint,
        }
    }

    fn api(&self, location: &str) -> ApiClient {
        let base_url = self
            .endpoint
            .clone()
            .unwrap_or_else(|| regional_url(location));
        ApiClient::new(self.http.clone(), &base_url, self.credentials.clone())
    }

    pub async fn list_gateways(&self, location: &str) -> Result<Vec<WireguardGateway>, ApiError> {
        let gateways: Collection<WireguardGateway> =
            self.api(location).get("wireguardgateways", &[]).await?;
        Ok(gateways.items)
    }

    pub async fn get_gateway(&self, location: &str, id: &str) -> Result<WireguardGateway, ApiError> {
        self.api(location)
            .get(&format!("wireguardgateways/{id}"), &[])
            .await
    }

    pub async fn create_gateway(
        &self,
        location: &str,
        properties: WireguardGatewayProperties,
    ) -> Result<WireguardGateway, ApiError> {
        self.api(location)
            .post("wireguardgateways", &Envelope { properties })
            .await
    }

    pub async fn put_gateway(
        &self,
        location: &str,
        id: &str,
        properties: WireguardGatewayProperties,
    ) -> Result<WireguardGateway, ApiError> {
        self.api(location)
            .put(&format!("wireguardgateways/{id}"), &Envelope { properties })
            .await
    }

    pub async fn delete_gateway(&self, location: &str, id: &str) -> Result<(), ApiError> {
        self.api(location)
            .delete(&format!("wireguardgateways/{id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regional_endpoints() {
        assert_eq!(regional_url("de/fra"), "https://vpn.de-fra.ionos.com");
        assert_eq!(regional_url("us/las"), "https://vpn.us-las.ionos.com");
    }

    #[test]
    fn override_replaces_regional_endpoint() {
        let client = VpnClient::new(
            reqwest::Client::new(),
            Credentials::Token("token".into()),
            Some("http://127.0.0.1:8080/".into()),
        );
        assert_eq!(client.api("de/fra").base_url(), "http://127.0.0.1:8080");
    }
}
