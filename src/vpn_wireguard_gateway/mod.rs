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

//! `ionoscloud_vpn_wireguard_gateway`
//!
//! Gateways live behind a regional endpoint, so their key is scoped by location
//! and their import id is `<location>:<id>`.

use std::time::Duration;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::Value;

use crate::data_source::CloudLookup;
use crate::poller::Readiness;
use crate::resolver::Lookup;
use crate::resource::{CloudResource, ResourceKey};
use crate::sdk::vpn;
use crate::sdk::{ApiError, SdkBundle};
use crate::utils::{changed, non_empty, Computed, Timeouts, WithSchema};

mod state;
mod validate;

pub use state::{ConnectionState, GatewayDataState, GatewayState};

#[derive(Debug, Default)]
pub struct WireguardGateway;

#[async_trait]
impl CloudResource for WireguardGateway {
    const KIND: &'static str = "WireGuard gateway";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

    type State = GatewayState;
    type Remote = vpn::WireguardGateway;

    fn schema() -> Schema {
        GatewayState::schema()
    }

    fn timeouts(state: &GatewayState) -> &Value<Timeouts> {
        &state.timeouts
    }

    fn key(state: &GatewayState) -> Option<ResourceKey> {
        let location = non_empty(&state.location)?;
        non_empty(&state.id).map(|id| ResourceKey::scoped(location, id))
    }

    fn set_id(state: &mut GatewayState, id: String) {
        state.id = Value::Value(id);
    }

    fn settle_computed(state: &mut GatewayState, mode: Computed) {
        mode.settle(&mut state.id);
        mode.settle(&mut state.listen_port);
        mode.settle(&mut state.public_key);
        mode.settle(&mut state.status);
    }

    fn immutable_changes(prior: &GatewayState, planned: &GatewayState) -> Vec<&'static str> {
        if changed(&prior.location, &planned.location) {
            vec!["location"]
        } else {
            Vec::new()
        }
    }

    fn parse_import(import_id: &str) -> Result<ResourceKey, String> {
        ResourceKey::parse_scoped(import_id, ':', "location")
    }

    fn imported(key: &ResourceKey) -> GatewayState {
        GatewayState {
            id: Value::Value(key.id.clone()),
            location: Value::Value(key.scope().to_owned()),
            ..Default::default()
        }
    }

    fn readiness(remote: &vpn::WireguardGateway) -> Readiness {
        remote.metadata.readiness(Self::READY)
    }

    fn apply(state: &mut GatewayState, remote: vpn::WireguardGateway) {
        state.apply(remote);
    }

    async fn create(&self, sdk: &SdkBundle, state: &GatewayState) -> Result<ResourceKey, ApiError> {
        let location = state.location();
        let gateway = sdk.vpn.create_gateway(location, state.properties()).await?;
        Ok(ResourceKey::scoped(location, gateway.id))
    }

    async fn fetch(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
    ) -> Result<vpn::WireguardGateway, ApiError> {
        sdk.vpn.get_gateway(key.scope(), &key.id).await
    }

    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        _prior: &GatewayState,
        planned: &GatewayState,
    ) -> Result<(), ApiError> {
        sdk.vpn
            .put_gateway(key.scope(), &key.id, planned.properties())
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError> {
        sdk.vpn.delete_gateway(key.scope(), &key.id).await
    }
}

#[derive(Debug, Default)]
pub struct WireguardGatewayLookup;

#[async_trait]
impl CloudLookup for WireguardGatewayLookup {
    const KIND: &'static str = "WireGuard gateway";

    type State = GatewayDataState;
    type Remote = vpn::WireguardGateway;

    fn schema() -> Schema {
        GatewayDataState::schema()
    }

    fn lookup(state: &GatewayDataState) -> Lookup<'_> {
        Lookup {
            name_attr: "name",
            id: non_empty(&state.id),
            name: non_empty(&state.name),
            partial_match: state.partial_match.as_ref_option().copied().unwrap_or_default(),
        }
    }

    fn apply(state: &mut GatewayDataState, remote: vpn::WireguardGateway) {
        state.apply(remote);
    }

    async fn get(
        &self,
        sdk: &SdkBundle,
        state: &GatewayDataState,
        id: &str,
    ) -> Result<vpn::WireguardGateway, ApiError> {
        sdk.vpn.get_gateway(state.location(), id).await
    }

    async fn list(
        &self,
        sdk: &SdkBundle,
        state: &GatewayDataState,
    ) -> Result<Vec<vpn::WireguardGateway>, ApiError> {
        sdk.vpn.list_gateways(state.location()).await
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::{AttributePath, Diagnostics};

    use crate::sdk::vpn::{Connection, WireguardGatewayProperties};
    use crate::sdk::{Entity, Metadata};
    use crate::utils::WithValidate;

    use super::*;

    fn planned() -> GatewayState {
        GatewayState {
            location: Value::Value("de/fra".into()),
            name: Value::Value("gw".into()),
            gateway_ip: Value::Value("203.0.113.10".into()),
            interface_ipv4_cidr: Value::Value("10.8.0.1/24".into()),
            private_key: Value::Value("cHJpdmF0ZS1rZXk=".into()),
            connection: Value::Value(vec![Value::Value(ConnectionState {
                datacenter_id: Value::Value("dc-1".into()),
                lan_id: Value::Value("1".into()),
                ipv4_cidr: Value::Value("192.168.1.10/24".into()),
                ..Default::default()
            })]),
            ..Default::default()
        }
    }

    #[test]
    fn import_ids_carry_the_location() {
        let key = WireguardGateway::parse_import("de/fra:gw-1").unwrap();
        assert_eq!(key, ResourceKey::scoped("de/fra", "gw-1"));
        let state = WireguardGateway::imported(&key);
        assert_eq!(state.location, Value::Value("de/fra".into()));
        assert_eq!(WireguardGateway::key(&state), Some(key));

        assert!(WireguardGateway::parse_import("gw-1").is_err());
    }

    #[test]
    fn private_key_is_sent_but_never_read_back() {
        let state = planned();
        assert_eq!(
            state.properties().private_key.as_deref(),
            Some("cHJpdmF0ZS1rZXk=")
        );

        let mut state = state;
        state.apply(Entity {
            id: "gw-1".into(),
            metadata: Metadata {
                status: Some("AVAILABLE".into()),
                public_key: Some("cHVibGljLWtleQ==".into()),
                ..Default::default()
            },
            properties: WireguardGatewayProperties {
                name: "gw".into(),
                gateway_ip: "203.0.113.10".into(),
                listen_port: Some(51820),
                connections: vec![Connection {
                    datacenter_id: "dc-1".into(),
                    lan_id: "1".into(),
                    ipv4_cidr: Some("192.168.1.10/24".into()),
                    ipv6_cidr: None,
                }],
                ..Default::default()
            },
        });
        assert_eq!(state.private_key, Value::Value("cHJpdmF0ZS1rZXk=".into()));
        assert_eq!(state.public_key, Value::Value("cHVibGljLWtleQ==".into()));
        assert_eq!(state.status, Value::Value("AVAILABLE".into()));
        assert_eq!(state.listen_port, Value::Value(51820));
        assert!(state.interface_ipv4_cidr.is_null());
    }

    #[test]
    fn location_is_immutable() {
        let prior = planned();
        let mut next = planned();
        next.location = Value::Value("es/vit".into());
        assert_eq!(
            WireguardGateway::immutable_changes(&prior, &next),
            vec!["location"]
        );
    }

    #[test]
    fn validation() {
        let mut diags = Diagnostics::default();
        planned().validate(&mut diags, AttributePath::default());
        assert!(diags.errors.is_empty());

        let mut state = planned();
        state.location = Value::Value("mars/olympus".into());
        state.interface_ipv4_cidr = Value::Null;
        state.validate(&mut diags, AttributePath::default());
        assert_eq!(diags.errors.len(), 2);
    }
}
