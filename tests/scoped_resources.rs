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

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terraform_provider_ionoscloud::data_source::IonosDataSource;
use terraform_provider_ionoscloud::dataplatform_node_pool::NodePool;
use terraform_provider_ionoscloud::resolver::LookupError;
use terraform_provider_ionoscloud::resource::IonosResource;
use terraform_provider_ionoscloud::vpn_wireguard_gateway::{
    GatewayDataState, WireguardGatewayLookup,
};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{DataSource, Diagnostics, Resource};

mod common;

#[tokio::test]
async fn node_pool_import_uses_the_cluster_scope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dataplatform/clusters/cluster-1/nodepools/pool-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pool-1",
            "metadata": { "state": "AVAILABLE" },
            "properties": {
                "name": "pool",
                "dataPlatformVersion": "24.3",
                "datacenterId": "dc-1",
                "nodeCount": 2,
                "cpuFamily": "INTEL_SKYLAKE",
                "coresCount": 4,
                "ramSize": 4096,
                "availabilityZone": "AUTO",
                "storageType": "SSD",
                "storageSize": 100,
                "labels": { "team": "data" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resource = IonosResource::<NodePool>::new(common::sdk(&server));
    let mut diags = Diagnostics::default();
    let (state, _) = resource
        .import(&mut diags, "cluster-1/pool-1".into())
        .await
        .expect("imported");

    assert!(diags.errors.is_empty(), "{:?}", common::error_summaries(&diags));
    assert_eq!(state.id, Value::Value("pool-1".into()));
    assert_eq!(state.cluster_id, Value::Value("cluster-1".into()));
    assert_eq!(state.node_count, Value::Value(2));
    assert_eq!(state.cores_count, Value::Value(4));
    assert!(state.maintenance_window.is_null());
    assert!(state.annotations.is_null());
}

#[tokio::test]
async fn node_pool_import_of_missing_pool_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dataplatform/clusters/cluster-1/nodepools/pool-9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resource = IonosResource::<NodePool>::new(common::sdk(&server));
    let mut diags = Diagnostics::default();
    let imported = resource
        .import(&mut diags, "cluster-1/pool-9".into())
        .await;

    assert!(imported.is_none());
    assert_eq!(
        diags.errors[0].summary,
        "Cannot import non-existent Data Platform node pool"
    );

    let mut diags = Diagnostics::default();
    assert!(resource.import(&mut diags, "pool-9".into()).await.is_none());
    assert_eq!(diags.errors.len(), 1);
}

fn gateway(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "metadata": { "status": "AVAILABLE", "publicKey": "cHVibGljLWtleQ==" },
        "properties": {
            "name": name,
            "gatewayIP": "203.0.113.10",
            "interfaceIPv4CIDR": "10.8.0.1/24",
            "listenPort": 51820,
            "connections": []
        }
    })
}

#[tokio::test]
async fn gateway_lookup_reports_ambiguous_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wireguardgateways"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [gateway("gw-1", "edge"), gateway("gw-2", "edge"), gateway("gw-3", "core")]
        })))
        .mount(&server)
        .await;

    let lookup = IonosDataSource::<WireguardGatewayLookup>::new(common::sdk(&server));
    let config = |name: &str, partial: bool| GatewayDataState {
        location: Value::Value("de/fra".into()),
        name: Value::Value(name.into()),
        partial_match: if partial { Value::Value(true) } else { Value::Null },
        ..Default::default()
    };

    let mut diags = Diagnostics::default();
    assert!(lookup
        .read(&mut diags, config("edge", false), ValueEmpty::default())
        .await
        .is_none());
    let errors = common::error_summaries(&diags);
    assert!(errors[0].contains("more than one WireGuard gateway found"));
    assert!(errors[0].contains("gw-1"));
    assert!(errors[0].contains("gw-2"));

    let mut diags = Diagnostics::default();
    let found = lookup
        .read(&mut diags, config("COR", true), ValueEmpty::default())
        .await
        .expect("partial match");
    assert_eq!(found.id, Value::Value("gw-3".into()));
    assert_eq!(found.public_key, Value::Value("cHVibGljLWtleQ==".into()));
}

#[tokio::test]
async fn gateway_lookup_rejects_id_and_name() {
    let lookup = IonosDataSource::<WireguardGatewayLookup>::new(Default::default());
    let mut diags = Diagnostics::default();
    let config = GatewayDataState {
        id: Value::Value("gw-1".into()),
        location: Value::Value("de/fra".into()),
        name: Value::Value("edge".into()),
        ..Default::default()
    };

    assert!(lookup.validate(&mut diags, config).await.is_none());
    assert_eq!(diags.errors[0].summary, "Conflicting lookup attributes");
    assert_eq!(
        diags.errors[0].detail,
        LookupError::Conflicting { name_attr: "name" }.to_string()
    );
}
