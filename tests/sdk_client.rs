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
use wiremock::matchers::{basic_auth, bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terraform_provider_ionoscloud::sdk::{ApiError, Credentials, SdkBundle, SdkConfig};

mod common;

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cloudapi/v6/targetgroups"))
        .and(query_param("depth", "1"))
        .and(bearer_token(common::TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "tg-1",
                "metadata": { "state": "AVAILABLE" },
                "properties": { "name": "web", "algorithm": "ROUND_ROBIN", "protocol": "HTTP" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = common::sdk(&server).get().expect("configured");
    let groups = sdk.compute.list_target_groups().await.expect("list");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "tg-1");
}

#[tokio::test]
async fn username_and_password_are_sent_as_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/containerregistries/registries"))
        .and(basic_auth("user@example.com", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = SdkConfig::new(Credentials::Basic {
        username: "user@example.com".into(),
        password: "hunter2".into(),
    });
    config.endpoint = Some(server.uri());
    let sdk = SdkBundle::new(config).expect("sdk");

    assert!(sdk.registry.list_registries().await.expect("list").is_empty());
}

#[tokio::test]
async fn api_errors_carry_the_ionos_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/databases/postgresql/clusters/bad"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "httpStatus": 422,
            "messages": [{ "errorCode": "psqlcluster-2", "message": "invalid cluster id" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/databases/postgresql/clusters/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sdk = common::sdk(&server).get().expect("configured");

    match sdk.psql.get_cluster("bad").await {
        Err(ApiError::Status {
            status, message, ..
        }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "[psqlcluster-2] invalid cluster id");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let err = sdk.psql.get_cluster("gone").await.expect_err("not found");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unreadable_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dataplatform/clusters/c-1/nodepools"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let sdk = common::sdk(&server).get().expect("configured");
    let err = sdk
        .dataplatform
        .list_node_pools("c-1")
        .await
        .expect_err("not json");
    assert!(matches!(err, ApiError::Decode { .. }));
}
