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

//! Cloud API v6, restricted to target groups

use serde::{Deserialize, Serialize};

use crate::resolver::Named;

use super::{ApiClient, ApiError, Collection, Entity, Envelope};

pub const PATH: &str = "cloudapi/v6";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetGroupProperties {
    pub name: String,
    pub algorithm: String,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub ip: String,
    pub port: i64,
    pub weight: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
}

pub type TargetGroup = Entity<TargetGroupProperties>;

impl Named for TargetGroup {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.properties.name
    }
}

#[derive(Debug, Clone)]
pub struct ComputeClient {
    api: ApiClient,
}

impl ComputeClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_target_groups(&self) -> Result<Vec<TargetGroup>, ApiError> {
        let groups: Collection<TargetGroup> =
            self.api.get("targetgroups", &[("depth", "1")]).await?;
        Ok(groups.items)
    }

    pub async fn get_target_group(&self, id: &str) -> Result<TargetGroup, ApiError> {
        self.api
            .get(&format!("targetgroups/{id}"), &[("depth", "1")])
            .await
    }

    pub async fn create_target_group(
        &self,
        properties: TargetGroupProperties,
    ) -> Result<TargetGroup, ApiError> {
        self.api.post("targetgroups", &Envelope { properties }).await
    }

    /// Replace every property of the target group
    pub async fn put_target_group(
        &self,
        id: &str,
        properties: TargetGroupProperties,
    ) -> Result<TargetGroup, ApiError> {
        self.api
            .put(&format!("targetgroups/{id}"), &Envelope { properties })
            .await
    }

    pub async fn delete_target_group(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("targetgroups/{id}")).await
    }
}
