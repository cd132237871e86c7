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

//! Managed Stackable Data Platform API, restricted to node pools

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resolver::Named;

use super::{ApiClient, ApiError, Collection, Entity, Envelope};

pub const PATH: &str = "dataplatform";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    pub time: String,
    pub day_of_the_week: String,
}

pub type NodePool = Entity<NodePoolProperties>;

impl Named for NodePool {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        self.properties.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct DataplatformClient {
    api: ApiClient,
}

impl DataplatformClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_node_pools(&self, cluster_id: &str) -> Result<Vec<NodePool>, ApiError> {
        let pools: Collection<NodePool> = self
            .api
            .get(&format!("clusters/{cluster_id}/nodepools"), &[])
            .await?;
        Ok(pools.items)
    }

    pub async fn get_node_pool(&self, cluster_id: &str, id: &str) -> Result<NodePool, ApiError> {
        self.api
            .get(&format!("clusters/{cluster_id}/nodepools/{id}"), &[])
            .await
    }

    pub async fn create_node_pool(
        &self,
        cluster_id: &str,
        properties: NodePoolProperties,
    ) -> Result<NodePool, ApiError> {
        self.api
            .post(
                &format!("clusters/{cluster_id}/nodepools"),
                &Envelope { properties },
            )
            .await
    }

    pub async fn patch_node_pool(
        &self,
        cluster_id: &str,
        id: &str,
        properties: NodePoolProperties,
    ) -> Result<NodePool, ApiError> {
        self.api
            .patch(
                &format!("clusters/{cluster_id}/nodepools/{id}"),
                &Envelope { properties },
            )
            .await
    }

    pub async fn delete_node_pool(&self, cluster_id: &str, id: &str) -> Result<(), ApiError> {
        self.api
            .delete(&format!("clusters/{cluster_id}/nodepools/{id}"))
            .await
    }
}
