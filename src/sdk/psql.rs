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

//! DBaaS PostgreSQL API

use serde::{Deserialize, Serialize};

use crate::resolver::Named;

use super::{ApiClient, ApiError, Collection, Entity, Envelope};

pub const PATH: &str = "databases/postgresql";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<Connection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronization_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<DbUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub datacenter_id: String,
    pub lan_id: String,
    pub cidr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    pub time: String,
    pub day_of_the_week: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbUser {
    pub username: String,
    pub password: String,
}

pub type Cluster = Entity<ClusterProperties>;

impl Named for Cluster {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        self.properties.display_name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PsqlClient {
    api: ApiClient,
}

impl PsqlClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_clusters(&self) -> Result<Vec<Cluster>, ApiError> {
        let clusters: Collection<Cluster> = self.api.get("clusters", &[]).await?;
        Ok(clusters.items)
    }

    pub async fn get_cluster(&self, id: &str) -> Result<Cluster, ApiError> {
        self.api.get(&format!("clusters/{id}"), &[]).await
    }

    pub async fn create_cluster(&self, properties: ClusterProperties) -> Result<Cluster, ApiError> {
        self.api.post("clusters", &Envelope { properties }).await
    }

    pub async fn patch_cluster(
        &self,
        id: &str,
        properties: ClusterProperties,
    ) -> Result<Cluster, ApiError> {
        self.api
            .patch(&format!("clusters/{id}"), &Envelope { properties })
            .await
    }

    pub async fn delete_cluster(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("clusters/{id}")).await
    }
}
