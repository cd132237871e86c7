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

//! Container Registry API

use serde::{Deserialize, Serialize};

use crate::resolver::Named;

use super::{ApiClient, ApiError, Collection, Entity, Envelope};

pub const PATH: &str = "containerregistries";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garbage_collection_schedule: Option<WeeklySchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<RegistryFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_usage: Option<StorageUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub days: Vec<String>,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryFeatures {
    pub vulnerability_scanning: Option<FeatureToggle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub bytes: i64,
    pub updated_at: Option<String>,
}

/// Mutable part of a registry, sent unwrapped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garbage_collection_schedule: Option<WeeklySchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<RegistryFeatures>,
}

pub type Registry = Entity<RegistryProperties>;

impl Named for Registry {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        self.properties.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    api: ApiClient,
}

impl RegistryClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_registries(&self) -> Result<Vec<Registry>, ApiError> {
        let registries: Collection<Registry> = self.api.get("registries", &[]).await?;
        Ok(registries.items)
    }

    pub async fn get_registry(&self, id: &str) -> Result<Registry, ApiError> {
        self.api.get(&format!("registries/{id}"), &[]).await
    }

    pub async fn create_registry(
        &self,
        properties: RegistryProperties,
    ) -> Result<Registry, ApiError> {
        self.api.post("registries", &Envelope { properties }).await
    }

    pub async fn patch_registry(&self, id: &str, patch: RegistryPatch) -> Result<Registry, ApiError> {
        self.api.patch(&format!("registries/{id}"), &patch).await
    }

    pub async fn delete_registry(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("registries/{id}")).await
    }
}
