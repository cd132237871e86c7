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

//! `ionoscloud_pg_cluster`: managed PostgreSQL clusters

use std::time::Duration;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::Value;

use crate::data_source::CloudLookup;
use crate::poller::Readiness;
use crate::resolver::Lookup;
use crate::resource::{CloudResource, ResourceKey};
use crate::sdk::psql::Cluster;
use crate::sdk::{ApiError, SdkBundle};
use crate::utils::{changed, non_empty, Computed, Operation, Timeouts, WithSchema};

mod state;
mod validate;

pub use state::{
    ClusterDataState, ClusterState, ConnectionState, CredentialsState, MaintenanceWindowState,
};

#[derive(Debug, Default)]
pub struct PgCluster;

#[async_trait]
impl CloudResource for PgCluster {
    const KIND: &'static str = "PostgreSQL cluster";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120 * 60);
    const SETTLE_AFTER_DELETE: bool = true;

    type State = ClusterState;
    type Remote = Cluster;

    fn schema() -> Schema {
        ClusterState::schema()
    }

    fn default_timeout(op: Operation) -> Duration {
        match op {
            Operation::Delete => Duration::from_secs(60 * 60),
            _ => Self::DEFAULT_TIMEOUT,
        }
    }

    fn timeouts(state: &ClusterState) -> &Value<Timeouts> {
        &state.timeouts
    }

    fn key(state: &ClusterState) -> Option<ResourceKey> {
        non_empty(&state.id).map(ResourceKey::new)
    }

    fn set_id(state: &mut ClusterState, id: String) {
        state.id = Value::Value(id);
    }

    fn settle_computed(state: &mut ClusterState, mode: Computed) {
        mode.settle(&mut state.id);
        mode.settle(&mut state.backup_location);
        mode.settle(&mut state.dns_name);
    }

    fn immutable_changes(prior: &ClusterState, planned: &ClusterState) -> Vec<&'static str> {
        let mut changes = Vec::new();
        if changed(&prior.location, &planned.location) {
            changes.push("location");
        }
        if changed(&prior.backup_location, &planned.backup_location) {
            changes.push("backup_location");
        }
        if changed(&prior.connections, &planned.connections) {
            changes.push("connections");
        }
        if changed(&prior.credentials, &planned.credentials) {
            changes.push("credentials");
        }
        changes
    }

    fn imported(key: &ResourceKey) -> ClusterState {
        ClusterState {
            id: Value::Value(key.id.clone()),
            ..Default::default()
        }
    }

    fn readiness(remote: &Cluster) -> Readiness {
        remote.metadata.readiness(Self::READY)
    }

    fn apply(state: &mut ClusterState, remote: Cluster) {
        state.apply(remote);
    }

    async fn create(&self, sdk: &SdkBundle, state: &ClusterState) -> Result<ResourceKey, ApiError> {
        let cluster = sdk.psql.create_cluster(state.properties()).await?;
        Ok(ResourceKey::new(cluster.id))
    }

    async fn fetch(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<Cluster, ApiError> {
        sdk.psql.get_cluster(&key.id).await
    }

    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        prior: &ClusterState,
        planned: &ClusterState,
    ) -> Result<(), ApiError> {
        sdk.psql
            .patch_cluster(&key.id, planned.patch_from(prior))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError> {
        sdk.psql.delete_cluster(&key.id).await
    }
}

#[derive(Debug, Default)]
pub struct PgClusterLookup;

#[async_trait]
impl CloudLookup for PgClusterLookup {
    const KIND: &'static str = "PostgreSQL cluster";

    type State = ClusterDataState;
    type Remote = Cluster;

    fn schema() -> Schema {
        ClusterDataState::schema()
    }

    fn lookup(state: &ClusterDataState) -> Lookup<'_> {
        Lookup {
            name_attr: "display_name",
            id: non_empty(&state.id),
            name: non_empty(&state.display_name),
            partial_match: state.partial_match.as_ref_option().copied().unwrap_or_default(),
        }
    }

    fn apply(state: &mut ClusterDataState, remote: Cluster) {
        state.apply(remote);
    }

    async fn get(
        &self,
        sdk: &SdkBundle,
        _state: &ClusterDataState,
        id: &str,
    ) -> Result<Cluster, ApiError> {
        sdk.psql.get_cluster(id).await
    }

    async fn list(&self, sdk: &SdkBundle, _state: &ClusterDataState) -> Result<Vec<Cluster>, ApiError> {
        sdk.psql.list_clusters().await
    }
}
