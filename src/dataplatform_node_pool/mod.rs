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

//! `ionoscloud_dataplatform_node_pool`, imported as `<cluster_id>/<id>`

use std::time::Duration;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::Value;

use crate::data_source::CloudLookup;
use crate::poller::Readiness;
use crate::resolver::Lookup;
use crate::resource::{CloudResource, ResourceKey};
use crate::sdk::dataplatform;
use crate::sdk::{ApiError, SdkBundle};
use crate::utils::{changed, non_empty, Computed, Timeouts, WithSchema};

mod state;
mod validate;

pub use state::{Labels, MaintenanceWindowState, NodePoolDataState, NodePoolState};

#[derive(Debug, Default)]
pub struct NodePool;

#[async_trait]
impl CloudResource for NodePool {
    const KIND: &'static str = "Data Platform node pool";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

    type State = NodePoolState;
    type Remote = dataplatform::NodePool;

    fn schema() -> Schema {
        NodePoolState::schema()
    }

    fn timeouts(state: &NodePoolState) -> &Value<Timeouts> {
        &state.timeouts
    }

    fn key(state: &NodePoolState) -> Option<ResourceKey> {
        let cluster_id = non_empty(&state.cluster_id)?;
        non_empty(&state.id).map(|id| ResourceKey::scoped(cluster_id, id))
    }

    fn set_id(state: &mut NodePoolState, id: String) {
        state.id = Value::Value(id);
    }

    fn settle_computed(state: &mut NodePoolState, mode: Computed) {
        mode.settle(&mut state.id);
        mode.settle(&mut state.version);
        mode.settle(&mut state.datacenter_id);
        mode.settle(&mut state.cpu_family);
        mode.settle(&mut state.cores_count);
        mode.settle(&mut state.ram_size);
        mode.settle(&mut state.availability_zone);
        mode.settle(&mut state.storage_type);
        mode.settle(&mut state.storage_size);
    }

    fn immutable_changes(prior: &NodePoolState, planned: &NodePoolState) -> Vec<&'static str> {
        [
            ("cluster_id", changed(&prior.cluster_id, &planned.cluster_id)),
            ("name", changed(&prior.name, &planned.name)),
            ("cpu_family", changed(&prior.cpu_family, &planned.cpu_family)),
            ("cores_count", changed(&prior.cores_count, &planned.cores_count)),
            ("ram_size", changed(&prior.ram_size, &planned.ram_size)),
            (
                "availability_zone",
                changed(&prior.availability_zone, &planned.availability_zone),
            ),
            ("storage_type", changed(&prior.storage_type, &planned.storage_type)),
            ("storage_size", changed(&prior.storage_size, &planned.storage_size)),
        ]
        .into_iter()
        .filter_map(|(field, changed)| changed.then_some(field))
        .collect()
    }

    fn parse_import(import_id: &str) -> Result<ResourceKey, String> {
        ResourceKey::parse_scoped(import_id, '/', "cluster_id")
    }

    fn imported(key: &ResourceKey) -> NodePoolState {
        NodePoolState {
            id: Value::Value(key.id.clone()),
            cluster_id: Value::Value(key.scope().to_owned()),
            ..Default::default()
        }
    }

    fn readiness(remote: &dataplatform::NodePool) -> Readiness {
        remote.metadata.readiness(Self::READY)
    }

    fn apply(state: &mut NodePoolState, remote: dataplatform::NodePool) {
        state.apply(remote);
    }

    async fn create(&self, sdk: &SdkBundle, state: &NodePoolState) -> Result<ResourceKey, ApiError> {
        let cluster_id = state.cluster_id();
        let pool = sdk
            .dataplatform
            .create_node_pool(cluster_id, state.properties())
            .await?;
        Ok(ResourceKey::scoped(cluster_id, pool.id))
    }

    async fn fetch(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
    ) -> Result<dataplatform::NodePool, ApiError> {
        sdk.dataplatform.get_node_pool(key.scope(), &key.id).await
    }

    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        _prior: &NodePoolState,
        planned: &NodePoolState,
    ) -> Result<(), ApiError> {
        sdk.dataplatform
            .patch_node_pool(key.scope(), &key.id, planned.patch())
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError> {
        sdk.dataplatform.delete_node_pool(key.scope(), &key.id).await
    }
}

#[derive(Debug, Default)]
pub struct NodePoolLookup;

#[async_trait]
impl CloudLookup for NodePoolLookup {
    const KIND: &'static str = "Data Platform node pool";

    type State = NodePoolDataState;
    type Remote = dataplatform::NodePool;

    fn schema() -> Schema {
        NodePoolDataState::schema()
    }

    fn lookup(state: &NodePoolDataState) -> Lookup<'_> {
        Lookup {
            name_attr: "name",
            id: non_empty(&state.id),
            name: non_empty(&state.name),
            partial_match: state.partial_match.as_ref_option().copied().unwrap_or_default(),
        }
    }

    fn apply(state: &mut NodePoolDataState, remote: dataplatform::NodePool) {
        state.apply(remote);
    }

    async fn get(
        &self,
        sdk: &SdkBundle,
        state: &NodePoolDataState,
        id: &str,
    ) -> Result<dataplatform::NodePool, ApiError> {
        sdk.dataplatform.get_node_pool(state.cluster_id(), id).await
    }

    async fn list(
        &self,
        sdk: &SdkBundle,
        state: &NodePoolDataState,
    ) -> Result<Vec<dataplatform::NodePool>, ApiError> {
        sdk.dataplatform.list_node_pools(state.cluster_id()).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tf_provider::{AttributePath, Diagnostics};

    use crate::sdk::dataplatform::{MaintenanceWindow, NodePoolProperties};
    use crate::sdk::Entity;
    use crate::utils::WithValidate;

    use super::*;

    fn planned() -> NodePoolState {
        NodePoolState {
            cluster_id: Value::Value("cluster-1".into()),
            name: Value::Value("pool".into()),
            node_count: Value::Value(2),
            labels: Value::Value(BTreeMap::from([(
                "team".to_owned(),
                Value::Value("data".to_owned()),
            )])),
            ..Default::default()
        }
    }

    #[test]
    fn import_ids_carry_the_cluster() {
        let key = NodePool::parse_import("cluster-1/pool-1").unwrap();
        let state = NodePool::imported(&key);
        assert_eq!(state.cluster_id, Value::Value("cluster-1".into()));
        assert_eq!(NodePool::key(&state), Some(key));
        assert!(NodePool::parse_import("pool-1").is_err());
    }

    #[test]
    fn patch_only_holds_mutable_attributes() {
        let mut state = planned();
        state.cores_count = Value::Value(4);
        state.node_count = Value::Value(3);
        assert_eq!(
            state.patch(),
            NodePoolProperties {
                node_count: Some(3),
                labels: Some(BTreeMap::from([("team".into(), "data".into())])),
                annotations: Some(BTreeMap::new()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn assigned_maintenance_window_is_tracked_only_when_configured() {
        let remote = || Entity {
            id: "pool-1".into(),
            metadata: Default::default(),
            properties: NodePoolProperties {
                name: Some("pool".into()),
                maintenance_window: Some(MaintenanceWindow {
                    time: "03:00:00".into(),
                    day_of_the_week: "Tuesday".into(),
                }),
                ..Default::default()
            },
        };

        let mut state = planned();
        state.apply(remote());
        assert!(state.maintenance_window.is_null());

        let mut state = planned();
        state.maintenance_window = Value::Value(MaintenanceWindowState::default());
        state.apply(remote());
        assert_eq!(
            state.maintenance_window,
            Value::Value(MaintenanceWindowState {
                day_of_the_week: Value::Value("Tuesday".into()),
                time: Value::Value("03:00:00".into()),
            })
        );

        let mut data = NodePoolDataState::default();
        data.apply(remote());
        assert!(data.maintenance_window.is_value());
    }

    #[test]
    fn sizing_is_immutable() {
        let mut prior = planned();
        prior.cores_count = Value::Value(4);
        prior.storage_type = Value::Value("SSD".into());

        let mut next = prior.clone();
        next.node_count = Value::Value(5);
        next.labels = Value::Null;
        assert!(NodePool::immutable_changes(&prior, &next).is_empty());

        next.cores_count = Value::Value(8);
        next.storage_type = Value::Value("HDD".into());
        assert_eq!(
            NodePool::immutable_changes(&prior, &next),
            vec!["cores_count", "storage_type"]
        );
    }

    #[test]
    fn validation() {
        let mut diags = Diagnostics::default();
        planned().validate(&mut diags, AttributePath::default());
        assert!(diags.errors.is_empty());

        let mut state = planned();
        state.node_count = Value::Value(0);
        state.ram_size = Value::Value(1024);
        state.availability_zone = Value::Value("ZONE_9".into());
        state.validate(&mut diags, AttributePath::default());
        assert_eq!(diags.errors.len(), 3);
    }
}
