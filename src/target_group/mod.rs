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

//! `ionoscloud_target_group`

use std::time::Duration;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::Value;

use crate::data_source::CloudLookup;
use crate::poller::Readiness;
use crate::resolver::Lookup;
use crate::resource::{CloudResource, ResourceKey};
use crate::sdk::compute;
use crate::sdk::{ApiError, SdkBundle};
use crate::utils::{non_empty, Computed, Timeouts, WithSchema};

mod state;
mod validate;

pub use state::{HealthCheckState, TargetGroupDataState, TargetGroupState, TargetState};

#[derive(Debug, Default)]
pub struct TargetGroup;

#[async_trait]
impl CloudResource for TargetGroup {
    const KIND: &'static str = "target group";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

    type State = TargetGroupState;
    type Remote = compute::TargetGroup;

    fn schema() -> Schema {
        TargetGroupState::schema()
    }

    fn timeouts(state: &TargetGroupState) -> &Value<Timeouts> {
        &state.timeouts
    }

    fn key(state: &TargetGroupState) -> Option<ResourceKey> {
        non_empty(&state.id).map(ResourceKey::new)
    }

    fn set_id(state: &mut TargetGroupState, id: String) {
        state.id = Value::Value(id);
    }

    fn settle_computed(state: &mut TargetGroupState, mode: Computed) {
        mode.settle(&mut state.id);
        mode.settle(&mut state.protocol_version);
    }

    fn immutable_changes(_prior: &TargetGroupState, _planned: &TargetGroupState) -> Vec<&'static str> {
        Vec::new()
    }

    fn imported(key: &ResourceKey) -> TargetGroupState {
        TargetGroupState {
            id: Value::Value(key.id.clone()),
            ..Default::default()
        }
    }

    fn readiness(remote: &compute::TargetGroup) -> Readiness {
        remote.metadata.readiness(Self::READY)
    }

    fn apply(state: &mut TargetGroupState, remote: compute::TargetGroup) {
        state.apply(remote);
    }

    async fn create(
        &self,
        sdk: &SdkBundle,
        state: &TargetGroupState,
    ) -> Result<ResourceKey, ApiError> {
        let group = sdk.compute.create_target_group(state.properties()).await?;
        Ok(ResourceKey::new(group.id))
    }

    async fn fetch(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
    ) -> Result<compute::TargetGroup, ApiError> {
        sdk.compute.get_target_group(&key.id).await
    }

    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        _prior: &TargetGroupState,
        planned: &TargetGroupState,
    ) -> Result<(), ApiError> {
        sdk.compute
            .put_target_group(&key.id, planned.properties())
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError> {
        sdk.compute.delete_target_group(&key.id).await
    }
}

#[derive(Debug, Default)]
pub struct TargetGroupLookup;

#[async_trait]
impl CloudLookup for TargetGroupLookup {
    const KIND: &'static str = "target group";

    type State = TargetGroupDataState;
    type Remote = compute::TargetGroup;

    fn schema() -> Schema {
        TargetGroupDataState::schema()
    }

    fn lookup(state: &TargetGroupDataState) -> Lookup<'_> {
        Lookup {
            name_attr: "name",
            id: non_empty(&state.id),
            name: non_empty(&state.name),
            partial_match: state.partial_match.as_ref_option().copied().unwrap_or_default(),
        }
    }

    fn apply(state: &mut TargetGroupDataState, remote: compute::TargetGroup) {
        state.apply(remote);
    }

    async fn get(
        &self,
        sdk: &SdkBundle,
        _state: &TargetGroupDataState,
        id: &str,
    ) -> Result<compute::TargetGroup, ApiError> {
        sdk.compute.get_target_group(id).await
    }

    async fn list(
        &self,
        sdk: &SdkBundle,
        _state: &TargetGroupDataState,
    ) -> Result<Vec<compute::TargetGroup>, ApiError> {
        sdk.compute.list_target_groups().await
    }
}
