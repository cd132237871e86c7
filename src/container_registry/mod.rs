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

//! `ionoscloud_container_registry`

use std::time::Duration;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::Value;

use crate::data_source::CloudLookup;
use crate::poller::Readiness;
use crate::resolver::Lookup;
use crate::resource::{CloudResource, ResourceKey};
use crate::sdk::registry::{Registry, RegistryPatch};
use crate::sdk::{ApiError, SdkBundle};
use crate::utils::{changed, non_empty, Computed, Timeouts, WithSchema};

mod state;
mod validate;

pub use state::{FeaturesState, RegistryDataState, RegistryState, ScheduleState};

#[derive(Debug, Default)]
pub struct ContainerRegistry;

#[async_trait]
impl CloudResource for ContainerRegistry {
    const KIND: &'static str = "container registry";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);
    const READY: &'static [&'static str] = &["RUNNING", "AVAILABLE"];

    type State = RegistryState;
    type Remote = Registry;

    fn schema() -> Schema {
        RegistryState::schema()
    }

    fn timeouts(state: &RegistryState) -> &Value<Timeouts> {
        &state.timeouts
    }

    fn key(state: &RegistryState) -> Option<ResourceKey> {
        non_empty(&state.id).map(ResourceKey::new)
    }

    fn set_id(state: &mut RegistryState, id: String) {
        state.id = Value::Value(id);
    }

    fn settle_computed(state: &mut RegistryState, mode: Computed) {
        mode.settle(&mut state.id);
        mode.settle(&mut state.hostname);
        mode.settle(&mut state.storage_usage_bytes);
    }

    fn immutable_changes(prior: &RegistryState, planned: &RegistryState) -> Vec<&'static str> {
        [
            ("name", changed(&prior.name, &planned.name)),
            ("location", changed(&prior.location, &planned.location)),
        ]
        .into_iter()
        .filter_map(|(field, changed)| changed.then_some(field))
        .collect()
    }

    fn imported(key: &ResourceKey) -> RegistryState {
        RegistryState {
            id: Value::Value(key.id.clone()),
            ..Default::default()
        }
    }

    fn readiness(remote: &Registry) -> Readiness {
        remote.metadata.readiness(Self::READY)
    }

    fn apply(state: &mut RegistryState, remote: Registry) {
        state.apply(remote);
    }

    async fn create(&self, sdk: &SdkBundle, state: &RegistryState) -> Result<ResourceKey, ApiError> {
        let registry = sdk.registry.create_registry(state.properties()).await?;
        Ok(ResourceKey::new(registry.id))
    }

    async fn fetch(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<Registry, ApiError> {
        sdk.registry.get_registry(&key.id).await
    }

    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        prior: &RegistryState,
        planned: &RegistryState,
    ) -> Result<(), ApiError> {
        let patch = planned.patch_from(prior);
        if patch == RegistryPatch::default() {
            tracing::debug!("nothing to update on container registry {key}");
            return Ok(());
        }
        sdk.registry.patch_registry(&key.id, patch).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError> {
        sdk.registry.delete_registry(&key.id).await
    }
}

#[derive(Debug, Default)]
pub struct ContainerRegistryLookup;

#[async_trait]
impl CloudLookup for ContainerRegistryLookup {
    const KIND: &'static str = "container registry";

    type State = RegistryDataState;
    type Remote = Registry;

    fn schema() -> Schema {
        RegistryDataState::schema()
    }

    fn lookup(state: &RegistryDataState) -> Lookup<'_> {
        Lookup {
            name_attr: "name",
            id: non_empty(&state.id),
            name: non_empty(&state.name),
            partial_match: state.partial_match.as_ref_option().copied().unwrap_or_default(),
        }
    }

    fn apply(state: &mut RegistryDataState, remote: Registry) {
        state.apply(remote);
    }

    async fn get(
        &self,
        sdk: &SdkBundle,
        _state: &RegistryDataState,
        id: &str,
    ) -> Result<Registry, ApiError> {
        sdk.registry.get_registry(id).await
    }

    async fn list(
        &self,
        sdk: &SdkBundle,
        state: &RegistryDataState,
    ) -> Result<Vec<Registry>, ApiError> {
        let registries = sdk.registry.list_registries().await?;
        Ok(match non_empty(&state.location) {
            Some(location) => registries
                .into_iter()
                .filter(|registry| registry.properties.location.as_deref() == Some(location))
                .collect(),
            None => registries,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sdk::registry::{FeatureToggle, RegistryFeatures, RegistryProperties, WeeklySchedule};
    use crate::sdk::{Entity, Metadata};

    use super::*;

    fn planned() -> RegistryState {
        RegistryState {
            name: Value::Value("my-registry".into()),
            location: Value::Value("de/fra".into()),
            garbage_collection_schedule: Value::Value(ScheduleState {
                days: Value::Value(vec![Value::Value("Monday".into())]),
                time: Value::Value("01:23:00+00:00".into()),
            }),
            ..Default::default()
        }
    }

    fn remote(state: &str) -> Registry {
        Entity {
            id: "r-1".into(),
            metadata: Metadata {
                state: Some(state.into()),
                ..Default::default()
            },
            properties: RegistryProperties {
                name: Some("my-registry".into()),
                location: Some("de/fra".into()),
                hostname: Some("my-registry.cr.de-fra.ionos.com".into()),
                garbage_collection_schedule: Some(WeeklySchedule {
                    days: vec!["Monday".into()],
                    time: "01:23:00+00:00".into(),
                }),
                features: Some(RegistryFeatures {
                    vulnerability_scanning: Some(FeatureToggle { enabled: true }),
                }),
                ..Default::default()
            },
        }
    }

    #[test]
    fn running_registries_are_ready() {
        assert_eq!(
            ContainerRegistry::readiness(&remote("Running")),
            Readiness::Ready
        );
        assert!(matches!(
            ContainerRegistry::readiness(&remote("Deploying")),
            Readiness::Pending(_)
        ));
    }

    #[test]
    fn name_and_location_are_immutable() {
        let prior = planned();
        let mut next = planned();
        next.name = Value::Value("other".into());
        next.location = Value::Value("de/txl".into());
        assert_eq!(
            ContainerRegistry::immutable_changes(&prior, &next),
            vec!["name", "location"]
        );
    }

    #[test]
    fn unconfigured_features_are_not_tracked() {
        let mut state = planned();
        state.apply(remote("Running"));
        assert!(state.features.is_null());
        assert_eq!(
            state.hostname,
            Value::Value("my-registry.cr.de-fra.ionos.com".into())
        );

        let mut data = RegistryDataState::default();
        data.apply(remote("Running"));
        assert_eq!(
            data.features,
            Value::Value(FeaturesState {
                vulnerability_scanning: Value::Value(true)
            })
        );
    }

    #[test]
    fn patch_sends_changed_blocks() {
        let prior = planned();
        assert_eq!(prior.patch_from(&prior), RegistryPatch::default());

        let mut next = planned();
        next.features = Value::Value(FeaturesState {
            vulnerability_scanning: Value::Value(false),
        });
        let patch = next.patch_from(&prior);
        assert!(patch.garbage_collection_schedule.is_none());
        assert_eq!(
            patch.features,
            Some(RegistryFeatures {
                vulnerability_scanning: Some(FeatureToggle { enabled: false })
            })
        );
    }
}
