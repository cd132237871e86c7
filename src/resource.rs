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

use std::fmt::{Debug, Display};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::poller::{Poller, Readiness};
use crate::sdk::{ApiError, SdkBundle, SdkHandle};
use crate::utils::{Computed, Operation, Timeouts, WithValidate};

/// Identity of a remote object: its id and, for scoped APIs, its location or parent cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKey {
    pub scope: Option<String>,
    pub id: String,
}

impl ResourceKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            scope: None,
            id: id.into(),
        }
    }

    pub fn scoped(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            id: id.into(),
        }
    }

    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or_default()
    }

    /// Split a composite import id `<scope><sep><id>`
    pub fn parse_scoped(import_id: &str, sep: char, scope_name: &str) -> Result<Self, String> {
        match import_id.split_once(sep) {
            Some((scope, id)) if !scope.is_empty() && !id.is_empty() && !id.contains(sep) => {
                Ok(Self::scoped(scope, id))
            }
            _ => Err(format!(
                "invalid import id `{import_id}`, expected `<{scope_name}>{sep}<id>`"
            )),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{scope}/{}", self.id),
            None => f.write_str(&self.id),
        }
    }
}

/// A kind of IONOS object managed as a Terraform resource
#[async_trait]
pub trait CloudResource: Default + Send + Sync + 'static {
    /// Name used in messages
    const KIND: &'static str;
    const DEFAULT_TIMEOUT: Duration;
    /// Wait for the settle delay once the object is gone
    const SETTLE_AFTER_DELETE: bool = false;
    /// States considered ready
    const READY: &'static [&'static str] = &["AVAILABLE", "ACTIVE"];

    type State: Serialize + DeserializeOwned + WithValidate + Clone + Debug + Send + Sync;
    type Remote: Send + Sync;

    fn schema() -> Schema;
    fn default_timeout(_op: Operation) -> Duration {
        Self::DEFAULT_TIMEOUT
    }
    fn timeouts(state: &Self::State) -> &Value<Timeouts>;
    fn key(state: &Self::State) -> Option<ResourceKey>;
    fn set_id(state: &mut Self::State, id: String);
    fn settle_computed(state: &mut Self::State, mode: Computed);
    /// Names of the immutable attributes that differ between the two states
    fn immutable_changes(prior: &Self::State, planned: &Self::State) -> Vec<&'static str>;
    fn parse_import(import_id: &str) -> Result<ResourceKey, String> {
        if import_id.is_empty() {
            Err("the import id must not be empty".to_owned())
        } else {
            Ok(ResourceKey::new(import_id))
        }
    }
    /// Skeleton state of an imported object, filled by reading the object
    fn imported(key: &ResourceKey) -> Self::State;
    fn readiness(remote: &Self::Remote) -> Readiness;
    fn apply(state: &mut Self::State, remote: Self::Remote);

    async fn create(&self, sdk: &SdkBundle, state: &Self::State) -> Result<ResourceKey, ApiError>;
    async fn fetch(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<Self::Remote, ApiError>;
    async fn update(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        prior: &Self::State,
        planned: &Self::State,
    ) -> Result<(), ApiError>;
    async fn delete(&self, sdk: &SdkBundle, key: &ResourceKey) -> Result<(), ApiError>;
}

/// Terraform resource backed by a [`CloudResource`]
#[derive(Debug, Default)]
pub struct IonosResource<R: CloudResource> {
    sdk: SdkHandle,
    inner: R,
}

impl<R: CloudResource> IonosResource<R> {
    pub fn new(sdk: SdkHandle) -> Self {
        Self {
            sdk,
            inner: R::default(),
        }
    }

    fn sdk(&self, diags: &mut Diagnostics) -> Option<Arc<SdkBundle>> {
        match self.sdk.get() {
            Ok(sdk) => Some(sdk),
            Err(err) => {
                diags.root_error("Provider not configured", err.to_string());
                None
            }
        }
    }

    fn key(diags: &mut Diagnostics, state: &R::State) -> Option<ResourceKey> {
        let key = R::key(state);
        if key.is_none() {
            diags.error_short(
                format!("The {} id is unknown", R::KIND),
                AttributePath::new("id"),
            );
        }
        key
    }

    fn poller(sdk: &SdkBundle, key: &ResourceKey, state: &R::State, op: Operation) -> Poller {
        Poller::new(
            R::KIND,
            key.to_string(),
            sdk.poll_interval,
            Timeouts::get(R::timeouts(state), op, R::default_timeout(op)),
        )
    }

    /// Report immutable attributes that would change, return true if there is none
    fn check_immutable(diags: &mut Diagnostics, prior: &R::State, planned: &R::State) -> bool {
        let changes = R::immutable_changes(prior, planned);
        for field in &changes {
            diags.error(
                "Immutable attribute",
                format!(
                    "attribute \"{field}\" of {} is immutable, it cannot be changed once the {} is created",
                    R::KIND,
                    R::KIND
                ),
                AttributePath::new(*field),
            );
        }
        changes.is_empty()
    }

    async fn wait_ready(
        &self,
        sdk: &SdkBundle,
        key: &ResourceKey,
        state: &R::State,
        op: Operation,
    ) -> Result<(), String> {
        Self::poller(sdk, key, state, op)
            .until("become available", || async {
                self.inner
                    .fetch(sdk, key)
                    .await
                    .map(|remote| R::readiness(&remote))
            })
            .await
            .map_err(|err| err.to_string())
    }

    /// Read back the object, or settle the computed attributes to null if it cannot be read
    async fn refresh(
        &self,
        diags: &mut Diagnostics,
        sdk: &SdkBundle,
        key: &ResourceKey,
        state: &mut R::State,
    ) {
        match self.inner.fetch(sdk, key).await {
            Ok(remote) => R::apply(state, remote),
            Err(err) => {
                diags.root_error(format!("Failed to read {} {key}", R::KIND), err.to_string());
                R::settle_computed(state, Computed::Null);
            }
        }
    }
}

#[async_trait]
impl<R: CloudResource> Resource for IonosResource<R> {
    type State<'a> = R::State;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(R::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let sdk = self.sdk(diags)?;
        let key = Self::key(diags, &state)?;

        let mut state = state;
        match self.inner.fetch(&sdk, &key).await {
            Ok(remote) => {
                R::apply(&mut state, remote);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!("{} {key} not found, removing it from the state", R::KIND);
                None
            }
            Err(err) => {
                diags.root_error(format!("Failed to read {} {key}", R::KIND), err.to_string());
                Some((state, private_state))
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        R::settle_computed(&mut state, Computed::Unknown);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        if !Self::check_immutable(diags, &prior_state, &proposed_state) {
            return None;
        }

        Some((proposed_state, prior_private_state, Vec::new()))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let sdk = self.sdk(diags)?;
        let mut state = planned_state;

        let key = match self.inner.create(&sdk, &state).await {
            Ok(key) => key,
            Err(err) => {
                diags.root_error(format!("Failed to create {}", R::KIND), err.to_string());
                return None;
            }
        };
        tracing::info!("created {} {key}", R::KIND);
        R::set_id(&mut state, key.id.clone());

        // The object exists from now on: the state is returned even on failure
        if let Err(err) = self.wait_ready(&sdk, &key, &state, Operation::Create).await {
            diags.root_error(format!("{} {key} is not available", R::KIND), err);
        }
        self.refresh(diags, &sdk, &key, &mut state).await;

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        if !Self::check_immutable(diags, &prior_state, &planned_state) {
            return None;
        }

        let sdk = self.sdk(diags)?;
        let key = Self::key(diags, &prior_state)?;
        let mut state = planned_state;

        if let Err(err) = self
            .inner
            .update(&sdk, &key, &prior_state, &state)
            .await
        {
            diags.root_error(format!("Failed to update {} {key}", R::KIND), err.to_string());
            return None;
        }
        tracing::info!("updated {} {key}", R::KIND);

        if let Err(err) = self.wait_ready(&sdk, &key, &state, Operation::Update).await {
            diags.root_error(format!("{} {key} is not available", R::KIND), err);
        }
        self.refresh(diags, &sdk, &key, &mut state).await;

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let sdk = self.sdk(diags)?;
        let key = Self::key(diags, &state)?;

        match self.inner.delete(&sdk, &key).await {
            Ok(()) => (),
            Err(err) if err.is_not_found() => {
                tracing::info!("{} {key} already deleted", R::KIND);
                return Some(());
            }
            Err(err) => {
                diags.root_error(format!("Failed to delete {} {key}", R::KIND), err.to_string());
                return None;
            }
        }

        let gone = Self::poller(&sdk, &key, &state, Operation::Delete)
            .until_gone(|| async {
                self.inner
                    .fetch(&sdk, &key)
                    .await
                    .map(|remote| R::readiness(&remote))
            })
            .await;
        if let Err(err) = gone {
            diags.root_error(format!("{} {key} was not deleted", R::KIND), err.to_string());
            return None;
        }
        tracing::info!("deleted {} {key}", R::KIND);

        if R::SETTLE_AFTER_DELETE && !sdk.settle_delay.is_zero() {
            tracing::debug!(
                "waiting {:?} for the resources attached to {} {key} to be released",
                sdk.settle_delay,
                R::KIND
            );
            tokio::time::sleep(sdk.settle_delay).await;
        }

        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let key = match R::parse_import(&id) {
            Ok(key) => key,
            Err(err) => {
                diags.root_error(format!("Invalid {} import id", R::KIND), err);
                return None;
            }
        };
        let sdk = self.sdk(diags)?;

        let mut state = R::imported(&key);
        match self.inner.fetch(&sdk, &key).await {
            Ok(remote) => R::apply(&mut state, remote),
            Err(err) if err.is_not_found() => {
                diags.root_error(
                    format!("Cannot import non-existent {}", R::KIND),
                    format!("{} {key} was not found", R::KIND),
                );
                return None;
            }
            Err(err) => {
                diags.root_error(format!("Failed to import {} {key}", R::KIND), err.to_string());
                return None;
            }
        }
        R::settle_computed(&mut state, Computed::Null);
        tracing::info!("imported {} {key}", R::KIND);

        Some((state, Default::default()))
    }
}
