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

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::resolver::{resolve, Lookup, LookupError, Named};
use crate::sdk::{ApiError, SdkBundle, SdkHandle};
use crate::utils::WithValidate;

/// A kind of IONOS object that can be looked up by id or by name
#[async_trait]
pub trait CloudLookup: Default + Send + Sync + 'static {
    const KIND: &'static str;

    type State: Serialize + DeserializeOwned + WithValidate + Clone + Debug + Send + Sync;
    type Remote: Named + Send + Sync;

    fn schema() -> Schema;
    fn lookup(state: &Self::State) -> Lookup<'_>;
    fn apply(state: &mut Self::State, remote: Self::Remote);

    async fn get(
        &self,
        sdk: &SdkBundle,
        state: &Self::State,
        id: &str,
    ) -> Result<Self::Remote, ApiError>;
    async fn list(&self, sdk: &SdkBundle, state: &Self::State)
        -> Result<Vec<Self::Remote>, ApiError>;
}

/// Terraform data source backed by a [`CloudLookup`]
#[derive(Debug, Default)]
pub struct IonosDataSource<D: CloudLookup> {
    sdk: SdkHandle,
    inner: D,
}

impl<D: CloudLookup> IonosDataSource<D> {
    pub fn new(sdk: SdkHandle) -> Self {
        Self {
            sdk,
            inner: D::default(),
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
}

#[async_trait]
impl<D: CloudLookup> DataSource for IonosDataSource<D> {
    type State<'a> = D::State;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(D::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        // A missing id and name is left to `read`, both may still be unknown here
        if let Err(err @ LookupError::Conflicting { .. }) = D::lookup(&config).check(D::KIND) {
            diags.error(
                "Conflicting lookup attributes",
                err.to_string(),
                AttributePath::new("id"),
            );
        }
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
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let sdk = self.sdk(diags)?;
        let mut state = config;

        let found = {
            let (inner, sdk, filter) = (&self.inner, sdk.as_ref(), &state);
            resolve(
                D::KIND,
                &D::lookup(filter),
                |id| async move { inner.get(sdk, filter, &id).await },
                || inner.list(sdk, filter),
            )
            .await
        };

        match found {
            Ok(remote) => {
                tracing::debug!("found {} {}", D::KIND, remote.id());
                D::apply(&mut state, remote);
                Some(state)
            }
            Err(err) => {
                diags.root_error(format!("Failed to read {}", D::KIND), err.to_string());
                None
            }
        }
    }
}
