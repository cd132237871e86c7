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

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

mod client;
pub mod compute;
pub mod dataplatform;
pub mod psql;
pub mod registry;
pub mod vpn;

pub use client::{ApiClient, ApiError, Collection, Credentials, Entity, Envelope, Metadata};

use compute::ComputeClient;
use dataplatform::DataplatformClient;
use psql::PsqlClient;
use registry::RegistryClient;
use vpn::VpnClient;

pub const DEFAULT_API_URL: &str = "https://api.ionos.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Time given to the LANs of a deleted database to be released
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub credentials: Credentials,
    /// Replaces `https://api.ionos.com` and the regional VPN endpoints
    pub endpoint: Option<String>,
    pub insecure: bool,
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl SdkConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: None,
            insecure: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// One client per IONOS product line
#[derive(Debug, Clone)]
pub struct SdkBundle {
    pub psql: PsqlClient,
    pub registry: RegistryClient,
    pub compute: ComputeClient,
    pub vpn: VpnClient,
    pub dataplatform: DataplatformClient,
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl SdkBundle {
    pub fn new(config: SdkConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                "terraform-provider-ionoscloud/",
                env!("CARGO_PKG_VERSION")
            ))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|source| ApiError::Transport {
                url: config
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
                source,
            })?;

        let base = config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_owned();
        let api = |path: &str| {
            ApiClient::new(
                http.clone(),
                &format!("{base}/{path}"),
                config.credentials.clone(),
            )
        };

        Ok(Self {
            psql: PsqlClient::new(api(psql::PATH)),
            registry: RegistryClient::new(api(registry::PATH)),
            compute: ComputeClient::new(api(compute::PATH)),
            dataplatform: DataplatformClient::new(api(dataplatform::PATH)),
            vpn: VpnClient::new(
                http.clone(),
                config.credentials.clone(),
                config.endpoint.clone(),
            ),
            poll_interval: config.poll_interval,
            settle_delay: config.settle_delay,
        })
    }
}

/// SDK bundle shared between the provider and its resources.
///
/// Resources are built before the provider is configured, so the bundle is filled in later.
#[derive(Debug, Clone, Default)]
pub struct SdkHandle(Arc<RwLock<Option<Arc<SdkBundle>>>>);

impl SdkHandle {
    pub fn configured(bundle: SdkBundle) -> Self {
        let handle = Self::default();
        handle.set(bundle);
        handle
    }

    pub fn set(&self, bundle: SdkBundle) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(bundle));
    }

    pub fn get(&self) -> Result<Arc<SdkBundle>, ApiError> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ApiError::Unconfigured)
    }
}
