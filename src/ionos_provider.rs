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

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{
    map, AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider,
};

use crate::container_registry::{ContainerRegistry, ContainerRegistryLookup};
use crate::data_source::IonosDataSource;
use crate::dataplatform_node_pool::{NodePool, NodePoolLookup};
use crate::pg_cluster::{PgCluster, PgClusterLookup};
use crate::resource::IonosResource;
use crate::sdk::{Credentials, SdkBundle, SdkConfig, SdkHandle};
use crate::target_group::{TargetGroup, TargetGroupLookup};
use crate::utils::{non_empty, optional, sensitive};
use crate::vpn_wireguard_gateway::{WireguardGateway, WireguardGatewayLookup};

pub const TOKEN_ENV: &str = "IONOS_TOKEN";
pub const USERNAME_ENV: &str = "IONOS_USERNAME";
pub const PASSWORD_ENV: &str = "IONOS_PASSWORD";
pub const API_URL_ENV: &str = "IONOS_API_URL";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub token: Value<String>,
    pub username: Value<String>,
    pub password: Value<String>,
    pub endpoint: Value<String>,
    pub insecure: Value<bool>,
}

impl ProviderConfig {
    /// Resolve the credentials, the configuration taking precedence over the environment.
    ///
    /// A token wins over username and password.
    pub fn credentials(&self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
        let setting = |value: &Value<String>, var: &str| {
            non_empty(value)
                .map(str::to_owned)
                .or_else(|| env(var).filter(|v| !v.is_empty()))
        };

        if let Some(token) = setting(&self.token, TOKEN_ENV) {
            return Ok(Credentials::Token(token));
        }
        match (
            setting(&self.username, USERNAME_ENV),
            setting(&self.password, PASSWORD_ENV),
        ) {
            (Some(username), Some(password)) => Ok(Credentials::Basic { username, password }),
            (Some(_), None) => Err(anyhow!(
                "a password is required along with the username (`password` or {PASSWORD_ENV})"
            )),
            _ => Err(anyhow!(
                "missing credentials: set `token` ({TOKEN_ENV}) or `username` and `password` ({USERNAME_ENV}, {PASSWORD_ENV})"
            )),
        }
    }

    /// Report a username that no password, configured or from the environment, goes along with
    pub fn check(&self, diags: &mut Diagnostics, env: impl Fn(&str) -> Option<String>) {
        let from_env = |var: &str| env(var).is_some_and(|v| !v.is_empty());
        let has_token = non_empty(&self.token).is_some() || from_env(TOKEN_ENV);
        let has_password = !self.password.is_null() || from_env(PASSWORD_ENV);

        if non_empty(&self.username).is_some() && !has_token && !has_password {
            diags.error(
                "Missing password",
                format!("`password` (or {PASSWORD_ENV}) is required when `username` is set"),
                AttributePath::new("password"),
            );
        }
    }

    pub fn endpoint(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        non_empty(&self.endpoint)
            .map(str::to_owned)
            .or_else(|| env(API_URL_ENV).filter(|v| !v.is_empty()))
    }

    pub fn sdk_config(&self, env: impl Fn(&str) -> Option<String>) -> Result<SdkConfig> {
        let mut config = SdkConfig::new(self.credentials(&env)?);
        config.endpoint = self.endpoint(&env);
        config.insecure = self.insecure.as_ref_option().copied().unwrap_or_default();
        Ok(config)
    }
}

#[derive(Debug, Default, Clone)]
pub struct IonosProvider {
    sdk: SdkHandle,
}

impl IonosProvider {
    /// Provider sharing an already configured SDK handle
    pub fn with_sdk(sdk: SdkHandle) -> Self {
        Self { sdk }
    }
}

#[async_trait]
impl Provider for IonosProvider {
    type Config<'a> = ProviderConfig;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain("IONOS Cloud"),
                attributes: map! {
                    "token" => sensitive(optional(
                        AttributeType::String,
                        &format!("IONOS authentication token (env: {TOKEN_ENV})"),
                    )),
                    "username" => optional(
                        AttributeType::String,
                        &format!("IONOS username, used when no token is set (env: {USERNAME_ENV})"),
                    ),
                    "password" => sensitive(optional(
                        AttributeType::String,
                        &format!("IONOS password (env: {PASSWORD_ENV})"),
                    )),
                    "endpoint" => optional(
                        AttributeType::String,
                        &format!("Base URL replacing https://api.ionos.com and the regional VPN endpoints (env: {API_URL_ENV})"),
                    ),
                    "insecure" => optional(
                        AttributeType::Bool,
                        "Accept invalid TLS certificates",
                    ),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config.check(diags, |var: &str| std::env::var(var).ok());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let env = |var: &str| std::env::var(var).ok();
        let sdk_config = match config.sdk_config(env) {
            Ok(sdk_config) => sdk_config,
            Err(err) => {
                diags.root_error("Invalid provider configuration", err.to_string());
                return None;
            }
        };

        match SdkBundle::new(sdk_config) {
            Ok(bundle) => self.sdk.set(bundle),
            Err(err) => {
                diags.root_error("Failed to build the IONOS clients", err.to_string());
                return None;
            }
        }
        tracing::info!("ionoscloud provider configured (terraform {terraform_version})");

        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let sdk = &self.sdk;
        Some(map! {
            "ionoscloud_pg_cluster" => IonosResource::<PgCluster>::new(sdk.clone()),
            "ionoscloud_container_registry" => IonosResource::<ContainerRegistry>::new(sdk.clone()),
            "ionoscloud_target_group" => IonosResource::<TargetGroup>::new(sdk.clone()),
            "ionoscloud_vpn_wireguard_gateway" => IonosResource::<WireguardGateway>::new(sdk.clone()),
            "ionoscloud_dataplatform_node_pool" => IonosResource::<NodePool>::new(sdk.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        let sdk = &self.sdk;
        Some(map! {
            "ionoscloud_pg_cluster" => IonosDataSource::<PgClusterLookup>::new(sdk.clone()),
            "ionoscloud_container_registry" => IonosDataSource::<ContainerRegistryLookup>::new(sdk.clone()),
            "ionoscloud_target_group" => IonosDataSource::<TargetGroupLookup>::new(sdk.clone()),
            "ionoscloud_vpn_wireguard_gateway" => IonosDataSource::<WireguardGatewayLookup>::new(sdk.clone()),
            "ionoscloud_dataplatform_node_pool" => IonosDataSource::<NodePoolLookup>::new(sdk.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| value.to_string())
        }
    }

    fn set(value: &str) -> Value<String> {
        Value::Value(value.to_owned())
    }

    #[test]
    fn token_takes_precedence() {
        let config = ProviderConfig {
            token: set("tok"),
            username: set("user"),
            password: set("pass"),
            ..Default::default()
        };
        assert_eq!(
            config.credentials(env(&[])).unwrap(),
            Credentials::Token("tok".into())
        );
    }

    #[test]
    fn environment_fallback() {
        let config = ProviderConfig::default();
        assert_eq!(
            config
                .credentials(env(&[(USERNAME_ENV, "user"), (PASSWORD_ENV, "pass")]))
                .unwrap(),
            Credentials::Basic {
                username: "user".into(),
                password: "pass".into()
            }
        );
        assert_eq!(
            config.credentials(env(&[(TOKEN_ENV, "env-token")])).unwrap(),
            Credentials::Token("env-token".into())
        );
        assert_eq!(
            config.endpoint(env(&[(API_URL_ENV, "http://localhost:1234")])),
            Some("http://localhost:1234".into())
        );
    }

    #[test]
    fn configuration_wins_over_environment() {
        let config = ProviderConfig {
            token: set("tok"),
            endpoint: set("http://configured"),
            ..Default::default()
        };
        let env = env(&[(TOKEN_ENV, "env-token"), (API_URL_ENV, "http://env")]);
        assert_eq!(
            config.credentials(&env).unwrap(),
            Credentials::Token("tok".into())
        );
        assert_eq!(config.endpoint(&env), Some("http://configured".into()));
    }

    #[test]
    fn missing_credentials() {
        assert!(ProviderConfig::default().credentials(env(&[])).is_err());
        let config = ProviderConfig {
            username: set("user"),
            ..Default::default()
        };
        assert!(config.credentials(env(&[])).is_err());
    }

    #[tokio::test]
    async fn username_without_password_is_rejected() {
        let provider = IonosProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            username: set("user"),
            ..Default::default()
        };
        assert!(provider.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn username_accepts_a_password_from_the_environment() {
        let config = ProviderConfig {
            username: set("user"),
            ..Default::default()
        };
        let with_password = env(&[(PASSWORD_ENV, "from-env")]);

        let mut diags = Diagnostics::default();
        config.check(&mut diags, &with_password);
        assert!(diags.errors.is_empty());
        assert!(config.sdk_config(&with_password).is_ok());

        config.check(&mut diags, env(&[]));
        assert_eq!(diags.errors.len(), 1);
        assert!(config.sdk_config(env(&[])).is_err());
    }

    #[test]
    fn every_type_is_registered() {
        let provider = IonosProvider::default();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).unwrap();
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        for name in [
            "ionoscloud_pg_cluster",
            "ionoscloud_container_registry",
            "ionoscloud_target_group",
            "ionoscloud_vpn_wireguard_gateway",
            "ionoscloud_dataplatform_node_pool",
        ] {
            assert!(resources.contains_key(name), "{name}");
            assert!(data_sources.contains_key(name), "{name}");
        }
    }
}
