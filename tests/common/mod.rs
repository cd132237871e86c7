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

#![allow(dead_code)]

use std::time::Duration;

use terraform_provider_ionoscloud::sdk::{Credentials, SdkBundle, SdkConfig, SdkHandle};
use tf_provider::Diagnostics;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// SDK talking to `server`, polling fast and without settle delay
pub fn sdk(server: &MockServer) -> SdkHandle {
    sdk_with_settle_delay(server, Duration::ZERO)
}

pub fn sdk_with_settle_delay(server: &MockServer, settle_delay: Duration) -> SdkHandle {
    let mut config = SdkConfig::new(Credentials::Token(TOKEN.into()));
    config.endpoint = Some(server.uri());
    config.poll_interval = Duration::from_millis(10);
    config.settle_delay = settle_delay;
    SdkHandle::configured(SdkBundle::new(config).expect("sdk"))
}

pub fn error_summaries(diags: &Diagnostics) -> Vec<String> {
    diags
        .errors
        .iter()
        .map(|diag| format!("{}: {}", diag.summary, diag.detail))
        .collect()
}
