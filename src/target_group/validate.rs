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

use tf_provider::{AttributePath, Diagnostics};

use crate::utils::{check_one_of, check_range, WithValidate};

use super::state::{TargetGroupDataState, TargetGroupState, TargetState};

pub const ALGORITHMS: &[&str] = &["ROUND_ROBIN", "LEAST_CONNECTION", "RANDOM", "SOURCE_IP"];
pub const PROTOCOLS: &[&str] = &["HTTP"];
pub const PROTOCOL_VERSIONS: &[&str] = &["HTTP1", "HTTP2"];

impl WithValidate for TargetState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_range(
            diags,
            attr_path.clone().attribute("port"),
            &self.port,
            1,
            65535,
        );
        check_range(diags, attr_path.attribute("weight"), &self.weight, 0, 256);
    }
}

impl WithValidate for TargetGroupState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_one_of(
            diags,
            attr_path.clone().attribute("algorithm"),
            &self.algorithm,
            ALGORITHMS,
        );
        check_one_of(
            diags,
            attr_path.clone().attribute("protocol"),
            &self.protocol,
            PROTOCOLS,
        );
        check_one_of(
            diags,
            attr_path.clone().attribute("protocol_version"),
            &self.protocol_version,
            PROTOCOL_VERSIONS,
        );
        for (i, target) in self.targets.iter().flatten().enumerate() {
            target.validate(diags, attr_path.clone().attribute("targets").index(i as i64));
        }
        self.timeouts
            .validate(diags, attr_path.attribute("timeouts").index(0));
    }
}

impl WithValidate for TargetGroupDataState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if self.partial_match.is_value() && self.name.is_null() {
            diags.warning(
                "partial_match is ignored",
                "partial_match only applies to lookups by name",
                attr_path.attribute("partial_match"),
            );
        }
    }
}
