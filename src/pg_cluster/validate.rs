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

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::{check_one_of, check_range, WithValidate};

use super::state::{ClusterDataState, ClusterState};

pub const STORAGE_TYPES: &[&str] = &["HDD", "SSD", "SSD Premium", "SSD Standard"];
pub const SYNCHRONIZATION_MODES: &[&str] =
    &["ASYNCHRONOUS", "SYNCHRONOUS", "STRICTLY_SYNCHRONOUS"];

impl WithValidate for ClusterState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(name) = &self.display_name {
            if name.is_empty() {
                diags.error_short(
                    "display_name must not be empty",
                    attr_path.clone().attribute("display_name"),
                );
            }
        }
        check_range(
            diags,
            attr_path.clone().attribute("instances"),
            &self.instances,
            1,
            5,
        );
        check_range(
            diags,
            attr_path.clone().attribute("cores"),
            &self.cores,
            1,
            i64::MAX,
        );
        check_range(
            diags,
            attr_path.clone().attribute("storage_size"),
            &self.storage_size,
            1,
            i64::MAX,
        );
        if let Value::Value(ram) = self.ram {
            if ram < 1024 || ram % 1024 != 0 {
                diags.error(
                    "Invalid ram",
                    format!("ram must be a positive multiple of 1024 MB, got {ram}"),
                    attr_path.clone().attribute("ram"),
                );
            }
        }
        check_one_of(
            diags,
            attr_path.clone().attribute("storage_type"),
            &self.storage_type,
            STORAGE_TYPES,
        );
        check_one_of(
            diags,
            attr_path.clone().attribute("synchronization_mode"),
            &self.synchronization_mode,
            SYNCHRONIZATION_MODES,
        );
        self.timeouts
            .validate(diags, attr_path.attribute("timeouts").index(0));
    }
}

impl WithValidate for ClusterDataState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if self.partial_match.is_value() && self.display_name.is_null() {
            diags.warning(
                "partial_match is ignored",
                "partial_match only applies to lookups by display_name",
                attr_path.attribute("partial_match"),
            );
        }
    }
}
