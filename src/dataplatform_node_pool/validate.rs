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

use super::state::{NodePoolDataState, NodePoolState};

pub const AVAILABILITY_ZONES: &[&str] = &["AUTO", "ZONE_1", "ZONE_2"];
pub const STORAGE_TYPES: &[&str] = &["HDD", "SSD"];

impl WithValidate for NodePoolState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_range(
            diags,
            attr_path.clone().attribute("node_count"),
            &self.node_count,
            1,
            i64::MAX,
        );
        check_range(
            diags,
            attr_path.clone().attribute("cores_count"),
            &self.cores_count,
            1,
            i64::MAX,
        );
        if let Value::Value(ram) = self.ram_size {
            if ram < 2048 || ram % 1024 != 0 {
                diags.error(
                    "Invalid ram_size",
                    format!("ram_size must be a multiple of 1024 MB, at least 2048, got {ram}"),
                    attr_path.clone().attribute("ram_size"),
                );
            }
        }
        check_one_of(
            diags,
            attr_path.clone().attribute("availability_zone"),
            &self.availability_zone,
            AVAILABILITY_ZONES,
        );
        check_one_of(
            diags,
            attr_path.clone().attribute("storage_type"),
            &self.storage_type,
            STORAGE_TYPES,
        );
        self.timeouts
            .validate(diags, attr_path.attribute("timeouts").index(0));
    }
}

impl WithValidate for NodePoolDataState {
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
