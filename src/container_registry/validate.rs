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

use crate::utils::{check_one_of, WithValidate};

use super::state::{RegistryDataState, RegistryState, ScheduleState};

pub const WEEKDAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Registry names are DNS labels: 3 to 63 lowercase letters, digits and hyphens,
/// starting with a letter and not ending with a hyphen
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    (3..=63).contains(&bytes.len())
        && bytes[0].is_ascii_lowercase()
        && bytes[bytes.len() - 1] != b'-'
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

impl WithValidate for ScheduleState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (i, day) in self.days.iter().flatten().enumerate() {
            check_one_of(
                diags,
                attr_path.clone().attribute("days").index(i as i64),
                day,
                WEEKDAYS,
            );
        }
    }
}

impl WithValidate for RegistryState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(name) = &self.name {
            if !is_valid_name(name) {
                diags.error(
                    "Invalid registry name",
                    format!("`{name}` must be 3 to 63 lowercase letters, digits or hyphens, starting with a letter"),
                    attr_path.clone().attribute("name"),
                );
            }
        }
        self.garbage_collection_schedule.validate(
            diags,
            attr_path
                .clone()
                .attribute("garbage_collection_schedule")
                .index(0),
        );
        self.timeouts
            .validate(diags, attr_path.attribute("timeouts").index(0));
    }
}

impl WithValidate for RegistryDataState {
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
