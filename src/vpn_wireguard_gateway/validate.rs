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

use crate::sdk::vpn::LOCATIONS;
use crate::utils::{check_one_of, check_range, WithValidate};

use super::state::{ConnectionState, GatewayDataState, GatewayState};

impl WithValidate for ConnectionState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if self.ipv4_cidr.is_null() && self.ipv6_cidr.is_null() {
            diags.error_short(
                "Either ipv4_cidr or ipv6_cidr must be set",
                attr_path.attribute("ipv4_cidr"),
            );
        }
    }
}

impl WithValidate for GatewayState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_one_of(
            diags,
            attr_path.clone().attribute("location"),
            &self.location,
            LOCATIONS,
        );
        check_range(
            diags,
            attr_path.clone().attribute("listen_port"),
            &self.listen_port,
            1,
            65535,
        );
        if self.interface_ipv4_cidr.is_null() && self.interface_ipv6_cidr.is_null() {
            diags.error_short(
                "Either interface_ipv4_cidr or interface_ipv6_cidr must be set",
                attr_path.clone().attribute("interface_ipv4_cidr"),
            );
        }
        for (i, connection) in self.connection.iter().flatten().enumerate() {
            connection.validate(
                diags,
                attr_path.clone().attribute("connection").index(i as i64),
            );
        }
        self.timeouts
            .validate(diags, attr_path.attribute("timeouts").index(0));
    }
}

impl WithValidate for GatewayDataState {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_one_of(
            diags,
            attr_path.clone().attribute("location"),
            &self.location,
            LOCATIONS,
        );
        if self.partial_match.is_value() && self.name.is_null() {
            diags.warning(
                "partial_match is ignored",
                "partial_match only applies to lookups by name",
                attr_path.attribute("partial_match"),
            );
        }
    }
}
