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

pub mod container_registry;
pub mod data_source;
pub mod dataplatform_node_pool;
pub mod ionos_provider;
pub mod pg_cluster;
pub mod poller;
pub mod resolver;
pub mod resource;
pub mod sdk;
pub mod target_group;
pub mod utils;
pub mod vpn_wireguard_gateway;

pub use ionos_provider::IonosProvider;
