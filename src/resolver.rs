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

use std::future::Future;

use crate::sdk::ApiError;
use crate::utils::DisplayJoinable;

/// Remote object that can be looked up by name
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Lookup criteria of a data source
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookup<'a> {
    /// Name of the attribute holding the name (`name`, `display_name`)
    pub name_attr: &'static str,
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub partial_match: bool,
}

impl<'a> Lookup<'a> {
    pub fn matches(&self, name: &str, candidate: &str) -> bool {
        if self.partial_match {
            candidate.to_lowercase().contains(&name.to_lowercase())
        } else {
            candidate.to_lowercase() == name.to_lowercase()
        }
    }

    /// Check that exactly one of id and name is given
    pub fn check(&self, kind: &'static str) -> Result<(), LookupError> {
        match (self.id, self.name) {
            (Some(_), Some(_)) => Err(LookupError::Conflicting {
                name_attr: self.name_attr,
            }),
            (None, None) => Err(LookupError::Missing {
                kind,
                name_attr: self.name_attr,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("id and {name_attr} cannot be both specified at the same time")]
    Conflicting { name_attr: &'static str },
    #[error("please provide either the {kind} id or {name_attr}")]
    Missing {
        kind: &'static str,
        name_attr: &'static str,
    },
    #[error("an error occurred while fetching the {kind} with ID {id}: {source}")]
    Fetch {
        kind: &'static str,
        id: String,
        #[source]
        source: ApiError,
    },
    #[error("an error occurred while listing {kind} objects: {source}")]
    List {
        kind: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("no {kind} found with the specified {name_attr} = {name}")]
    NotFound {
        kind: &'static str,
        name_attr: &'static str,
        name: String,
    },
    #[error("more than one {kind} found with the specified {name_attr} = {name}, ids: {ids}")]
    Ambiguous {
        kind: &'static str,
        name_attr: &'static str,
        name: String,
        ids: String,
    },
}

/// Find exactly one remote object, either by id (`get`) or by name (`list` then filter).
pub async fn resolve<T, G, GF, L, LF>(
    kind: &'static str,
    lookup: &Lookup<'_>,
    get: G,
    list: L,
) -> Result<T, LookupError>
where
    T: Named,
    G: FnOnce(String) -> GF,
    GF: Future<Output = Result<T, ApiError>>,
    L: FnOnce() -> LF,
    LF: Future<Output = Result<Vec<T>, ApiError>>,
{
    lookup.check(kind)?;

    if let Some(id) = lookup.id {
        tracing::debug!("looking up {kind} by id {id}");
        return get(id.to_owned())
            .await
            .map_err(|source| LookupError::Fetch {
                kind,
                id: id.to_owned(),
                source,
            });
    }

    let name = lookup.name.unwrap_or_default();
    tracing::debug!(
        "looking up {kind} by {} = {name} (partial match: {})",
        lookup.name_attr,
        lookup.partial_match
    );
    let candidates = list()
        .await
        .map_err(|source| LookupError::List { kind, source })?;

    let mut found = candidates
        .into_iter()
        .filter(|candidate| lookup.matches(name, candidate.name()))
        .collect::<Vec<_>>();

    match found.len() {
        0 => Err(LookupError::NotFound {
            kind,
            name_attr: lookup.name_attr,
            name: name.to_owned(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(LookupError::Ambiguous {
            kind,
            name_attr: lookup.name_attr,
            name: name.to_owned(),
            ids: found.iter().map(Named::id).join_with(", ").to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Registry {
        id: String,
        name: String,
    }

    impl Named for Registry {
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn registry(id: &str, name: &str) -> Registry {
        Registry {
            id: id.into(),
            name: name.into(),
        }
    }

    fn remote() -> Vec<Registry> {
        vec![
            registry("r-1", "Prod-Registry"),
            registry("r-2", "staging-registry"),
            registry("r-3", "prod-mirror"),
        ]
    }

    fn lookup<'a>(id: Option<&'a str>, name: Option<&'a str>, partial_match: bool) -> Lookup<'a> {
        Lookup {
            name_attr: "name",
            id,
            name,
            partial_match,
        }
    }

    async fn run(lookup: &Lookup<'_>, calls: &AtomicUsize) -> Result<Registry, LookupError> {
        resolve(
            "container registry",
            lookup,
            |id| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    remote()
                        .into_iter()
                        .find(|r| r.id == id)
                        .ok_or(ApiError::NotFound {
                            url: format!("http://localhost/registries/{id}"),
                        })
                }
            },
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(remote()) }
            },
        )
        .await
    }

    #[tokio::test]
    async fn both_or_neither_is_rejected_without_calls() {
        let calls = AtomicUsize::new(0);

        let err = run(&lookup(Some("r-1"), Some("prod"), false), &calls)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Conflicting { .. }));

        let err = run(&lookup(None, None, false), &calls).await.unwrap_err();
        assert!(matches!(err, LookupError::Missing { .. }));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn by_id() {
        let calls = AtomicUsize::new(0);
        let found = run(&lookup(Some("r-2"), None, false), &calls).await.unwrap();
        assert_eq!(found.name, "staging-registry");

        let err = run(&lookup(Some("r-9"), None, false), &calls)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Fetch { .. }));
        assert!(err.to_string().contains("r-9"));
    }

    #[tokio::test]
    async fn exact_match_is_case_insensitive() {
        let calls = AtomicUsize::new(0);
        let found = run(&lookup(None, Some("prod-registry"), false), &calls)
            .await
            .unwrap();
        assert_eq!(found.id, "r-1");

        let err = run(&lookup(None, Some("prod"), false), &calls)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "no container registry found with the specified name = prod"
        );
    }

    #[tokio::test]
    async fn partial_match_is_case_insensitive_substring() {
        let calls = AtomicUsize::new(0);
        let found = run(&lookup(None, Some("STAGING"), true), &calls)
            .await
            .unwrap();
        assert_eq!(found.id, "r-2");

        let err = run(&lookup(None, Some("PROD"), true), &calls)
            .await
            .unwrap_err();
        let LookupError::Ambiguous { ids, .. } = &err else {
            panic!("expected an ambiguous match, got {err}");
        };
        assert_eq!(ids, "r-1, r-3");
        assert!(err.to_string().starts_with("more than one container registry found"));
    }

    #[tokio::test]
    async fn exact_duplicates_are_ambiguous() {
        let res = resolve(
            "target group",
            &lookup(None, Some("tg"), false),
            |id| async move { Err(ApiError::NotFound { url: id }) },
            || async { Ok(vec![registry("a", "tg"), registry("b", "TG")]) },
        )
        .await;
        assert!(matches!(res, Err(LookupError::Ambiguous { .. })));
    }
}
