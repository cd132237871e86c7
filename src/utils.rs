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

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock,
};
use tf_provider::value::Value;
use tf_provider::{map, AttributePath, Diagnostics};

pub trait WithSchema {
    fn schema() -> tf_provider::schema::Schema;
}

pub trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

impl<T: WithValidate> WithValidate for Value<T> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(inner) = self {
            inner.validate(diags, attr_path);
        }
    }
}

/// How computed attributes are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computed {
    /// Unset computed attributes become unknown (plan)
    Unknown,
    /// Unknown computed attributes become null (apply that could not read back)
    Null,
}

impl Computed {
    pub fn settle<T>(self, value: &mut Value<T>) {
        match self {
            Computed::Unknown if value.is_null() => *value = Value::Unknown,
            Computed::Null if value.is_unknown() => *value = Value::Null,
            _ => (),
        }
    }
}

/// An immutable attribute changed between the prior state and the planned one.
///
/// Unknown planned values and null prior values (write-only or freshly imported)
/// are not considered as changes.
pub fn changed<T: PartialEq>(prior: &Value<T>, planned: &Value<T>) -> bool {
    !prior.is_null() && !planned.is_unknown() && prior != planned
}

pub fn known<T: Clone>(value: &Value<T>) -> Option<T> {
    value.as_ref_option().cloned()
}

/// Known string, empty otherwise
pub fn text(value: &Value<String>) -> String {
    value.as_deref_option().unwrap_or_default().to_owned()
}

/// Known, non-empty string
pub fn non_empty(value: &Value<String>) -> Option<&str> {
    value.as_deref_option().filter(|s| !s.is_empty())
}

pub fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub fn required(attr_type: AttributeType, description: &str) -> Attribute {
    attribute(attr_type, AttributeConstraint::Required, description)
}

pub fn optional(attr_type: AttributeType, description: &str) -> Attribute {
    attribute(attr_type, AttributeConstraint::Optional, description)
}

pub fn optional_computed(attr_type: AttributeType, description: &str) -> Attribute {
    attribute(attr_type, AttributeConstraint::OptionalComputed, description)
}

pub fn computed(attr_type: AttributeType, description: &str) -> Attribute {
    attribute(attr_type, AttributeConstraint::Computed, description)
}

pub fn sensitive(attr: Attribute) -> Attribute {
    Attribute {
        sensitive: true,
        ..attr
    }
}

/// Turn the block of a resource into the read-only view used by data sources.
///
/// Every attribute becomes computed, and nested blocks become computed lists of objects.
pub fn computed_view(block: &Block) -> HashMap<String, Attribute> {
    fn all_computed(attributes: &HashMap<String, Attribute>) -> HashMap<String, Attribute> {
        attributes
            .iter()
            .map(|(name, attr)| {
                (
                    name.clone(),
                    Attribute {
                        constraint: AttributeConstraint::Computed,
                        sensitive: false,
                        ..attr.clone()
                    },
                )
            })
            .collect()
    }

    let mut attributes = all_computed(&block.attributes);
    for (name, nested) in &block.blocks {
        let inner = match nested {
            NestedBlock::Single(inner)
            | NestedBlock::List(inner)
            | NestedBlock::Set(inner)
            | NestedBlock::Map(inner)
            | NestedBlock::Group(inner)
            | NestedBlock::Optional(inner) => inner,
        };
        attributes.insert(
            name.clone(),
            Attribute {
                attr_type: AttributeType::AttributeList(all_computed(&inner.attributes)),
                description: inner.description.clone(),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        );
    }
    attributes
}

pub fn check_one_of(
    diags: &mut Diagnostics,
    attr_path: AttributePath,
    value: &Value<String>,
    allowed: &[&str],
) {
    if let Value::Value(value) = value {
        if !allowed.contains(&value.as_str()) {
            diags.error(
                "Invalid value",
                format!(
                    "expected one of [{}], got `{value}`",
                    allowed.iter().join_with(", ")
                ),
                attr_path,
            );
        }
    }
}

pub fn check_range(
    diags: &mut Diagnostics,
    attr_path: AttributePath,
    value: &Value<i64>,
    min: i64,
    max: i64,
) {
    if let Value::Value(value) = value {
        if *value < min || *value > max {
            diags.error(
                "Value out of range",
                format!("expected a value in [{min}, {max}], got {value}"),
                attr_path,
            );
        }
    }
}

/// Parse a duration written the way Terraform `timeouts` are: `90s`, `20m`, `1h30m`
pub fn parse_duration(text: &str) -> Result<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return Err(anyhow!("empty duration"));
    }

    let mut total = 0u64;
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(anyhow!("invalid unit `{c}` in duration `{text}`")),
        };
        if digits.is_empty() {
            return Err(anyhow!("missing value before `{c}` in duration `{text}`"));
        }
        total += digits.parse::<u64>()? * unit;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(anyhow!("missing unit at the end of duration `{text}`"));
    }
    Ok(Duration::from_secs(total))
}

/// Operation of a resource that can be bounded by a timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    pub create: Value<String>,
    pub read: Value<String>,
    pub update: Value<String>,
    pub delete: Value<String>,
}

impl Timeouts {
    pub fn block() -> Block {
        let attr = |op: &str| {
            optional(
                AttributeType::String,
                &format!("Timeout of the {op} operation (eg: `20m`, `1h30m`)"),
            )
        };
        Block {
            description: Description::plain("Operation timeouts"),
            attributes: map! {
                "create" => attr("create"),
                "read" => attr("read"),
                "update" => attr("update"),
                "delete" => attr("delete"),
            },
            ..Default::default()
        }
    }

    fn value(&self, op: Operation) -> &Value<String> {
        match op {
            Operation::Create => &self.create,
            Operation::Read => &self.read,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }

    /// Timeout for `op`, falling back to `default` when unset or invalid
    pub fn get(timeouts: &Value<Timeouts>, op: Operation, default: Duration) -> Duration {
        timeouts
            .as_ref_option()
            .and_then(|t| t.value(op).as_deref_option())
            .and_then(|text| parse_duration(text).ok())
            .unwrap_or(default)
    }
}

impl WithValidate for Timeouts {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (name, op) in [
            ("create", Operation::Create),
            ("read", Operation::Read),
            ("update", Operation::Update),
            ("delete", Operation::Delete),
        ] {
            if let Value::Value(text) = self.value(op) {
                if let Err(err) = parse_duration(text) {
                    diags.error(
                        "Invalid timeout",
                        err.to_string(),
                        attr_path.clone().attribute(name),
                    );
                }
            }
        }
    }
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_go_style_durations() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("20m").unwrap(), Duration::from_secs(1200));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn timeouts_fall_back_to_default() {
        let default = Duration::from_secs(60);
        assert_eq!(Timeouts::get(&Value::Null, Operation::Create, default), default);

        let timeouts = Value::Value(Timeouts {
            create: Value::Value("2h".into()),
            update: Value::Value("bogus".into()),
            ..Default::default()
        });
        assert_eq!(
            Timeouts::get(&timeouts, Operation::Create, default),
            Duration::from_secs(7200)
        );
        assert_eq!(Timeouts::get(&timeouts, Operation::Update, default), default);
        assert_eq!(Timeouts::get(&timeouts, Operation::Delete, default), default);
    }

    #[test]
    fn invalid_timeouts_are_reported() {
        let mut diags = Diagnostics::default();
        Timeouts {
            delete: Value::Value("soon".into()),
            ..Default::default()
        }
        .validate(&mut diags, AttributePath::new("timeouts"));
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn immutable_change_detection() {
        let a: Value<String> = Value::Value("a".into());
        let b: Value<String> = Value::Value("b".into());
        assert!(changed(&a, &b));
        assert!(!changed(&a, &a));
        assert!(!changed(&Value::Null, &b));
        assert!(!changed(&a, &Value::Unknown));
        assert!(changed(&a, &Value::Null));
    }

    #[test]
    fn computed_settling() {
        let mut value: Value<i64> = Value::Null;
        Computed::Unknown.settle(&mut value);
        assert!(value.is_unknown());
        Computed::Null.settle(&mut value);
        assert!(value.is_null());

        let mut known = Value::Value(3);
        Computed::Unknown.settle(&mut known);
        Computed::Null.settle(&mut known);
        assert_eq!(known, Value::Value(3));
    }

    #[test]
    fn join_ids() {
        let ids = ["a", "b", "c"];
        assert_eq!(ids.iter().join_with(", ").to_string(), "a, b, c");
    }

    #[test]
    fn enum_and_range_checks() {
        let mut diags = Diagnostics::default();
        check_one_of(
            &mut diags,
            AttributePath::new("algorithm"),
            &Value::Value("ROUND_ROBIN".into()),
            &["ROUND_ROBIN", "RANDOM"],
        );
        check_range(&mut diags, AttributePath::new("instances"), &Value::Value(3), 1, 5);
        check_range(&mut diags, AttributePath::new("instances"), &Value::Unknown, 1, 5);
        assert!(diags.errors.is_empty());

        check_one_of(
            &mut diags,
            AttributePath::new("algorithm"),
            &Value::Value("FASTEST".into()),
            &["ROUND_ROBIN", "RANDOM"],
        );
        check_range(&mut diags, AttributePath::new("instances"), &Value::Value(9), 1, 5);
        assert_eq!(diags.errors.len(), 2);
    }
}
