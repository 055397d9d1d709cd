// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Wire-format vocabulary: reserved keys, reference ids and node shapes.

use serde_json::{Map, Value};

/// Integer identity of a composite node within one document.
pub type RefId = u32;

/// Discriminator key carrying the type (or active union variant) name.
pub const TYPE_KEY: &str = "__type";
/// Key carrying the identity assigned when a composite is first emitted.
pub const ID_KEY: &str = "__id";
/// Sole key of a reference node.
pub const REF_KEY: &str = "__ref";

/// Ids are handed out sequentially starting here.
pub const FIRST_REF_ID: RefId = 1;

pub const DEFAULT_MAX_DEPTH: u32 = 512;

/// Outcome of resolving a reference during deserialization.
///
/// `Pending` carries the id of a target that has not been constructed yet; it
/// never escapes the top-level entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Ready(T),
    Pending(RefId),
}

impl<T> Resolved<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolved::Pending(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Resolved::Ready(value) => Some(value),
            Resolved::Pending(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolved<U> {
        match self {
            Resolved::Ready(value) => Resolved::Ready(f(value)),
            Resolved::Pending(id) => Resolved::Pending(id),
        }
    }
}

/// A classified view over one wire value.
#[derive(Debug, Clone, Copy)]
pub enum WireNode<'a> {
    Scalar(&'a Value),
    Sequence(&'a [Value]),
    Reference(RefId),
    Composite {
        tag: Option<&'a str>,
        id: Option<RefId>,
        fields: &'a Map<String, Value>,
    },
}

impl<'a> WireNode<'a> {
    /// Classifies `value`, rejecting malformed reserved keys.
    pub fn classify(value: &'a Value) -> Result<WireNode<'a>, String> {
        match value {
            Value::Array(items) => Ok(WireNode::Sequence(items)),
            Value::Object(map) => {
                if let Some(raw) = map.get(REF_KEY) {
                    if map.len() != 1 {
                        return Err(format!("a `{REF_KEY}` node must not carry other keys"));
                    }
                    return parse_ref_id(raw)
                        .map(WireNode::Reference)
                        .ok_or_else(|| format!("`{REF_KEY}` must be a non-negative integer"));
                }
                let tag = match map.get(TYPE_KEY) {
                    None => None,
                    Some(Value::String(tag)) => Some(tag.as_str()),
                    Some(_) => return Err(format!("`{TYPE_KEY}` must be a string")),
                };
                let id = match map.get(ID_KEY) {
                    None => None,
                    Some(raw) => Some(
                        parse_ref_id(raw)
                            .ok_or_else(|| format!("`{ID_KEY}` must be a non-negative integer"))?,
                    ),
                };
                Ok(WireNode::Composite {
                    tag,
                    id,
                    fields: map,
                })
            }
            scalar => Ok(WireNode::Scalar(scalar)),
        }
    }
}

fn parse_ref_id(raw: &Value) -> Option<RefId> {
    raw.as_u64().and_then(|id| RefId::try_from(id).ok())
}

/// Human-readable kind of a wire value, used in "expected X, got Y" messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(map) if map.contains_key(REF_KEY) => "reference",
        Value::Object(_) => "object",
    }
}

/// Builds a generic type tag such as `RecordLink<Product>`.
pub fn generic_tag(base: &str, params: &[&str]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    format!("{base}<{}>", params.join(", "))
}
