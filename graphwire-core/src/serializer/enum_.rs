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

//! Tagged unions of composites, and string-valued enums.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::Error;
use crate::object::Obj;
use crate::resolver::context::DeserializeContext;
use crate::serializer::util::{expected, invalid};
use crate::serializer::{Serializer, StructSerializer};
use crate::types::{WireNode, TYPE_KEY};

/// Dispatches a union node to the variant whose type tag matches `__type`.
///
/// ```ignore
/// let shape = UnionReader::new(node, context, "Shape")?
///     .variant::<Circle>(Shape::Circle)?
///     .variant::<Square>(Shape::Square)?
///     .finish()?;
/// ```
///
/// A `{"__ref": n}` node dispatches on the tag of the instance registered
/// under `n`. Forward references cannot be dispatched and are rejected.
pub struct UnionReader<'a, 'cfg, U> {
    node: &'a Value,
    context: &'a mut DeserializeContext<'cfg>,
    union: &'static str,
    tag: String,
    tried: Vec<Cow<'static, str>>,
    value: Option<U>,
}

impl<'a, 'cfg, U> UnionReader<'a, 'cfg, U> {
    pub fn new(
        node: &'a Value,
        context: &'a mut DeserializeContext<'cfg>,
        union: &'static str,
    ) -> Result<Self, Error> {
        let wire = WireNode::classify(node).map_err(|msg| invalid(context, msg))?;
        let tag = match wire {
            WireNode::Composite { tag: Some(tag), .. } => tag.to_string(),
            WireNode::Composite { tag: None, .. } => {
                return Err(Error::field(
                    context.path_to(TYPE_KEY),
                    format!("is required to select a `{union}` variant"),
                ));
            }
            WireNode::Reference(id) => match context.refs().type_tag(id) {
                Some(tag) => tag.to_string(),
                None => {
                    return Err(Error::invalid_ref(format!(
                        "{}: __ref {id} is a forward reference to a `{union}`, whose variant is unknown",
                        context.path()
                    )));
                }
            },
            WireNode::Scalar(_) | WireNode::Sequence(_) => {
                return Err(expected(context, &format!("`{union}` object"), node));
            }
        };
        Ok(UnionReader {
            node,
            context,
            union,
            tag,
            tried: Vec::new(),
            value: None,
        })
    }

    /// Offers variant `V`; decodes the node as `V` if its tag matches.
    pub fn variant<V, W>(mut self, wrap: W) -> Result<Self, Error>
    where
        V: StructSerializer,
        W: FnOnce(Obj<V>) -> U,
    {
        let tag = V::type_tag();
        if self.value.is_none() && self.tag == tag {
            let obj = Obj::<V>::read(self.node, self.context)?;
            self.value = Some(wrap(obj));
        }
        self.tried.push(tag);
        Ok(self)
    }

    /// The decoded variant, or [`Error::UnknownTag`] if none matched.
    pub fn finish(self) -> Result<U, Error> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(Error::unknown_tag(self.union, &self.tag, &self.tried)),
        }
    }
}

/// Decodes a string enum from its allowed `(wire name, value)` pairs.
pub fn read_string_enum<E: Copy>(
    node: &Value,
    context: &DeserializeContext,
    variants: &[(&str, E)],
) -> Result<E, Error> {
    let Some(name) = node.as_str() else {
        return Err(expected(context, "string", node));
    };
    match variants.iter().find(|(wire, _)| *wire == name) {
        Some((_, value)) => Ok(*value),
        None => {
            let allowed: Vec<String> = variants.iter().map(|(wire, _)| format!("`{wire}`")).collect();
            Err(invalid(
                context,
                format!("expected one of {}, got `{name}`", allowed.join(", ")),
            ))
        }
    }
}

pub fn write_string_enum(name: &str) -> Value {
    Value::String(name.to_string())
}
