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

//! # Graphwire
//!
//! Cycle-safe, identity-preserving serialization of object graphs to JSON.
//!
//! A value is written as a tree in which every composite carries a `__type`
//! tag and an `__id`; a composite reached again (shared, or part of a cycle)
//! is written as `{"__ref": id}` instead of being expanded a second time.
//! Reading rebuilds the graph with the same sharing and cycles, filling
//! references to not-yet-built instances in a patch pass, and can freeze the
//! result.
//!
//! Composite types implement [`StructSerializer`] and are held through
//! [`Obj<T>`] handles. Fields that may point forward in the document, or back
//! at an ancestor, are [`Link<T>`] slots.
//!
//! ```rust
//! use std::borrow::Cow;
//! use graphwire::{
//!     DeserializeOptions, Error, FieldDef, FieldReader, FieldWriter, Link, Obj,
//!     StructSerializer,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Node {
//!     label: String,
//!     next: Link<Node>,
//! }
//!
//! impl StructSerializer for Node {
//!     const FIELDS: &'static [FieldDef] =
//!         &[FieldDef::required("label"), FieldDef::optional("next")];
//!
//!     fn type_tag() -> Cow<'static, str> {
//!         Cow::Borrowed("Node")
//!     }
//!
//!     fn placeholder() -> Self {
//!         Node { label: String::new(), next: Link::unset() }
//!     }
//!
//!     fn write_fields(&self, fields: &mut FieldWriter<'_>) -> Result<(), Error> {
//!         fields.write("label", &self.label)?;
//!         fields.write("next", &self.next)
//!     }
//!
//!     fn read_fields(_: &Obj<Self>, fields: &mut FieldReader<'_, '_, Self>) -> Result<(), Error> {
//!         fields.read("label", |node: &mut Node, v| node.label = v)?;
//!         fields.read("next", |node: &mut Node, v| node.next = v)
//!     }
//! }
//!
//! let node = Obj::new(Node { label: "loop".into(), next: Link::unset() });
//! node.borrow_mut().unwrap().next = Link::new(&node);
//!
//! let json = graphwire::to_stringified_json(&node).unwrap();
//! assert_eq!(json, r#"{"__type":"Node","__id":1,"label":"loop","next":{"__ref":1}}"#);
//!
//! let opts = DeserializeOptions::new().freeze(true);
//! let back: Obj<Node> = graphwire::from_stringified_json(&json, Some(opts)).unwrap();
//! assert!(back.borrow().next.points_to(&back));
//! assert!(back.is_frozen());
//! # node.borrow_mut().unwrap().next = Link::unset();
//! ```

use serde_json::Value;

pub use graphwire_core::{
    config::{Config, DeserializeOptions},
    error::Error,
    graphwire::Graphwire,
    object::{Freeze, Link, Obj},
    resolver::context::{DeserializeContext, Phase, SerializeContext},
    resolver::ref_resolver::{IdentityRegistry, RefReader},
    serializer::{
        read_string_enum, write_string_enum, FieldDef, FieldReader, FieldWriter, Serializer,
        StructSerializer, UnionReader,
    },
    types::{generic_tag, RefId, Resolved, FIRST_REF_ID, ID_KEY, REF_KEY, TYPE_KEY},
    validation::{FieldError, FieldErrors, FieldValidator},
};
pub use graphwire_core::{bail, ensure};

/// Serializes `value` to compact JSON with the default engine.
pub fn to_stringified_json<T: Serializer>(value: &T) -> Result<String, Error> {
    Graphwire::default().to_stringified_json(value)
}

/// Parses `json` and rebuilds the graph with the default engine.
///
/// `options` defaults to [`DeserializeOptions::default`] (no freezing).
pub fn from_stringified_json<T: Serializer>(
    json: &str,
    options: Option<DeserializeOptions>,
) -> Result<T, Error> {
    Graphwire::default().from_stringified_json_with(json, options.unwrap_or_default())
}

/// Serializes `value` to its wire tree with the default engine.
pub fn to_object<T: Serializer>(value: &T) -> Result<Value, Error> {
    Graphwire::default().to_value(value)
}

/// Rebuilds a graph from an already-parsed wire tree.
pub fn from_object<T: Serializer>(
    node: &Value,
    options: Option<DeserializeOptions>,
) -> Result<T, Error> {
    Graphwire::default().from_value_with(node, options.unwrap_or_default())
}
