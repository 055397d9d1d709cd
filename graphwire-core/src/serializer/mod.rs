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

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::Error;
use crate::object::Obj;
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::validation::FieldError;

mod boolean;
mod datetime;
pub mod enum_;
mod json;
mod list;
mod number;
mod option;
mod string;
pub mod struct_;
pub mod util;

pub use enum_::{read_string_enum, write_string_enum, UnionReader};
pub use struct_::{FieldReader, FieldWriter};

/// Conversion between a Rust value and one wire node.
///
/// Implementations for composites go through [`Obj<T>`] and
/// [`Link<T>`](crate::object::Link), which carry the identity and cycle
/// handling; everything else is a plain tree conversion.
pub trait Serializer: Sized + 'static {
    /// Emits the wire node for `self`.
    fn write(&self, context: &mut SerializeContext) -> Result<Value, Error>;

    /// Builds a value from `node`.
    ///
    /// Structural problems are reported as [`Error::Validation`] so callers
    /// higher up can merge them with their siblings' errors.
    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error>;
}

/// Declares one field of a composite and whether it must be present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub required: bool,
}

impl FieldDef {
    pub const fn required(name: &'static str) -> Self {
        FieldDef {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        FieldDef {
            name,
            required: false,
        }
    }
}

/// Per-type codec for a composite (record-like) type.
///
/// This is the surface generated code targets: a type tag, a field list, and
/// per-field read/write calls. Identity, cycles and deferral are handled by
/// the contexts, never here.
pub trait StructSerializer: Sized + 'static {
    /// Fields the wire node may carry, in emission order.
    const FIELDS: &'static [FieldDef];

    /// The `__type` tag, with generic parameters suffixed
    /// (see [`generic_tag`](crate::types::generic_tag)).
    fn type_tag() -> Cow<'static, str>;

    /// The unpopulated instance allocated before fields are read. Fields
    /// holding forward references stay in this state until patched.
    fn placeholder() -> Self;

    fn write_fields(&self, fields: &mut FieldWriter<'_>) -> Result<(), Error>;

    fn read_fields(this: &Obj<Self>, fields: &mut FieldReader<'_, '_, Self>) -> Result<(), Error>;

    /// Type-level checks over the raw node, run together with the
    /// required-field check. Field names are relative to this node.
    #[allow(unused_variables)]
    fn validate(fields: &Map<String, Value>) -> Vec<FieldError> {
        Vec::new()
    }
}
