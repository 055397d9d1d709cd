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

//! Composite emission and construction.
//!
//! Every composite goes through [`write_struct`] / [`read_struct`]:
//!
//! - On write, a handle whose identity was already emitted becomes
//!   `{"__ref": id}`; otherwise it gets a fresh id and is emitted in full as
//!   `{"__type", "__id", ...fields}`.
//! - On read, required fields are checked first (all missing fields reported
//!   at once), then the placeholder instance is allocated and registered under
//!   its `__id` *before* any field is read, so fields pointing back at it
//!   resolve to the real handle.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::object::{Link, Obj};
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::serializer::util::{expected, invalid};
use crate::serializer::{Serializer, StructSerializer};
use crate::types::{RefId, Resolved, WireNode, ID_KEY, REF_KEY, TYPE_KEY};
use crate::validation::FieldErrors;

/// Sink for the fields of one composite node.
pub struct FieldWriter<'a> {
    map: &'a mut Map<String, Value>,
    context: &'a mut SerializeContext,
}

impl<'a> FieldWriter<'a> {
    pub fn write<F: Serializer>(&mut self, name: &str, value: &F) -> Result<(), Error> {
        let node = value.write(self.context)?;
        self.map.insert(name.to_string(), node);
        Ok(())
    }

    /// Inserts an already-built node.
    pub fn write_value(&mut self, name: &str, node: Value) {
        self.map.insert(name.to_string(), node);
    }

    pub fn context(&mut self) -> &mut SerializeContext {
        self.context
    }
}

/// Source for the fields of one composite node being constructed.
///
/// Each [`read`](Self::read) decodes one field and assigns it into the
/// instance. Structural errors are collected and reported by
/// [`finish`](Self::finish), so one pass reports every bad field.
pub struct FieldReader<'a, 'cfg, T> {
    this: &'a Obj<T>,
    type_tag: &'a str,
    fields: &'a Map<String, Value>,
    context: &'a mut DeserializeContext<'cfg>,
    errors: FieldErrors,
}

impl<'a, 'cfg, T: 'static> FieldReader<'a, 'cfg, T> {
    /// Reads field `name` (if present) and hands it to `assign`.
    ///
    /// An absent field leaves the placeholder value untouched; required-field
    /// presence has already been checked.
    pub fn read<F, A>(&mut self, name: &str, assign: A) -> Result<(), Error>
    where
        F: Serializer,
        A: FnOnce(&mut T, F),
    {
        let Some(node) = self.fields.get(name) else {
            return Ok(());
        };
        let checks = self.context.run_validators(self.type_tag, name, node);
        self.errors.extend(checks);

        self.context.enter_field(name);
        let result = F::read(node, self.context);
        self.context.exit();

        if let Some(value) = self.errors.absorb(result)? {
            let mut instance = self.this.borrow_mut()?;
            assign(&mut instance, value);
        }
        Ok(())
    }

    /// Raw node of field `name`.
    pub fn node(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    /// Records a custom error against field `name`.
    pub fn error(&mut self, name: &str, message: impl Into<String>) {
        let path = self.context.path_to(name);
        self.errors.push(path, message);
    }

    pub fn context(&mut self) -> &mut DeserializeContext<'cfg> {
        self.context
    }

    pub fn finish(self) -> Result<(), Error> {
        self.errors.into_result()
    }
}

/// Emits `obj` in full on first sight, as a reference afterwards.
pub fn write_struct<T: StructSerializer>(
    obj: &Obj<T>,
    context: &mut SerializeContext,
) -> Result<Value, Error> {
    if let Some(id) = context.get_id(obj) {
        let mut node = Map::with_capacity(1);
        node.insert(REF_KEY.to_string(), Value::from(id));
        return Ok(Value::Object(node));
    }
    context.inc_depth()?;
    let result = emit_composite(obj, context);
    context.dec_depth();
    result
}

fn emit_composite<T: StructSerializer>(
    obj: &Obj<T>,
    context: &mut SerializeContext,
) -> Result<Value, Error> {
    let id = context.register(obj);
    let mut map = Map::with_capacity(T::FIELDS.len() + 2);
    map.insert(TYPE_KEY.to_string(), Value::String(T::type_tag().into_owned()));
    map.insert(ID_KEY.to_string(), Value::from(id));
    let instance = obj.try_borrow()?;
    let mut fields = FieldWriter {
        map: &mut map,
        context,
    };
    instance.write_fields(&mut fields)?;
    Ok(Value::Object(map))
}

/// Resolves or constructs the composite described by `node`.
pub fn read_struct<T: StructSerializer>(
    node: &Value,
    context: &mut DeserializeContext,
) -> Result<Obj<T>, Error> {
    let wire = WireNode::classify(node).map_err(|msg| invalid(context, msg))?;
    match wire {
        WireNode::Reference(id) => match context.get_or_defer::<T>(id)? {
            Resolved::Ready(obj) => Ok(obj),
            Resolved::Pending(id) => Err(Error::invalid_ref(format!(
                "{}: __ref {id} is a forward reference, which only a Link<{}> field can hold",
                context.path(),
                T::type_tag()
            ))),
        },
        WireNode::Composite { tag, id, fields } => {
            context.inc_depth()?;
            let result = construct::<T>(tag, id, fields, context);
            context.dec_depth();
            result
        }
        WireNode::Scalar(_) | WireNode::Sequence(_) => {
            Err(expected(context, &format!("`{}` object", T::type_tag()), node))
        }
    }
}

fn construct<T: StructSerializer>(
    tag: Option<&str>,
    id: Option<RefId>,
    fields: &Map<String, Value>,
    context: &mut DeserializeContext,
) -> Result<Obj<T>, Error> {
    let type_tag = T::type_tag();
    let mut errors = FieldErrors::new();
    if let Some(tag) = tag {
        if tag != type_tag {
            errors.push(
                context.path_to(TYPE_KEY),
                format!("expected `{type_tag}`, got `{tag}`"),
            );
        }
    }
    for def in T::FIELDS {
        if def.required && !fields.contains_key(def.name) {
            errors.push(context.path_to(def.name), "is required");
        }
    }
    for err in T::validate(fields) {
        errors.push(context.path_to(&err.field), err.message);
    }

    // Bound even when invalid, so later references to it still resolve and
    // the field errors are what gets reported.
    let obj = Obj::new(T::placeholder());
    if let Some(id) = id {
        context.register(id, &type_tag, &obj)?;
    }
    context.track_for_freeze(&obj);
    errors.into_result()?;

    let mut reader = FieldReader {
        this: &obj,
        type_tag: &type_tag,
        fields,
        context: &mut *context,
        errors: FieldErrors::new(),
    };
    T::read_fields(&obj, &mut reader)?;
    reader.finish()?;
    Ok(obj)
}

/// A field typed `Obj<T>` accepts full nodes and backward references only.
impl<T: StructSerializer> Serializer for Obj<T> {
    fn write(&self, context: &mut SerializeContext) -> Result<Value, Error> {
        write_struct(self, context)
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        read_struct(node, context)
    }
}

/// A `Link<T>` slot also accepts forward references: the slot is returned
/// unset and filled by the patch pass. Unset slots are `null` on the wire.
impl<T: StructSerializer> Serializer for Link<T> {
    fn write(&self, context: &mut SerializeContext) -> Result<Value, Error> {
        match self.as_obj() {
            Some(target) => write_struct(target, context),
            None => Ok(Value::Null),
        }
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        if node.is_null() {
            return Ok(Link::unset());
        }
        match WireNode::classify(node) {
            Ok(WireNode::Reference(id)) => {
                let link = Link::unset();
                let target = context.get_or_defer::<T>(id)?;
                context.assign_or_defer(&link, target)?;
                Ok(link)
            }
            _ => read_struct::<T>(node, context).map(Link::from),
        }
    }
}
