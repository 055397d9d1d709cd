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

use serde_json::Value;

use crate::error::Error;
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::serializer::util::expected;
use crate::serializer::Serializer;
use crate::validation::FieldErrors;

/// Sequences carry no identity of their own. Elements go through the same
/// context, so a `Vec<Link<T>>` element that is a forward reference is
/// deferred and patched like any other slot.
impl<T: Serializer> Serializer for Vec<T> {
    fn write(&self, context: &mut SerializeContext) -> Result<Value, Error> {
        context.inc_depth()?;
        let result = write_items(self, context);
        context.dec_depth();
        result
    }

    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        let Value::Array(items) = node else {
            return Err(expected(context, "array", node));
        };
        context.inc_depth()?;
        let result = read_items(items, context);
        context.dec_depth();
        result
    }
}

fn write_items<T: Serializer>(items: &[T], context: &mut SerializeContext) -> Result<Value, Error> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(item.write(context)?);
    }
    Ok(Value::Array(out))
}

/// Reads every element, collecting structural errors across all of them.
fn read_items<T: Serializer>(
    items: &[Value],
    context: &mut DeserializeContext,
) -> Result<Vec<T>, Error> {
    let mut errors = FieldErrors::new();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        context.enter_index(index);
        let result = T::read(item, context);
        context.exit();
        if let Some(value) = errors.absorb(result)? {
            out.push(value);
        }
    }
    errors.into_result()?;
    Ok(out)
}
