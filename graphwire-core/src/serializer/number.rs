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

use serde_json::{Number, Value};

use crate::error::Error;
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::serializer::util::{expected, invalid};
use crate::serializer::Serializer;

macro_rules! impl_signed_serializer {
    ($($ty:ty),*) => {$(
        impl Serializer for $ty {
            #[inline(always)]
            fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
                Ok(Value::from(*self))
            }

            #[inline(always)]
            fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
                let wide = node
                    .as_i64()
                    .ok_or_else(|| expected(context, concat!("integer (", stringify!($ty), ")"), node))?;
                <$ty>::try_from(wide).map_err(|_| {
                    invalid(
                        context,
                        format!("{} is out of range for {}", wide, stringify!($ty)),
                    )
                })
            }
        }
    )*};
}

macro_rules! impl_unsigned_serializer {
    ($($ty:ty),*) => {$(
        impl Serializer for $ty {
            #[inline(always)]
            fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
                Ok(Value::from(*self))
            }

            #[inline(always)]
            fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
                let wide = node.as_u64().ok_or_else(|| {
                    expected(context, concat!("non-negative integer (", stringify!($ty), ")"), node)
                })?;
                <$ty>::try_from(wide).map_err(|_| {
                    invalid(
                        context,
                        format!("{} is out of range for {}", wide, stringify!($ty)),
                    )
                })
            }
        }
    )*};
}

impl_signed_serializer!(i8, i16, i32, i64);
impl_unsigned_serializer!(u8, u16, u32, u64);

/// JSON has no form for NaN or the infinities, so writing one is an error
/// rather than a silent `null`.
impl Serializer for f64 {
    #[inline(always)]
    fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
        match Number::from_f64(*self) {
            Some(number) => Ok(Value::Number(number)),
            None => Err(Error::other(format!("{self} has no JSON representation"))),
        }
    }

    #[inline(always)]
    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        node.as_f64().ok_or_else(|| expected(context, "number", node))
    }
}

impl Serializer for f32 {
    #[inline(always)]
    fn write(&self, context: &mut SerializeContext) -> Result<Value, Error> {
        f64::from(*self).write(context)
    }

    #[inline(always)]
    fn read(node: &Value, context: &mut DeserializeContext) -> Result<Self, Error> {
        let wide = f64::read(node, context)?;
        if wide.abs() > f64::from(f32::MAX) {
            return Err(invalid(context, format!("{wide} is out of range for f32")));
        }
        Ok(wide as f32)
    }
}
