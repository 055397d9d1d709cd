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
use crate::serializer::Serializer;

/// Untyped passthrough: the node is kept as-is in both directions.
impl Serializer for Value {
    fn write(&self, _: &mut SerializeContext) -> Result<Value, Error> {
        Ok(self.clone())
    }

    fn read(node: &Value, _: &mut DeserializeContext) -> Result<Self, Error> {
        Ok(node.clone())
    }
}
