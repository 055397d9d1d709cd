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

use std::sync::Arc;

use serde_json::Value;

use crate::config::{Config, DeserializeOptions};
use crate::error::Error;
use crate::resolver::context::{DeserializeContext, SerializeContext};
use crate::serializer::Serializer;
use crate::types::WireNode;
use crate::validation::FieldValidator;

/// Entry point for graph serialization.
///
/// `Graphwire` holds configuration only. Every call allocates its own
/// identity registry, patch queue and freeze set, so one instance can be
/// shared across threads behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use graphwire_core::Graphwire;
///
/// let graphwire = Graphwire::default()
///     .freeze(true)
///     .max_depth(64);
///
/// let json = graphwire.to_stringified_json(&vec![1u32, 2, 3]).unwrap();
/// assert_eq!(json, "[1,2,3]");
/// let back: Vec<u32> = graphwire.from_stringified_json(&json).unwrap();
/// assert_eq!(back, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graphwire {
    config: Config,
    options: DeserializeOptions,
}

impl Graphwire {
    /// Freeze every deserialized instance by default.
    ///
    /// Overridable per call with [`from_value_with`](Self::from_value_with).
    pub fn freeze(mut self, freeze: bool) -> Self {
        self.options.freeze = freeze;
        self
    }

    /// Sets the maximum nesting depth of composites and sequences.
    ///
    /// Cyclic and shared substructure is emitted once and referenced
    /// afterwards, so this bounds the depth of the tree of first visits, not
    /// the size of the graph. Exceeding it fails with
    /// [`Error::DepthExceed`].
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Adds a field validator, run for every present field while reading.
    pub fn validator<V: FieldValidator + 'static>(mut self, validator: V) -> Self {
        self.config.validators.push(Arc::new(validator));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_freeze(&self) -> bool {
        self.options.freeze
    }

    /// Serializes `value` into its wire tree.
    pub fn to_value<T: Serializer>(&self, value: &T) -> Result<Value, Error> {
        let mut context = SerializeContext::new(self.config.max_depth());
        let node = value.write(&mut context)?;
        tracing::debug!(
            instances = context.registered(),
            "serialized object graph"
        );
        Ok(node)
    }

    /// Serializes `value` into compact JSON text.
    pub fn to_stringified_json<T: Serializer>(&self, value: &T) -> Result<String, Error> {
        let node = self.to_value(value)?;
        serde_json::to_string(&node).map_err(Error::other)
    }

    pub fn from_value<T: Serializer>(&self, node: &Value) -> Result<T, Error> {
        self.from_value_with(node, self.options)
    }

    /// Rebuilds a graph from its wire tree.
    ///
    /// The walk constructs every instance and queues forward references;
    /// the patch pass then fills them, and only after that (when
    /// `options.freeze` is set) is every instance frozen. Callers get either
    /// a fully linked value or an error; never a partially linked one.
    pub fn from_value_with<T: Serializer>(
        &self,
        node: &Value,
        options: DeserializeOptions,
    ) -> Result<T, Error> {
        if let Ok(WireNode::Reference(id)) = WireNode::classify(node) {
            return Err(Error::forward_root(id));
        }
        let mut context = DeserializeContext::new(&self.config);
        let result = self.read_with_context(node, options, &mut context);
        context.finish();
        result
    }

    fn read_with_context<T: Serializer>(
        &self,
        node: &Value,
        options: DeserializeOptions,
        context: &mut DeserializeContext,
    ) -> Result<T, Error> {
        let value = T::read(node, context)?;
        context.apply_patches()?;
        if options.freeze {
            context.freeze_all();
        }
        Ok(value)
    }

    pub fn from_stringified_json<T: Serializer>(&self, json: &str) -> Result<T, Error> {
        self.from_stringified_json_with(json, self.options)
    }

    /// Parses `json` and rebuilds the graph it describes.
    ///
    /// Malformed text fails with [`Error::Parse`] before any instance is
    /// built.
    pub fn from_stringified_json_with<T: Serializer>(
        &self,
        json: &str,
        options: DeserializeOptions,
    ) -> Result<T, Error> {
        let node: Value = serde_json::from_str(json).map_err(|err| {
            tracing::debug!(error = %err, "rejected malformed JSON");
            Error::parse(err)
        })?;
        self.from_value_with(&node, options)
    }
}
