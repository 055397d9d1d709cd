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

use std::fmt;
use std::sync::Arc;

use crate::types::DEFAULT_MAX_DEPTH;
use crate::validation::FieldValidator;

/// Configuration for graph serialization.
///
/// Shared read-only by the [`Graphwire`](crate::Graphwire) engine and every
/// per-call context it creates. Nothing in here is mutated during a call.
#[derive(Clone)]
pub struct Config {
    /// Maximum nesting depth of composites and sequences, on both sides.
    pub max_depth: u32,
    /// Field validators run for every present field while walking.
    pub validators: Vec<Arc<dyn FieldValidator>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            validators: Vec::new(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn validators(&self) -> &[Arc<dyn FieldValidator>] {
        &self.validators
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("max_depth", &self.max_depth)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Per-call deserialization switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// Freeze every constructed instance once all patches are applied.
    pub freeze: bool,
}

impl DeserializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn freeze(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }
}
