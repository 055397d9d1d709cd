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

//! Deferred assignments for references whose target was not built yet.

use std::collections::VecDeque;
use std::fmt;

use crate::error::Error;
use crate::resolver::ref_resolver::RefReader;
use crate::types::RefId;

type Apply = Box<dyn FnOnce(&RefReader) -> Result<(), Error>>;

/// "Once `id` resolves, assign it into the slot at `path`."
pub struct Patch {
    path: String,
    id: RefId,
    apply: Apply,
}

impl Patch {
    pub fn new(
        path: impl Into<String>,
        id: RefId,
        apply: impl FnOnce(&RefReader) -> Result<(), Error> + 'static,
    ) -> Self {
        Patch {
            path: path.into(),
            id,
            apply: Box::new(apply),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> RefId {
        self.id
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("path", &self.path)
            .field("id", &self.id)
            .finish()
    }
}

/// FIFO queue of patches recorded during one walk.
#[derive(Debug, Default)]
pub struct PatchQueue {
    patches: VecDeque<Patch>,
}

impl PatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, patch: Patch) {
        self.patches.push_back(patch);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Applies every queued patch in the order it was recorded, draining the
    /// queue. Returns how many were applied.
    ///
    /// A patch whose id is still unbound means the document referenced an
    /// object it never defined.
    pub fn apply(&mut self, refs: &RefReader) -> Result<usize, Error> {
        let mut applied = 0;
        while let Some(patch) = self.patches.pop_front() {
            if !refs.contains(patch.id) {
                let location = if patch.path.is_empty() {
                    "<root>"
                } else {
                    patch.path.as_str()
                };
                return Err(Error::invalid_ref(format!(
                    "{location}: __ref {} does not match any __id in the document",
                    patch.id
                )));
            }
            tracing::trace!(path = %patch.path, id = patch.id, "applying patch");
            (patch.apply)(refs)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn clear(&mut self) {
        self.patches.clear();
    }
}
