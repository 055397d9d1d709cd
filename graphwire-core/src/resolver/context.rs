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

use std::fmt::Write as _;

use serde_json::Value;

use crate::config::Config;
use crate::error::Error;
use crate::object::{Freeze, Link, Obj};
use crate::resolver::patch::{Patch, PatchQueue};
use crate::resolver::ref_resolver::{IdentityRegistry, RefReader};
use crate::types::{RefId, Resolved};
use crate::validation::FieldError;

/// State for one top-level serialize call.
///
/// Owns the identity registry for the duration of the call; a composite that
/// is reached a second time is emitted as a reference to the id it got the
/// first time.
pub struct SerializeContext {
    refs: IdentityRegistry<usize>,
    max_depth: u32,
    current_depth: u32,
}

impl SerializeContext {
    pub fn new(max_depth: u32) -> SerializeContext {
        SerializeContext {
            refs: IdentityRegistry::new(),
            max_depth,
            current_depth: 0,
        }
    }

    /// The id already assigned to `value`, if it has been emitted.
    pub fn get_id<T>(&self, value: &Obj<T>) -> Option<RefId> {
        self.refs.id_for(&value.addr())
    }

    /// Assigns `value` an id, or returns the one it already has.
    pub fn register<T>(&mut self, value: &Obj<T>) -> RefId {
        let id = self.refs.register(value.addr());
        tracing::trace!(id, ty = std::any::type_name::<T>(), "registered instance");
        id
    }

    /// Number of distinct composites emitted so far.
    pub fn registered(&self) -> usize {
        self.refs.len()
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "Maximum nesting depth ({}) exceeded while serializing.",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

/// Lifecycle of a deserialize call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nodes are being visited; patches may be queued.
    Walking,
    /// Queued patches are being resolved in FIFO order.
    PatchApplication,
    /// Every tracked instance has been made immutable.
    Frozen,
    Done,
}

#[derive(Debug, Clone)]
enum PathSegment {
    Field(String),
    Index(usize),
}

/// State for one top-level deserialize call.
///
/// Owns the id → instance table, the patch queue and the freeze set. None of
/// them outlive the call, so concurrent calls never observe each other.
pub struct DeserializeContext<'cfg> {
    config: &'cfg Config,
    refs: RefReader,
    patches: PatchQueue,
    freeze_set: Vec<Box<dyn Freeze>>,
    path: Vec<PathSegment>,
    phase: Phase,
    current_depth: u32,
}

impl<'cfg> DeserializeContext<'cfg> {
    pub fn new(config: &'cfg Config) -> DeserializeContext<'cfg> {
        DeserializeContext {
            config,
            refs: RefReader::new(),
            patches: PatchQueue::new(),
            freeze_set: Vec::new(),
            path: Vec::new(),
            phase: Phase::Walking,
            current_depth: 0,
        }
    }

    pub fn config(&self) -> &'cfg Config {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn refs(&self) -> &RefReader {
        &self.refs
    }

    pub fn pending_patches(&self) -> usize {
        self.patches.len()
    }

    /// Resolves `id` to its instance, or reports it as not built yet.
    pub fn get_or_defer<T: 'static>(&self, id: RefId) -> Result<Resolved<Obj<T>>, Error> {
        match self.refs.get::<T>(id) {
            Some(found) => found.map(Resolved::Ready),
            None => Ok(Resolved::Pending(id)),
        }
    }

    /// Binds wire id `id` to `instance`. Call before populating its fields.
    pub fn register<T: 'static>(
        &mut self,
        id: RefId,
        type_tag: &str,
        instance: &Obj<T>,
    ) -> Result<(), Error> {
        self.refs.store(id, type_tag, instance)?;
        tracing::trace!(id, type_tag, "registered instance");
        Ok(())
    }

    pub fn track_for_freeze<T: 'static>(&mut self, instance: &Obj<T>) {
        self.freeze_set.push(Box::new(instance.clone()));
    }

    /// Fills `slot` now, or queues a patch that fills it once the target id
    /// has been built.
    pub fn assign_or_defer<T: 'static>(
        &mut self,
        slot: &Link<T>,
        value: Resolved<Obj<T>>,
    ) -> Result<(), Error> {
        match value {
            Resolved::Ready(target) => slot.fill(target),
            Resolved::Pending(id) => {
                let path = self.path();
                tracing::trace!(path = %path, id, "deferring forward reference");
                let slot = slot.clone();
                self.patches.push(Patch::new(path, id, move |refs| {
                    match refs.get::<T>(id) {
                        Some(target) => slot.fill(target?),
                        None => Err(Error::invalid_ref(format!("__ref {id} is unresolved"))),
                    }
                }));
                Ok(())
            }
        }
    }

    /// Resolves every queued patch. Runs once, after the walk.
    pub fn apply_patches(&mut self) -> Result<usize, Error> {
        self.phase = Phase::PatchApplication;
        let applied = self.patches.apply(&self.refs)?;
        tracing::debug!(
            applied,
            instances = self.refs.len(),
            "applied deferred references"
        );
        Ok(applied)
    }

    /// Freezes every instance built during this call.
    ///
    /// Must run after [`apply_patches`](Self::apply_patches); freezing first
    /// would leave deferred slots unfilled.
    pub fn freeze_all(&mut self) -> usize {
        debug_assert!(self.patches.is_empty(), "freeze_all before apply_patches");
        for instance in &self.freeze_set {
            instance.freeze();
        }
        self.phase = Phase::Frozen;
        tracing::debug!(frozen = self.freeze_set.len(), "froze instances");
        self.freeze_set.len()
    }

    pub fn finish(&mut self) {
        self.phase = Phase::Done;
        self.freeze_set.clear();
        self.refs.reset();
    }

    pub fn enter_field(&mut self, name: &str) {
        self.path.push(PathSegment::Field(name.to_string()));
    }

    pub fn enter_index(&mut self, index: usize) {
        self.path.push(PathSegment::Index(index));
    }

    pub fn exit(&mut self) {
        self.path.pop();
    }

    /// Dotted path of the node currently being read, e.g. `items[2].product`.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    /// Path of `field` inside the node currently being read.
    pub fn path_to(&self, field: &str) -> String {
        let base = self.path();
        if base.is_empty() {
            field.to_string()
        } else {
            format!("{base}.{field}")
        }
    }

    /// Runs the configured field validators against one present field.
    pub fn run_validators(&self, type_tag: &str, field: &str, node: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for validator in self.config.validators() {
            for message in validator.validate(type_tag, field, node) {
                errors.push(FieldError::new(self.path_to(field), message));
            }
        }
        errors
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.config.max_depth() {
            return Err(Error::depth_exceed(format!(
                "Maximum nesting depth ({}) exceeded at `{}`. Current depth: {}.",
                self.config.max_depth(),
                self.path(),
                self.current_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
