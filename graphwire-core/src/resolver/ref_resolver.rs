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

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Error;
use crate::object::Obj;
use crate::types::{RefId, FIRST_REF_ID};

/// Bidirectional identity bookkeeping for one serialize call.
///
/// IdentityRegistry maps an identity key (on the serialize side, the address
/// of a live [`Obj`]) to a small integer id handed out in first-seen order,
/// starting at [`FIRST_REF_ID`]. Registering a known key is a no-op that
/// returns the id it already has.
///
/// # Examples
///
/// ```rust
/// use graphwire_core::resolver::ref_resolver::IdentityRegistry;
///
/// let mut registry = IdentityRegistry::new();
/// assert_eq!(registry.id_for(&0xdead), None);
/// let id = registry.register(0xdead);
/// assert_eq!(registry.register(0xdead), id);
/// assert_eq!(registry.id_for(&0xdead), Some(id));
/// assert_eq!(registry.register(0xbeef), id + 1);
/// ```
#[derive(Debug)]
pub struct IdentityRegistry<K> {
    ids: HashMap<K, RefId>,
    keys: Vec<K>,
    next_id: RefId,
}

impl<K> Default for IdentityRegistry<K> {
    fn default() -> Self {
        IdentityRegistry {
            ids: HashMap::new(),
            keys: Vec::new(),
            next_id: FIRST_REF_ID,
        }
    }
}

impl<K: Hash + Eq + Clone> IdentityRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup.
    pub fn id_for(&self, key: &K) -> Option<RefId> {
        self.ids.get(key).copied()
    }

    /// Reverse lookup: the key that was assigned `id`.
    pub fn key_for(&self, id: RefId) -> Option<&K> {
        let index = id.checked_sub(FIRST_REF_ID)?;
        self.keys.get(index as usize)
    }

    /// Returns the id of `key`, assigning the next sequential id on first sight.
    pub fn register(&mut self, key: K) -> RefId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget every mapping and restart numbering at [`FIRST_REF_ID`].
    pub fn reset(&mut self) {
        self.ids.clear();
        self.keys.clear();
        self.next_id = FIRST_REF_ID;
    }
}

struct Entry {
    type_tag: String,
    instance: Box<dyn Any>,
}

/// Deserialize-side table from wire `__id` to the live instance built for it.
///
/// Instances are stored as soon as they are allocated, before their fields
/// are populated, so references back into an instance under construction
/// resolve to the real handle.
///
/// # Examples
///
/// ```rust
/// use graphwire_core::object::Obj;
/// use graphwire_core::resolver::ref_resolver::RefReader;
///
/// let mut refs = RefReader::new();
/// let obj = Obj::new(String::from("test"));
/// refs.store(4, "Text", &obj).unwrap();
///
/// let found = refs.get::<String>(4).unwrap().unwrap();
/// assert!(Obj::ptr_eq(&obj, &found));
/// assert!(refs.get::<String>(5).is_none());
/// assert!(refs.get::<i32>(4).unwrap().is_err());
/// ```
#[derive(Default)]
pub struct RefReader {
    refs: HashMap<RefId, Entry>,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `id` to `instance`. Each id may be bound once per document.
    pub fn store<T: 'static>(
        &mut self,
        id: RefId,
        type_tag: impl Into<String>,
        instance: &Obj<T>,
    ) -> Result<(), Error> {
        if let Some(existing) = self.refs.get(&id) {
            return Err(Error::invalid_ref(format!(
                "__id {id} is defined twice (already bound to `{}`)",
                existing.type_tag
            )));
        }
        self.refs.insert(
            id,
            Entry {
                type_tag: type_tag.into(),
                instance: Box::new(instance.clone()),
            },
        );
        Ok(())
    }

    /// Looks up `id` as an `Obj<T>`.
    ///
    /// * `None` if nothing is bound to `id` yet.
    /// * `Some(Err(_))` if the bound instance is not an `Obj<T>`.
    pub fn get<T: 'static>(&self, id: RefId) -> Option<Result<Obj<T>, Error>> {
        let entry = self.refs.get(&id)?;
        Some(
            entry
                .instance
                .downcast_ref::<Obj<T>>()
                .cloned()
                .ok_or_else(|| {
                    Error::invalid_ref(format!(
                        "__ref {id} points to `{}`, expected `{}`",
                        entry.type_tag,
                        type_name::<T>()
                    ))
                }),
        )
    }

    /// The `__type` tag recorded for `id`.
    pub fn type_tag(&self, id: RefId) -> Option<&str> {
        self.refs.get(&id).map(|entry| entry.type_tag.as_str())
    }

    pub fn contains(&self, id: RefId) -> bool {
        self.refs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn reset(&mut self) {
        self.refs.clear();
    }
}
