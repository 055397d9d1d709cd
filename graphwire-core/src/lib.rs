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

//! # Graphwire Core
//!
//! Core implementation of the graphwire object-graph protocol: a JSON
//! encoding of arbitrary graphs of composite values that preserves object
//! identity, survives cycles, and rebuilds the same shape on the way back.
//!
//! ## Architecture
//!
//! - **`graphwire`**: the engine and public entry points
//! - **`object`**: live graph handles ([`Obj`], [`Link`]) and freezing
//! - **`resolver`**: identity registry, per-call contexts and the patch queue
//! - **`serializer`**: per-type codec traits and built-in codecs
//! - **`validation`**: field error records and pluggable field validators
//! - **`types`**: wire keys, reference ids and wire-node classification
//! - **`config`**: engine configuration and per-call options
//! - **`error`**: error handling
//!
//! ## Wire format
//!
//! ```text
//! Composite := { "__type": string, "__id": integer, <field>: WireValue, ... }
//! Reference := { "__ref": integer }
//! Scalar    := string | number | boolean | null
//! Sequence  := [ WireValue, ... ]
//! ```
//!
//! The first time an instance is reached it is emitted in full with a fresh
//! `__id`; every later occurrence in the same call becomes a `{"__ref": id}`
//! node. Reading reverses this in two passes: the walk builds instances and
//! queues a patch for every reference to an instance not built yet, then the
//! patch pass fills those slots. Freezing, when requested, runs last.
//!
//! ## Usage
//!
//! Composite types implement [`StructSerializer`]; they are handled through
//! [`Obj<T>`] (owned position) and [`Link<T>`] (a slot that may be filled
//! late).
//!
//! ```rust
//! use graphwire_core::{Graphwire, Obj};
//!
//! let graphwire = Graphwire::default();
//! let tags = vec![Some("a".to_string()), None];
//! let json = graphwire.to_stringified_json(&tags).unwrap();
//! assert_eq!(json, r#"["a",null]"#);
//! # let _ = Obj::new(0u8);
//! ```

pub mod config;
pub mod error;
pub mod graphwire;
pub mod object;
pub mod resolver;
pub mod serializer;
pub mod types;
pub mod validation;

pub use crate::config::{Config, DeserializeOptions};
pub use crate::error::Error;
pub use crate::graphwire::Graphwire;
pub use crate::object::{Freeze, Link, Obj};
pub use crate::resolver::context::{DeserializeContext, Phase, SerializeContext};
pub use crate::resolver::ref_resolver::{IdentityRegistry, RefReader};
pub use crate::serializer::{
    read_string_enum, write_string_enum, FieldDef, FieldReader, FieldWriter, Serializer,
    StructSerializer, UnionReader,
};
pub use crate::types::{generic_tag, RefId, Resolved};
pub use crate::validation::{FieldError, FieldErrors, FieldValidator};
