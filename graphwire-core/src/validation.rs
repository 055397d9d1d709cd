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

//! Field-level validation records and the pluggable per-field hook.

use std::fmt;

use serde_json::Value;

use crate::error::Error;

/// One structural violation, tied to the path of the offending field.
///
/// Paths use dots for fields and brackets for sequence slots, for example
/// `items[2].product.name`. Root-level errors carry an empty path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Accumulates field errors across a walk instead of stopping at the first.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Folds the outcome of a nested read into this accumulator.
    ///
    /// Validation failures are merged and `None` is returned so the caller can
    /// keep walking; any other error is fatal and propagates.
    pub fn absorb<T>(&mut self, result: Result<T, Error>) -> Result<Option<T>, Error> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::Validation(errors)) => {
                self.errors.extend(errors);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// `Ok(())` when nothing was recorded, else the aggregated error.
    pub fn into_result(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self.errors))
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

/// Per-field validation strategy invoked while the document is walked.
///
/// Rule content (length limits, formats, ...) lives entirely in the
/// implementation; the protocol only merges the returned messages into the
/// aggregate error list under the field's path.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, type_tag: &str, field: &str, node: &Value) -> Vec<String>;
}

impl<F> FieldValidator for F
where
    F: Fn(&str, &str, &Value) -> Vec<String> + Send + Sync,
{
    fn validate(&self, type_tag: &str, field: &str, node: &Value) -> Vec<String> {
        self(type_tag, field, node)
    }
}
