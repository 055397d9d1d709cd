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

//! Error model shared by both directions of the protocol.
//!
//! Three families of failure exist:
//!
//! - **Structural** errors (missing required field, wrong node kind, bad scalar)
//!   are collected as [`FieldError`] records and reported together through
//!   [`Error::Validation`], so one call lists every violation it found.
//! - **Identity** errors ([`Error::ForwardRoot`], [`Error::InvalidRef`]) and
//!   unknown union tags ([`Error::UnknownTag`]) abort the walk immediately.
//! - **Parse** errors ([`Error::Parse`]) only come out of the outermost text
//!   entry point, before the protocol starts.
//!
//! Nested codecs return `Result<_, Error>`; the outermost entry point hands the
//! same `Result` to the caller, so nothing panics across the public API.

use std::borrow::Cow;
use std::fmt::Write as _;

use thiserror::Error;

use crate::types::RefId;
use crate::validation::FieldError;

/// Compile-time switch: build with `GRAPHWIRE_PANIC_ON_ERROR=1` to panic at the
/// exact place an error is constructed.
pub const PANIC_ON_ERROR: bool = option_env!("GRAPHWIRE_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for graph serialization and deserialization.
///
/// Construct errors through the static constructor functions
/// ([`Error::validation`], [`Error::unknown_tag`], ...) rather than the enum
/// variants, so `GRAPHWIRE_PANIC_ON_ERROR` is honored everywhere.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// One or more structural violations, each tied to a field path.
    #[error("{}", display_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A `__type` tag matched none of the variants of a tagged union.
    #[error("{0}")]
    UnknownTag(Cow<'static, str>),

    /// The document root was a bare `{"__ref": id}` node.
    #[error("root cannot be a forward reference (__ref {0})")]
    ForwardRoot(RefId),

    /// A reference id that could not be resolved, was registered twice, or
    /// points at an instance of the wrong type.
    #[error("{0}")]
    InvalidRef(Cow<'static, str>),

    /// The input text was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The graph nests deeper than the configured limit.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Mutation was attempted on a frozen instance.
    #[error("{0}")]
    Frozen(Cow<'static, str>),

    /// A live instance was already mutably borrowed while being serialized.
    #[error("{0}")]
    BorrowConflict(Cow<'static, str>),

    /// Escape hatch for hand-written codecs.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_field_errors(errors: &[FieldError]) -> String {
    let mut out = String::from("validation failed");
    for (i, err) in errors.iter().enumerate() {
        out.push_str(if i == 0 { ": " } else { "; " });
        let _ = write!(out, "{err}");
    }
    out
}

impl Error {
    /// Creates a new [`Error::Validation`] from a list of field errors.
    ///
    /// # Example
    /// ```
    /// use graphwire_core::error::Error;
    /// use graphwire_core::validation::FieldError;
    ///
    /// let err = Error::validation(vec![FieldError::new("name", "is required")]);
    /// assert_eq!(err.to_string(), "validation failed: name: is required");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let err = Error::Validation(errors);
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Shorthand for a validation error holding a single field error.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Error::validation(vec![FieldError::new(field, message)])
    }

    /// Creates a new [`Error::UnknownTag`] naming the received tag and the
    /// allowed set.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_tag(union: &str, received: &str, allowed: &[Cow<'static, str>]) -> Self {
        let err = Error::UnknownTag(
            format!(
                "unknown {union} variant `{received}`, expected one of: {}",
                allowed.join(", ")
            )
            .into(),
        );
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::ForwardRoot`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn forward_root(id: RefId) -> Self {
        let err = Error::ForwardRoot(id);
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidRef`].
    ///
    /// # Example
    /// ```
    /// use graphwire_core::error::Error;
    ///
    /// let err = Error::invalid_ref(format!("__ref {} was never defined", 7));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_ref<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidRef(s.into());
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Parse`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn parse(source: serde_json::Error) -> Self {
        let err = Error::Parse(source);
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Frozen`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn frozen<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Frozen(s.into());
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BorrowConflict`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn borrow_conflict<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::BorrowConflict(s.into());
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Other`] from a message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn other<S: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static>(s: S) -> Self {
        let err = Error::Other(anyhow::Error::msg(s));
        if PANIC_ON_ERROR {
            panic!("GRAPHWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Returns `true` for errors that are collected rather than aborting.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// The `{field, message}` view of this error.
    ///
    /// Validation errors yield their full list; every other error is a single
    /// root-level record with an empty field path.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Error::Validation(errors) => errors.clone(),
            other => vec![FieldError::new("", other.to_string())],
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use graphwire_core::ensure;
/// use graphwire_core::error::Error;
///
/// fn check_value(n: i32) -> Result<(), Error> {
///     ensure!(n > 0, "value must be positive");
///     ensure!(n < 10, "value {} too large", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::other($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::other(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
///
/// # Examples
/// ```
/// use graphwire_core::bail;
/// use graphwire_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::other($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::other(format!($fmt, $($arg)*)))
    };
}
