//! Error types returned by the failure-signaling accessors.
//!
//! Two mismatches can occur when recovering a concrete type from a
//! container, and each gets its own error so callers can tell them apart:
//!
//! - [`TypeMismatch`]: a typed request named a type other than the one that
//!   is actually held. Returned by [`AnyValue::get`] and the by-type variant
//!   accessors.
//! - [`WrongAlternative`]: a positional request named an alternative other
//!   than the live one. Returned by the `alt_*` variant accessors.
//!
//! Both are plain value types implementing [`core::error::Error`], so they
//! compose with `?` and any error-reporting stack.
//!
//! [`AnyValue::get`]: crate::AnyValue::get

use core::fmt;

/// A typed accessor requested a type that does not match the held value's
/// dynamic type.
///
/// Matching is by exact [`TypeId`] equality; this error also covers a typed
/// request against an empty [`AnyValue`], in which case
/// [`actual`](TypeMismatch::actual) reports the empty sentinel `"<empty>"`.
///
/// [`TypeId`]: core::any::TypeId
/// [`AnyValue`]: crate::AnyValue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Type name the caller asked for.
    requested: &'static str,
    /// Type name of what is actually held.
    actual: &'static str,
}

impl TypeMismatch {
    /// Creates a new [`TypeMismatch`] from the requested and actual type
    /// names.
    pub(crate) fn new(requested: &'static str, actual: &'static str) -> Self {
        Self { requested, actual }
    }

    /// The [`core::any::type_name`] of the requested type.
    #[must_use]
    pub fn requested(&self) -> &'static str {
        self.requested
    }

    /// The [`core::any::type_name`] of the held value, or `"<empty>"` if the
    /// container held nothing.
    #[must_use]
    pub fn actual(&self) -> &'static str {
        self.actual
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch: requested `{}`, but the container holds `{}`",
            self.requested, self.actual
        )
    }
}

impl core::error::Error for TypeMismatch {}

/// A positional accessor requested an alternative other than the live one.
///
/// A variant always holds a value, so this error is never conflated with
/// emptiness: the live index is always a valid position in the alternative
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongAlternative {
    /// Position the caller asked for.
    requested: usize,
    /// Position of the live alternative.
    actual: usize,
}

impl WrongAlternative {
    /// Creates a new [`WrongAlternative`] from the requested and live
    /// positions.
    pub(crate) fn new(requested: usize, actual: usize) -> Self {
        Self { requested, actual }
    }

    /// The position the caller asked for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// The position of the live alternative.
    #[must_use]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl fmt::Display for WrongAlternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrong alternative: requested alternative {}, but alternative {} is live",
            self.requested, self.actual
        )
    }
}

impl core::error::Error for WrongAlternative {}
