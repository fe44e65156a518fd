//! Type-erased storage for a single owned value.

pub(crate) mod data;
pub(crate) mod raw;
pub(crate) mod vtable;

pub use raw::{RawValue, RawValueMut, RawValueRef};
