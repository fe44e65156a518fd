#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`protean`].
//!
//! # Overview
//!
//! This crate contains the low-level storage types and unsafe operations that
//! power the [`protean`] value containers. It provides the foundation for
//! type erasure through vtable-based dispatch, and for tagged-union storage
//! through unions paired with a discriminant.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`protean`] crate, not
//! this one.
//!
//! # Architecture
//!
//! The crate is organized around two storage strategies:
//!
//! - **[`value`]**: Type-erased single-value storage for the open-ended
//!   container
//!   - [`RawValue`]: Owned holder with [`Box`]-based allocation
//!   - [`RawValueRef`]/[`RawValueMut`]: Borrowed references (shared/mutable)
//!   - [`ValueData`]: `#[repr(C)]` wrapper enabling field access on erased
//!     types
//!   - [`ValueVtable`]: Function pointers for type-erased dispatch
//!
//! - **[`variant`]**: Tagged-union storage for the closed-alternative
//!   containers
//!   - [`RawVariant2`] … [`RawVariant5`]: A `union` over the alternative
//!     types paired with a discriminant
//!   - [`Tag2`] … [`Tag5`]: Fieldless discriminant enums with exactly one
//!     variant per alternative
//!
//! # Safety Strategy
//!
//! Both storage strategies store a value whose concrete type is not visible
//! in the storage's own type (erased entirely for [`RawValue`], narrowed to a
//! closed set for the raw variants), so each pairs the bytes with a
//! discriminant that must never fall out of sync with them: the vtable
//! pointer for [`RawValue`], the tag for the raw variants.
//!
//! This crate maintains that pairing through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single
//!   file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Exhaustive dispatch**: Every operation that interprets raw variant
//!   storage matches on the tag with one arm per alternative and no fallback
//!   arm, so an unhandled alternative is a compile error rather than silent
//!   misbehavior
//! - **Documented contracts**: Each unsafe method specifies exactly when it
//!   can be safely called
//!
//! [`protean`]: https://docs.rs/protean/latest/protean/
//! [`ValueData`]: value::data::ValueData
//! [`ValueVtable`]: value::vtable::ValueVtable
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod util;
mod value;
mod variant;

pub use value::{RawValue, RawValueMut, RawValueRef};
pub use variant::{
    RawVariant2, RawVariant3, RawVariant4, RawVariant5, Tag2, Tag3, Tag4, Tag5,
};
