#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]

//! Type-erased value containers and fixed-alternative tagged unions.
//!
//! ## Overview
//!
//! This crate provides two value containers built on the same machinery — a
//! discriminant identifying what is stored, uniform storage holding it, and a
//! recovery operation that fails loudly on mismatch:
//!
//! - [`AnyValue`] stores a single value of **any** `Clone` type behind a
//!   uniform handle, remembers its dynamic type, and supports safe
//!   extraction back to the concrete type. The set of storable types is
//!   open-ended; the discriminant is the value's [`TypeId`], resolved at
//!   runtime.
//! - [`Variant2`] through [`Variant5`] store exactly one value out of a
//!   **fixed, closed** set of alternative types declared at compile time, in
//!   inline storage shared by all alternatives. The discriminant is an index
//!   into the alternative list.
//!
//! ## Quick Example
//!
//! ```
//! use protean::{AnyValue, Variant3};
//!
//! // Open-ended: any Clone type goes in, the exact type comes back out.
//! let value = AnyValue::new(42i32);
//! assert_eq!(value.downcast_ref::<i32>(), Some(&42));
//! assert_eq!(value.downcast_ref::<u32>(), None);
//!
//! // Closed set: one of three declared alternatives is always live.
//! let variant = Variant3::<i32, f64, char>::try_new('z').unwrap();
//! assert_eq!(variant.index(), 2);
//! assert_eq!(variant.get::<char>(), Ok(&'z'));
//! assert!(variant.get::<i32>().is_err());
//! ```
//!
//! ## Exact type matching
//!
//! Extraction from either container matches by **exact dynamic type
//! identity** ([`TypeId`] equality), never by convertibility or subtyping. A
//! request for `u32` against a held `i32` fails, as does a request for a
//! trait object or supertype.
//!
//! ## Choosing an accessor
//!
//! Extraction failure surfaces in two forms, selected at the call site:
//!
//! - The *null-returning* accessors ([`AnyValue::downcast_ref`],
//!   [`AnyValue::downcast_mut`]) return an [`Option`] and never report
//!   details. Use these when absence is an ordinary outcome.
//! - The *failure-signaling* accessors ([`AnyValue::get`],
//!   [`Variant3::get`], the positional `alt_*` methods, and friends) return
//!   a [`Result`] carrying a diagnostic error from [`error`]. Use these when
//!   a mismatch indicates a bug worth propagating with `?`.
//!
//! The variants offer only the failure-signaling form: a variant always
//! holds a value, so a mismatch can never be conflated with emptiness.
//!
//! Consuming accessors ([`AnyValue::downcast`], [`Variant3::into_inner`])
//! return the intact container in `Err`, so a failed extraction never loses
//! the value.
//!
//! ## Thread safety
//!
//! These are single-threaded value types. [`AnyValue`] is `!Send + !Sync`:
//! stored types are not required to be `Send`, and the container does no
//! internal synchronization. Sharing one across threads requires wrapping it
//! in external synchronization that also guarantees the stored types are
//! sendable. The variants simply inherit `Send`/`Sync` from their
//! alternative types.
//!
//! For implementation details, see the [`protean-internals`] crate.
//!
//! [`protean-internals`]: protean_internals
//! [`TypeId`]: core::any::TypeId

extern crate alloc;

pub mod error;

mod any_value;
mod variant;

pub use any_value::AnyValue;
pub use variant::{Variant2, Variant3, Variant4, Variant5};
