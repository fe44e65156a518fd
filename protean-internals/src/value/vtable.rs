//! Vtable for type-erased value operations.
//!
//! This module contains the [`ValueVtable`] which enables destroying,
//! copying, and identifying a held value when its concrete type `V` has been
//! erased. The vtable stores function pointers that dispatch to the correct
//! typed implementations.
//!
//! This module encapsulates the fields of [`ValueVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter must match the actual value type
//! stored in the [`ValueData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ValueVtable::new`], which pairs the function pointers
//! with a specific type `V` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    util::Erased,
    value::{
        data::ValueData,
        raw::{RawValue, RawValueRef},
    },
};

/// Vtable for type-erased value operations.
///
/// Contains function pointers for performing operations on a held value
/// without knowing its concrete type at compile time. This is the complete
/// capability set of a holder: report the dynamic type of the value, destroy
/// it, and produce an independent copy of it.
///
/// # Safety Invariant
///
/// The fields `drop` and `clone` are guaranteed to point to the functions
/// defined below instantiated with the value type `V` that was used to
/// create this [`ValueVtable`].
pub(crate) struct ValueVtable {
    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ValueVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`ValueVtable`].
    type_name: fn() -> &'static str,
    /// Drops the [`Box<ValueData<V>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<ValueData<Erased>>),
    /// Allocates an independent copy of the pointed-to [`ValueData<V>`].
    clone: unsafe fn(RawValueRef<'_>) -> RawValue,
}

impl ValueVtable {
    /// Creates a new [`ValueVtable`] for the value type `V`.
    ///
    /// The `V: Clone` bound is what makes the `clone` entry possible; it is
    /// captured here, at construction, so that the rest of the crate can
    /// copy holders without any bound on the erased type.
    pub(super) const fn new<V: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<V>,
                type_name: core::any::type_name::<V>,
                drop: drop::<V>,
                clone: clone::<V>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ValueVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`ValueVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the `Box<ValueData<V>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<ValueData<V>>`] via [`Box::into_raw`].
    /// 2. This [`ValueVtable`] must be a vtable for the value type stored in
    ///    the [`ValueData`].
    /// 3. This method drops the [`Box<ValueData<V>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<ValueData<Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<V>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Allocates an independent copy of the pointed-to [`ValueData<V>`] by
    /// calling the [`Clone`] implementation of the value type used when
    /// creating this [`ValueVtable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the value type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn clone(&self, ptr: RawValueRef<'_>) -> RawValue {
        // SAFETY: We know that `self.clone` points to the function
        // `clone::<V>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone)(ptr) }
    }
}

/// Drops the [`Box<ValueData<V>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<ValueData<V>>`] via [`Box::into_raw`].
/// 2. The value type `V` matches the actual value type stored in the
///    [`ValueData`].
/// 3. This method drops the [`Box<ValueData<V>>`], so the caller must ensure
///    that the pointer has not previously been dropped, that it is able to
///    transfer ownership of the pointer, and that it will not use the
///    pointer after calling this method.
unsafe fn drop<V: 'static>(ptr: NonNull<ValueData<Erased>>) {
    let ptr: NonNull<ValueData<V>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller,
    // and it came from a call to `Box::into_raw` as also guaranteed by our
    // caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Allocates an independent copy of the pointed-to [`ValueData<V>`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the
///    [`ValueData`].
unsafe fn clone<V: Clone + 'static>(ptr: RawValueRef<'_>) -> RawValue {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.downcast_unchecked::<V>() };
    RawValue::new(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_vtable_is_shared_per_type() {
        let vtable1 = ValueVtable::new::<i32>();
        let vtable2 = ValueVtable::new::<i32>();

        // Both should be the exact same static instance
        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_value_vtable_type_id() {
        let vtable = ValueVtable::new::<i32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert_ne!(vtable.type_id(), TypeId::of::<u32>());
    }

    #[test]
    fn test_value_vtable_type_name() {
        let vtable = ValueVtable::new::<i32>();
        assert_eq!(vtable.type_name(), "i32");
    }
}
