//! Type-erased value pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawValue`], [`RawValueRef`],
//! and [`RawValueMut`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer
//! always comes from `Box<ValueData<V>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawValue::new`] (which creates
//! it from `Box::into_raw`), and cannot be modified afterward (no `pub` or
//! `pub(crate)` fields), the pointer provenance remains valid throughout the
//! value's lifetime.
//!
//! The [`RawValue::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.
//!
//! # Type Erasure
//!
//! The concrete type parameter `V` is erased by casting to
//! `ValueData<Erased>`. The vtable stored within the `ValueData` provides the
//! runtime type information needed to safely destroy, copy, and downcast the
//! held value.

use alloc::boxed::Box;
use core::{any::TypeId, mem::ManuallyDrop, ptr::NonNull};

use crate::{util::Erased, value::data::ValueData};

/// A pointer to a [`ValueData`] that is guaranteed to point to an initialized
/// instance of a [`ValueData<V>`] for some specific `V`, though we do not
/// know which actual `V` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawValue::drop`] and [`RawValue::into_inner_unchecked`]
/// methods.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<ValueData<V>>`] directly, because that does not
/// allow us to type-erase the `V`.
#[repr(transparent)]
pub struct RawValue {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<V>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation
    ///    and the `into_inner_unchecked` method.
    ptr: NonNull<ValueData<Erased>>,
}

impl RawValue {
    /// Creates a new [`RawValue`] holding the specified value.
    ///
    /// The `V: Clone` bound is captured into the vtable here, which is what
    /// allows [`RawValueRef::clone_value`] to copy the holder later without
    /// knowing the concrete type.
    #[inline]
    pub fn new<V: Clone + 'static>(value: V) -> Self {
        let ptr = Box::new(ValueData::new(value));
        let ptr: *mut ValueData<V> = Box::into_raw(ptr);
        let ptr: *mut ValueData<Erased> = ptr.cast::<ValueData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<ValueData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns a mutable reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_mut(&mut self) -> RawValueMut<'_> {
        RawValueMut {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Consumes the [`RawValue`] and returns the held value, transferring it
    /// out by move.
    ///
    /// The heap allocation is released without running the value's destructor
    /// a second time: ownership of the value passes to the caller.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`ValueData`] (can be verified by calling
    ///    [`RawValueRef::type_id`] first).
    #[inline]
    pub unsafe fn into_inner_unchecked<V: 'static>(self) -> V {
        debug_assert_eq!(self.as_ref().type_id(), TypeId::of::<V>());

        // Skip our own `Drop` impl: ownership of the allocation moves into
        // the reconstructed `Box` below.
        let this = ManuallyDrop::new(self);
        let ptr: NonNull<ValueData<V>> = this.ptr.cast();
        // SAFETY: The pointer came from `Box::into_raw` of a
        // `Box<ValueData<V>>` (type invariant 1 plus the caller's guarantee
        // that `V` is the stored type), it has not been freed (invariant 3),
        // and it is not used again afterwards since `self` has been consumed
        // and its `Drop` suppressed.
        let boxed: Box<ValueData<V>> = unsafe { Box::from_raw(ptr.as_ptr()) };
        boxed.into_value()
    }
}

impl core::ops::Drop for RawValue {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawValue::new`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to
        //    match the data in the `ValueData`.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly
        //    transferring ownership here and the pointer is not used
        //    afterwards, as we are in the drop function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to a [`ValueData`] that is guaranteed to point to
/// an initialized instance of a [`ValueData<V>`] for some specific `V`,
/// though we do not know which actual `V` it is.
///
/// We cannot use a [`&'a ValueData<V>`] directly, because that would require
/// us to know the actual type of the held value, which we do not.
///
/// [`&'a ValueData<V>`]: ValueData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawValueRef<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<V>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a ValueData<Erased>`
    _marker: core::marker::PhantomData<&'a ValueData<Erased>>,
}

impl<'a> RawValueRef<'a> {
    /// Casts the [`RawValueRef`] to a [`ValueData<V>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<V: 'static>(self) -> &'a ValueData<V> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<V>());

        let this = self.ptr.cast::<ValueData<V>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable
        //   (guaranteed by RawValueRef's type invariants)
        // - The pointee is properly initialized (RawValueRef's doc comment
        //   guarantees it points to an initialized ValueData<V> for some V)
        // - The type `V` matches the actual value type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawValueRef<'a>'s
        //   lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`ValueData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const ValueData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the held value.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the held value.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Allocates an independent copy of the held value and returns a new
    /// [`RawValue`] owning it.
    ///
    /// The copy is deep: the returned holder owns its own allocation, and the
    /// two values share no storage afterwards.
    #[inline]
    pub fn clone_value(self) -> RawValue {
        let vtable = self.vtable();

        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match
        //    the data in the `ValueData`.
        unsafe { vtable.clone(self) }
    }
}

/// A lifetime-bound mutable pointer to a [`ValueData`] that is guaranteed to
/// point to an initialized instance of a [`ValueData<V>`] for some specific
/// `V`, though we do not know which actual `V` it is.
///
/// Unlike [`RawValueRef`], this type is neither [`Clone`] nor [`Copy`], as it
/// represents exclusive access to the pointee.
#[repr(transparent)]
pub struct RawValueMut<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<V>>` for
    ///    some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<V>` for the entire
    ///    lifetime of this object.
    /// 3. No other reference to the pointee exists for the lifetime `'a`.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a mut ValueData<Erased>`
    _marker: core::marker::PhantomData<&'a mut ValueData<Erased>>,
}

impl<'a> RawValueMut<'a> {
    /// Casts the [`RawValueMut`] to a mutable [`ValueData<V>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner_mut<V: 'static>(self) -> &'a mut ValueData<V> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().vtable().type_id(), TypeId::of::<V>());

        let mut this = self.ptr.cast::<ValueData<V>>();
        // SAFETY: Converting the NonNull pointer to a mutable reference is
        // sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable
        //   (guaranteed by RawValueMut's type invariants)
        // - The pointee is properly initialized (RawValueMut's doc comment
        //   guarantees it points to an initialized ValueData<V> for some V)
        // - The type `V` matches the actual value type (guaranteed by caller)
        // - Access is exclusive for `'a` (type invariant 3)
        unsafe { this.as_mut() }
    }

    /// Reborrows this [`RawValueMut`] as a shared [`RawValueRef`].
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_raw_value_size() {
        assert_eq!(
            core::mem::size_of::<RawValue>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValue>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawValueRef<'_>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValueRef<'_>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_value_type_queries() {
        let int_value = RawValue::new(100i32);
        let string_value = RawValue::new(String::from("test"));

        assert_eq!(int_value.as_ref().type_id(), TypeId::of::<i32>());
        assert_eq!(string_value.as_ref().type_id(), TypeId::of::<String>());
        assert_ne!(int_value.as_ref().type_id(), string_value.as_ref().type_id());

        // The vtables should be different per type
        assert!(!core::ptr::eq(
            int_value.as_ref().vtable(),
            string_value.as_ref().vtable()
        ));
    }

    #[test]
    fn test_raw_value_downcast() {
        let value = RawValue::new(42i32);

        // SAFETY: the held value is an `i32`.
        let inner = unsafe { value.as_ref().downcast_unchecked::<i32>() };
        assert_eq!(*inner, 42);
    }

    #[test]
    fn test_raw_value_downcast_mut() {
        let mut value = RawValue::new(String::from("before"));

        {
            // SAFETY: the held value is a `String`.
            let inner = unsafe { value.as_mut().downcast_mut_unchecked::<String>() };
            inner.push_str(" after");
        }

        // SAFETY: the held value is a `String`.
        let inner = unsafe { value.as_ref().downcast_unchecked::<String>() };
        assert_eq!(inner, "before after");
    }

    #[test]
    fn test_raw_value_clone_is_deep() {
        let original = RawValue::new(String::from("shared?"));
        let copy = original.as_ref().clone_value();

        // SAFETY: both holders hold a `String`.
        let original_inner = unsafe { original.as_ref().downcast_unchecked::<String>() };
        // SAFETY: both holders hold a `String`.
        let copy_inner = unsafe { copy.as_ref().downcast_unchecked::<String>() };

        assert_eq!(original_inner, copy_inner);
        // Same contents, different storage
        assert!(!core::ptr::eq(original_inner.as_ptr(), copy_inner.as_ptr()));
    }

    #[test]
    fn test_raw_value_into_inner() {
        let value = RawValue::new(String::from("take me"));

        // SAFETY: the held value is a `String`.
        let inner = unsafe { value.into_inner_unchecked::<String>() };
        assert_eq!(inner, "take me");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawValue: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueRef<'_>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueMut<'_>: Send, Sync);
    }
}
