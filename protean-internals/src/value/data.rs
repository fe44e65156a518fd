//! This module encapsulates the fields of the [`ValueData`]. Since this is
//! the only place they are visible, this means that the type of the
//! [`ValueVtable`] is guaranteed to always be in sync with the type of the
//! actual held value. This follows from the fact that they are in sync when
//! created and that the API offers no way to change the [`ValueVtable`] or
//! value type after creation.

use alloc::boxed::Box;

use crate::value::{
    raw::{RawValueMut, RawValueRef},
    vtable::ValueVtable,
};

/// Type-erased value data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete
/// value type `V` is unknown.
#[repr(C)]
pub(super) struct ValueData<V: 'static> {
    /// The vtable of this value
    vtable: &'static ValueVtable,
    /// The actual held value
    value: V,
}

impl<V: Clone + 'static> ValueData<V> {
    /// Creates a new [`ValueData`] holding the given value.
    ///
    /// This method creates the vtable for type-erased dispatch and pairs it
    /// with the value.
    #[inline]
    pub(super) fn new(value: V) -> Self {
        Self {
            vtable: ValueVtable::new::<V>(),
            value,
        }
    }
}

impl<V: 'static> ValueData<V> {
    /// Consumes a boxed [`ValueData`] and returns the held value, running no
    /// destructor other than the value's own when the caller later drops it.
    #[inline]
    pub(super) fn into_value(self: Box<Self>) -> V {
        let data = *self;
        data.value
    }
}

impl<'a> RawValueRef<'a> {
    /// Returns a reference to the [`ValueVtable`] of the [`ValueData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static ValueVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner value type, but we do know
        // that the pointer points to an instance of `ValueData<V>` for some
        // specific `V`. Since `ValueData<V>` is `#[repr(C)]`, it is safe to
        // create pointers to the fields before the actual value.
        //
        // We need to take care to avoid creating an actual reference to the
        // `ValueData` itself though, as that would still be undefined
        // behavior since we don't have the right type.
        let vtable_ptr: *const &'static ValueVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and getting out the `&'static
        // ValueVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the held value of the [`ValueData`] instance as a reference
    /// to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub unsafe fn downcast_unchecked<V: 'static>(self) -> &'a V {
        // SAFETY: The inner function requires that `V` matches the type
        // stored, but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<V>() };
        &this.value
    }
}

impl<'a> RawValueMut<'a> {
    /// Accesses the held value of the [`ValueData`] instance as a mutable
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub unsafe fn downcast_mut_unchecked<V: 'static>(self) -> &'a mut V {
        // SAFETY: The inner function requires that `V` matches the type
        // stored, but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner_mut::<V>() };
        &mut this.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_field_offsets() {
        use core::mem::{offset_of, size_of};

        #[repr(align(32))]
        struct LargeAlignment {
            _value: u8,
        }

        assert_eq!(offset_of!(ValueData<u8>, vtable), 0);
        assert_eq!(offset_of!(ValueData<u32>, vtable), 0);
        assert_eq!(offset_of!(ValueData<[u64; 4]>, vtable), 0);
        assert_eq!(offset_of!(ValueData<LargeAlignment>, vtable), 0);

        assert!(offset_of!(ValueData<u8>, value) >= size_of::<&'static ValueVtable>());
        assert!(offset_of!(ValueData<u32>, value) >= size_of::<&'static ValueVtable>());
        assert!(offset_of!(ValueData<[u64; 4]>, value) >= size_of::<&'static ValueVtable>());
        assert!(offset_of!(ValueData<LargeAlignment>, value) >= size_of::<&'static ValueVtable>());
    }
}
