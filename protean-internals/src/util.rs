//! Internal utility types and functions.

use core::{any::TypeId, mem::ManuallyDrop};

/// Marker type used when type-erasing values.
///
/// This zero-sized type serves as a placeholder in generic type parameters
/// when the actual concrete type has been erased. For example,
/// `ValueData<Erased>` represents a held value whose concrete type is unknown
/// at the current scope.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;

/// Moves `src` into a value of type `Dst`.
///
/// This is a move, not a conversion: the bytes of `src` are reinterpreted
/// unchanged and `src` is not dropped.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `Src` and `Dst` are the same type, i.e.
///    `TypeId::of::<Src>() == TypeId::of::<Dst>()`.
pub(crate) unsafe fn transmute_identical<Src: 'static, Dst: 'static>(src: Src) -> Dst {
    debug_assert_eq!(TypeId::of::<Src>(), TypeId::of::<Dst>());

    let src = ManuallyDrop::new(src);
    // SAFETY: `Src` and `Dst` are the same type as guaranteed by the caller,
    // so reading a `Dst` out of the bytes of `src` is reading the value at
    // its own type. Ownership transfers to the returned value; `src` is
    // wrapped in `ManuallyDrop`, so the source bytes are never dropped.
    unsafe { core::ptr::read((&raw const src).cast::<Dst>()) }
}
