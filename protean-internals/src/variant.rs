//! Raw tagged-union storage for the fixed-alternative variant containers.
//!
//! Each `RawVariantN` pairs a `union` over its alternative types with a
//! discriminant enum (`TagN`). The union is the storage block: sized and
//! aligned by the compiler to the maximum over the alternative set, holding
//! exactly one alternative at a time. The tag records which one.
//!
//! # Safety Invariant
//!
//! Outside the private `drop_live` helper, the tag always names the union
//! field that holds an initialized value, and no other field is initialized.
//! Every operation that interprets the raw storage — destruction, copying,
//! move-out, type queries — dispatches on the tag with an exhaustive `match`:
//! one arm per alternative and **no fallback arm**, so adding an alternative
//! without handling it everywhere is a compile error. These dispatchers are
//! the only code in the workspace that reads the union fields.
//!
//! The storage is never empty: construction activates an alternative and
//! every destroy is immediately followed by an activation.

use core::{any::TypeId, mem::ManuallyDrop};

/// Generates the discriminant enum, union storage, and raw variant type for
/// one arity of the tagged union.
macro_rules! raw_variants {
    (
        $Tag:ident, $Data:ident, $Raw:ident;
        $(
            $idx:literal: $T:ident, $field:ident, $AltV:ident,
            $new:ident, $get:ident, $get_mut:ident, $take:ident, $set:ident;
        )+
    ) => {
        #[doc = concat!("Discriminant for [`", stringify!($Raw), "`].")]
        ///
        /// Fieldless, with exactly one variant per alternative, so that a
        /// `match` over it is exhaustive without a fallback arm.
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        pub enum $Tag {
            $(
                #[doc = concat!("Alternative ", stringify!($idx), " is live.")]
                $AltV,
            )+
        }

        impl $Tag {
            /// Position of this discriminant in the alternative list.
            #[inline]
            pub const fn index(self) -> usize {
                match self {
                    $( Self::$AltV => $idx, )+
                }
            }
        }

        #[doc = concat!("Storage block for [`", stringify!($Raw), "`]: sized and aligned")]
        /// to the maximum over the alternative types, holding exactly one
        /// alternative at a time.
        union $Data<$($T),+> {
            $(
                #[doc = concat!("The storage interpreted as alternative ", stringify!($idx), ".")]
                $field: ManuallyDrop<$T>,
            )+
        }

        #[doc = concat!("Raw storage for a tagged union over ", stringify!($($T),+), ".")]
        ///
        /// Always holds exactly one live alternative; see the module
        /// documentation for the tag/storage invariant.
        pub struct $Raw<$($T),+> {
            /// Discriminant naming the live field of `data`.
            ///
            /// # Safety
            ///
            /// Outside of `drop_live`, `tag` always names the union field of
            /// `data` that holds an initialized value, and no other field of
            /// `data` is initialized.
            tag: $Tag,
            /// The shared storage block.
            data: $Data<$($T),+>,
        }

        impl<$($T),+> $Raw<$($T),+> {
            /// Returns the current discriminant.
            #[inline]
            pub fn tag(&self) -> $Tag {
                self.tag
            }

            /// Destroys the live alternative in place, dispatching on the
            /// tag.
            ///
            /// Afterwards the storage is dead and the tag is stale: the
            /// caller must immediately activate an alternative or forget the
            /// storage, without reading any field in between.
            fn drop_live(&mut self) {
                match self.tag {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names this field as the live
                            // one, so it holds an initialized value.
                            let slot: &mut ManuallyDrop<$T> = unsafe { &mut self.data.$field };
                            // SAFETY: The value is dropped exactly once:
                            // every caller either re-activates the storage or
                            // forgets it before it is read again.
                            unsafe { ManuallyDrop::drop(slot) }
                        }
                    )+
                }
            }

            $(
                #[doc = concat!("Creates storage with alternative ", stringify!($idx), " live, constructed in place from `value`.")]
                #[inline]
                pub fn $new(value: $T) -> Self {
                    Self {
                        tag: $Tag::$AltV,
                        data: $Data { $field: ManuallyDrop::new(value) },
                    }
                }

                #[doc = concat!("Returns a reference to alternative ", stringify!($idx), ".")]
                ///
                /// # Safety
                ///
                /// The caller must ensure:
                ///
                #[doc = concat!("1. The live alternative is alternative ", stringify!($idx), ", i.e. `self.tag()` is `", stringify!($Tag), "::", stringify!($AltV), "`.")]
                #[inline]
                pub unsafe fn $get(&self) -> &$T {
                    debug_assert!(matches!(self.tag, $Tag::$AltV));
                    // SAFETY: The caller guarantees this field is the live
                    // one, so it holds an initialized value.
                    unsafe { &self.data.$field }
                }

                #[doc = concat!("Returns a mutable reference to alternative ", stringify!($idx), ".")]
                ///
                /// # Safety
                ///
                /// The caller must ensure:
                ///
                #[doc = concat!("1. The live alternative is alternative ", stringify!($idx), ", i.e. `self.tag()` is `", stringify!($Tag), "::", stringify!($AltV), "`.")]
                #[inline]
                pub unsafe fn $get_mut(&mut self) -> &mut $T {
                    debug_assert!(matches!(self.tag, $Tag::$AltV));
                    // SAFETY: The caller guarantees this field is the live
                    // one, so it holds an initialized value.
                    unsafe { &mut self.data.$field }
                }

                #[doc = concat!("Consumes the storage and returns alternative ", stringify!($idx), " by move.")]
                ///
                /// The storage's destructor does not run; ownership of the
                /// live value transfers to the caller.
                ///
                /// # Safety
                ///
                /// The caller must ensure:
                ///
                #[doc = concat!("1. The live alternative is alternative ", stringify!($idx), ", i.e. `self.tag()` is `", stringify!($Tag), "::", stringify!($AltV), "`.")]
                #[inline]
                pub unsafe fn $take(self) -> $T {
                    debug_assert!(matches!(self.tag, $Tag::$AltV));
                    // Skip our own `Drop` impl: the live value moves to the
                    // caller instead of being destroyed.
                    let mut this = ManuallyDrop::new(self);
                    // SAFETY: The caller guarantees this field is the live
                    // one, so it holds an initialized value.
                    let slot: &mut ManuallyDrop<$T> = unsafe { &mut this.data.$field };
                    // SAFETY: The storage's `Drop` is suppressed above, so
                    // the value is moved out exactly once and never read
                    // again.
                    unsafe { ManuallyDrop::take(slot) }
                }

                #[doc = concat!("Destroys the live alternative, then activates alternative ", stringify!($idx), " with `value`.")]
                #[inline]
                pub fn $set(&mut self, value: $T) {
                    self.drop_live();
                    // Re-activate immediately: nothing runs between the
                    // destroy above and the writes below, and writing a
                    // `ManuallyDrop` union field drops nothing.
                    self.data.$field = ManuallyDrop::new(value);
                    self.tag = $Tag::$AltV;
                }
            )+
        }

        impl<$($T: 'static),+> $Raw<$($T),+> {
            /// Returns the [`TypeId`] of the live alternative.
            #[inline]
            pub fn live_type_id(&self) -> TypeId {
                match self.tag {
                    $( $Tag::$AltV => TypeId::of::<$T>(), )+
                }
            }

            /// Returns the [`core::any::type_name`] of the live alternative.
            #[inline]
            pub fn live_type_name(&self) -> &'static str {
                match self.tag {
                    $( $Tag::$AltV => core::any::type_name::<$T>(), )+
                }
            }

            /// Consumes the storage and returns the live alternative as a
            /// `T`.
            ///
            /// # Safety
            ///
            /// The caller must ensure:
            ///
            /// 1. `T` is the exact type of the live alternative, i.e.
            ///    `self.live_type_id() == TypeId::of::<T>()`.
            pub unsafe fn into_live<T: 'static>(self) -> T {
                debug_assert_eq!(self.live_type_id(), TypeId::of::<T>());

                // Skip our own `Drop` impl: the live value moves to the
                // caller instead of being destroyed.
                let mut this = ManuallyDrop::new(self);
                match this.tag {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names this field as the live
                            // one, so it holds an initialized value.
                            let slot: &mut ManuallyDrop<$T> = unsafe { &mut this.data.$field };
                            // SAFETY: The storage's `Drop` is suppressed
                            // above, so the value is moved out exactly once
                            // and never read again.
                            let value: $T = unsafe { ManuallyDrop::take(slot) };
                            // SAFETY: `T` equals the live alternative's type
                            // as guaranteed by the caller.
                            unsafe { crate::util::transmute_identical::<$T, T>(value) }
                        }
                    )+
                }
            }

            /// Attempts to create storage whose live alternative is the
            /// unique alternative of type `T`.
            ///
            /// Matching is by exact [`TypeId`] equality, never by conversion.
            /// If `T` matches no alternative, or matches more than one (a
            /// duplicated alternative list), the value is handed back
            /// unchanged in `Err`.
            pub fn try_new_exact<T: 'static>(value: T) -> Result<Self, T> {
                let matching = 0usize $( + usize::from(TypeId::of::<T>() == TypeId::of::<$T>()) )+;
                if matching != 1 {
                    return Err(value);
                }
                $(
                    if TypeId::of::<T>() == TypeId::of::<$T>() {
                        // SAFETY: The TypeIds are equal, so `T` and the
                        // alternative type are the same type.
                        let value: $T = unsafe { crate::util::transmute_identical::<T, $T>(value) };
                        return Ok(Self::$new(value));
                    }
                )+
                Err(value)
            }
        }

        impl<$($T: Clone),+> Clone for $Raw<$($T),+> {
            fn clone(&self) -> Self {
                match self.tag {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names this field as the live
                            // one, so it holds an initialized value.
                            let value: &$T = unsafe { &self.data.$field };
                            Self {
                                tag: $Tag::$AltV,
                                data: $Data {
                                    $field: ManuallyDrop::new(value.clone()),
                                },
                            }
                        }
                    )+
                }
            }
        }

        impl<$($T),+> core::fmt::Debug for $Raw<$($T),+> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                // The union storage cannot be printed without per-alternative
                // bounds; expose only the discriminant, which is always safe
                // to read regardless of the live alternative's type.
                f.debug_struct(stringify!($Raw))
                    .field("tag", &self.tag)
                    .finish_non_exhaustive()
            }
        }

        impl<$($T),+> core::ops::Drop for $Raw<$($T),+> {
            #[inline]
            fn drop(&mut self) {
                self.drop_live();
            }
        }
    };
}

raw_variants! {
    Tag2, Data2, RawVariant2;
    0: T0, a0, Alt0, new_alt0, alt0, alt0_mut, take_alt0, set_alt0;
    1: T1, a1, Alt1, new_alt1, alt1, alt1_mut, take_alt1, set_alt1;
}

raw_variants! {
    Tag3, Data3, RawVariant3;
    0: T0, a0, Alt0, new_alt0, alt0, alt0_mut, take_alt0, set_alt0;
    1: T1, a1, Alt1, new_alt1, alt1, alt1_mut, take_alt1, set_alt1;
    2: T2, a2, Alt2, new_alt2, alt2, alt2_mut, take_alt2, set_alt2;
}

raw_variants! {
    Tag4, Data4, RawVariant4;
    0: T0, a0, Alt0, new_alt0, alt0, alt0_mut, take_alt0, set_alt0;
    1: T1, a1, Alt1, new_alt1, alt1, alt1_mut, take_alt1, set_alt1;
    2: T2, a2, Alt2, new_alt2, alt2, alt2_mut, take_alt2, set_alt2;
    3: T3, a3, Alt3, new_alt3, alt3, alt3_mut, take_alt3, set_alt3;
}

raw_variants! {
    Tag5, Data5, RawVariant5;
    0: T0, a0, Alt0, new_alt0, alt0, alt0_mut, take_alt0, set_alt0;
    1: T1, a1, Alt1, new_alt1, alt1, alt1_mut, take_alt1, set_alt1;
    2: T2, a2, Alt2, new_alt2, alt2, alt2_mut, take_alt2, set_alt2;
    3: T3, a3, Alt3, new_alt3, alt3, alt3_mut, take_alt3, set_alt3;
    4: T4, a4, Alt4, new_alt4, alt4, alt4_mut, take_alt4, set_alt4;
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::cell::Cell;

    use super::*;

    /// Increments its cell exactly once, when dropped.
    struct DropTally<'a>(&'a Cell<usize>);

    impl Drop for DropTally<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_storage_is_shared() {
        use core::mem::{align_of, size_of};

        // The block must be at least as large and aligned as every
        // alternative, and must not stack the alternatives side by side.
        assert!(size_of::<RawVariant2<u8, u64>>() >= size_of::<u64>());
        assert!(align_of::<RawVariant2<u8, u64>>() >= align_of::<u64>());
        assert!(size_of::<RawVariant3<u8, u8, u8>>() < size_of::<u8>() * 3 + size_of::<Tag3>() * 3);
    }

    #[test]
    fn test_tag_indices() {
        assert_eq!(Tag3::Alt0.index(), 0);
        assert_eq!(Tag3::Alt1.index(), 1);
        assert_eq!(Tag3::Alt2.index(), 2);
        assert_eq!(Tag5::Alt4.index(), 4);
    }

    #[test]
    fn test_new_and_get() {
        let storage = RawVariant3::<i32, f64, char>::new_alt2('z');
        assert_eq!(storage.tag(), Tag3::Alt2);
        assert_eq!(storage.live_type_id(), core::any::TypeId::of::<char>());

        // SAFETY: alternative 2 is live.
        let value = unsafe { storage.alt2() };
        assert_eq!(*value, 'z');
    }

    #[test]
    fn test_set_switches_alternative() {
        let mut storage = RawVariant2::<i32, String>::new_alt0(7);
        assert_eq!(storage.tag(), Tag2::Alt0);

        storage.set_alt1(String::from("seven"));
        assert_eq!(storage.tag(), Tag2::Alt1);

        // SAFETY: alternative 1 is live.
        let value = unsafe { storage.alt1() };
        assert_eq!(value, "seven");
    }

    #[test]
    fn test_get_mut() {
        let mut storage = RawVariant2::<i32, String>::new_alt0(1);
        {
            // SAFETY: alternative 0 is live.
            let value = unsafe { storage.alt0_mut() };
            *value += 41;
        }
        // SAFETY: alternative 0 is live.
        let value = unsafe { storage.alt0() };
        assert_eq!(*value, 42);
    }

    #[test]
    fn test_drop_runs_exactly_once() {
        let drops = Cell::new(0);

        let storage = RawVariant2::<DropTally<'_>, i32>::new_alt0(DropTally(&drops));
        assert_eq!(drops.get(), 0);
        drop(storage);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_set_destroys_previous_alternative() {
        let drops = Cell::new(0);

        let mut storage = RawVariant2::<DropTally<'_>, i32>::new_alt0(DropTally(&drops));
        storage.set_alt1(5);
        assert_eq!(drops.get(), 1);

        // Re-activating alternative 0 destroys the i32 (a no-op) and the
        // tally only fires again when the storage itself is dropped.
        storage.set_alt0(DropTally(&drops));
        assert_eq!(drops.get(), 1);
        drop(storage);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_take_skips_destructor_until_caller_drops() {
        let drops = Cell::new(0);

        let storage = RawVariant2::<DropTally<'_>, i32>::new_alt0(DropTally(&drops));
        // SAFETY: alternative 0 is live.
        let value = unsafe { storage.take_alt0() };
        assert_eq!(drops.get(), 0);
        drop(value);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = RawVariant2::<i32, String>::new_alt1(String::from("deep"));
        let copy = original.clone();

        assert_eq!(copy.tag(), Tag2::Alt1);
        // SAFETY: alternative 1 is live in both.
        let original_value = unsafe { original.alt1() };
        // SAFETY: alternative 1 is live in both.
        let copy_value = unsafe { copy.alt1() };
        assert_eq!(original_value, copy_value);
        assert!(!core::ptr::eq(original_value.as_ptr(), copy_value.as_ptr()));
    }

    #[test]
    fn test_into_live() {
        let storage = RawVariant3::<i32, f64, String>::new_alt2(String::from("out"));
        // SAFETY: the live alternative is a `String`.
        let value: String = unsafe { storage.into_live() };
        assert_eq!(value, "out");
    }

    #[test]
    fn test_try_new_exact_matches_unique_type() {
        let storage = RawVariant3::<i32, f64, char>::try_new_exact('z').unwrap();
        assert_eq!(storage.tag().index(), 2);

        let storage = RawVariant3::<i32, f64, char>::try_new_exact(1.5f64).unwrap();
        assert_eq!(storage.tag().index(), 1);
    }

    #[test]
    fn test_try_new_exact_refuses_non_alternative() {
        let err = RawVariant3::<i32, f64, char>::try_new_exact("nope").unwrap_err();
        assert_eq!(err, "nope");
    }

    #[test]
    fn test_try_new_exact_refuses_duplicates() {
        // `i32` appears twice, so by-type construction is ambiguous and the
        // value is handed back.
        let err = RawVariant3::<i32, i32, char>::try_new_exact(7i32).unwrap_err();
        assert_eq!(err, 7);

        // The unique alternative still works.
        let storage = RawVariant3::<i32, i32, char>::try_new_exact('c').unwrap();
        assert_eq!(storage.tag().index(), 2);
    }

    #[test]
    fn test_send_sync_follow_alternatives() {
        static_assertions::assert_impl_all!(RawVariant2<i32, String>: Send, Sync);
        static_assertions::assert_not_impl_any!(
            RawVariant2<i32, alloc::rc::Rc<i32>>: Send, Sync
        );
    }
}
