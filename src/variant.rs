//! The fixed-alternative tagged-union containers.
//!
//! A `VariantN` always holds exactly one value out of its `N` declared
//! alternative types. There is no empty state: default construction
//! activates alternative 0, and every reassignment destroys the previous
//! value before the container reports the new state.
//!
//! The containers come in one type per arity ([`Variant2`] … [`Variant5`])
//! rather than one variadic type, with a shared surface:
//!
//! - positional operations, one set per alternative `K`: `new_K`, `set_K`,
//!   `alt_K`, `alt_K_mut`, `into_K`;
//! - by-type operations resolved against the live alternative's exact
//!   dynamic type: [`get`](Variant3::get), [`get_mut`](Variant3::get_mut),
//!   [`into_inner`](Variant3::into_inner);
//! - by-type construction/assignment requiring a unique exact match among
//!   the declared alternatives: [`try_new`](Variant3::try_new),
//!   [`try_set`](Variant3::try_set).
//!
//! Mismatched access is always a distinguishable failure
//! ([`WrongAlternative`] positionally, [`TypeMismatch`] by type) — never a
//! null result, since a variant can never be empty.

use core::{
    any::{Any, TypeId},
    fmt,
};

use protean_internals::{
    RawVariant2, RawVariant3, RawVariant4, RawVariant5, Tag2, Tag3, Tag4, Tag5,
};

use crate::error::{TypeMismatch, WrongAlternative};

/// Generates one fixed-arity variant container over its raw storage type.
macro_rules! variants {
    (
        $(#[$meta:meta])*
        $Var:ident, $Raw:ident, $Tag:ident, $arity:literal, $T0:ident, $new0:ident;
        $(
            $idx:literal: $T:ident, $AltV:ident,
            ($new:ident, $set:ident, $alt:ident, $alt_mut:ident, $into:ident),
            ($raw_new:ident, $raw_get:ident, $raw_get_mut:ident, $raw_take:ident, $raw_set:ident);
        )+
    ) => {
        $(#[$meta])*
        pub struct $Var<$($T),+> {
            /// The tagged storage; its tag always names the live value.
            raw: $Raw<$($T),+>,
        }

        impl<$($T),+> $Var<$($T),+> {
            /// Number of declared alternatives.
            pub const ALTERNATIVES: usize = $arity;

            /// Returns the position of the live alternative.
            ///
            /// Always in `[0, ALTERNATIVES)`.
            #[must_use]
            pub fn index(&self) -> usize {
                self.raw.tag().index()
            }

            $(
                #[doc = concat!("Creates a variant with alternative ", stringify!($idx), " live, holding `value`.")]
                #[must_use]
                pub fn $new(value: $T) -> Self {
                    Self {
                        raw: $Raw::$raw_new(value),
                    }
                }

                #[doc = concat!("Destroys the live value, then activates alternative ", stringify!($idx), " with `value`.")]
                ///
                /// The previous alternative's destructor runs exactly once,
                /// before the new value is installed.
                pub fn $set(&mut self, value: $T) {
                    self.raw.$raw_set(value);
                }

                #[doc = concat!("Returns a reference to alternative ", stringify!($idx), ".")]
                ///
                /// # Errors
                ///
                #[doc = concat!("Fails with [`WrongAlternative`] if alternative ", stringify!($idx), " is not the live one.")]
                pub fn $alt(&self) -> Result<&$T, WrongAlternative> {
                    if let $Tag::$AltV = self.raw.tag() {
                        // SAFETY: The tag names alternative $idx as live.
                        Ok(unsafe { self.raw.$raw_get() })
                    } else {
                        Err(WrongAlternative::new($idx, self.index()))
                    }
                }

                #[doc = concat!("Returns a mutable reference to alternative ", stringify!($idx), ".")]
                ///
                /// # Errors
                ///
                #[doc = concat!("Fails with [`WrongAlternative`] if alternative ", stringify!($idx), " is not the live one.")]
                pub fn $alt_mut(&mut self) -> Result<&mut $T, WrongAlternative> {
                    if let $Tag::$AltV = self.raw.tag() {
                        // SAFETY: The tag names alternative $idx as live.
                        Ok(unsafe { self.raw.$raw_get_mut() })
                    } else {
                        Err(WrongAlternative::new($idx, self.index()))
                    }
                }

                #[doc = concat!("Consumes the variant and moves alternative ", stringify!($idx), " out.")]
                ///
                /// # Errors
                ///
                #[doc = concat!("If alternative ", stringify!($idx), " is not the live one, the variant is handed back unchanged.")]
                pub fn $into(self) -> Result<$T, Self> {
                    if let $Tag::$AltV = self.raw.tag() {
                        // SAFETY: The tag names alternative $idx as live.
                        Ok(unsafe { self.raw.$raw_take() })
                    } else {
                        Err(self)
                    }
                }
            )+
        }

        impl<$($T: 'static),+> $Var<$($T),+> {
            /// Attempts to create a variant from a value of one of the
            /// alternative types.
            ///
            /// The live alternative becomes the unique one whose type is
            /// exactly `T`. Matching is by [`TypeId`] equality, never by
            /// conversion.
            ///
            /// # Errors
            ///
            /// The value is handed back unchanged if `T` is not one of the
            /// declared alternatives, or if it matches more than one of them
            /// (a duplicated alternative list makes by-type construction
            /// ambiguous; use the positional constructors instead).
            pub fn try_new<T: 'static>(value: T) -> Result<Self, T> {
                Ok(Self {
                    raw: $Raw::try_new_exact(value)?,
                })
            }

            /// Attempts to assign a value of one of the alternative types,
            /// destroying the previously-live value on success.
            ///
            /// Matching follows the same unique-exact-type rule as
            /// [`try_new`](Self::try_new).
            ///
            /// # Errors
            ///
            /// The value is handed back unchanged — and the variant is left
            /// untouched — if `T` does not match exactly one alternative.
            pub fn try_set<T: 'static>(&mut self, value: T) -> Result<(), T> {
                self.raw = $Raw::try_new_exact(value)?;
                Ok(())
            }

            /// Returns `true` if `T` is one of the declared alternative
            /// types.
            ///
            /// This queries the declaration, not the current state: whether
            /// `T` is currently live is `self.type_id() == TypeId::of::<T>()`
            /// (or an `index()` comparison).
            #[must_use]
            pub fn holds_alternative<T: 'static>() -> bool {
                let matching = 0usize $( + usize::from(TypeId::of::<T>() == TypeId::of::<$T>()) )+;
                matching > 0
            }

            /// Returns the [`TypeId`] of the live alternative.
            #[must_use]
            pub fn type_id(&self) -> TypeId {
                self.raw.live_type_id()
            }

            /// Returns the [`core::any::type_name`] of the live alternative.
            #[must_use]
            pub fn type_name(&self) -> &'static str {
                self.raw.live_type_name()
            }

            /// Returns a reference to the live value if its exact type is
            /// `T`.
            ///
            /// # Errors
            ///
            /// Fails with [`TypeMismatch`] naming both types if the live
            /// alternative is not a `T`.
            pub fn get<T: 'static>(&self) -> Result<&T, TypeMismatch> {
                match self.raw.tag() {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names alternative $idx as
                            // live.
                            let value: &$T = unsafe { self.raw.$raw_get() };
                            <dyn Any>::downcast_ref::<T>(value).ok_or_else(|| {
                                TypeMismatch::new(
                                    core::any::type_name::<T>(),
                                    core::any::type_name::<$T>(),
                                )
                            })
                        }
                    )+
                }
            }

            /// Returns a mutable reference to the live value if its exact
            /// type is `T`.
            ///
            /// # Errors
            ///
            /// Same conditions as [`get`](Self::get).
            pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T, TypeMismatch> {
                match self.raw.tag() {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names alternative $idx as
                            // live.
                            let value: &mut $T = unsafe { self.raw.$raw_get_mut() };
                            <dyn Any>::downcast_mut::<T>(value).ok_or_else(|| {
                                TypeMismatch::new(
                                    core::any::type_name::<T>(),
                                    core::any::type_name::<$T>(),
                                )
                            })
                        }
                    )+
                }
            }

            /// Consumes the variant and moves the live value out if its
            /// exact type is `T`.
            ///
            /// # Errors
            ///
            /// If the live alternative is not a `T`, the variant is handed
            /// back unchanged, so the live value is never lost.
            pub fn into_inner<T: 'static>(self) -> Result<T, Self> {
                if self.type_id() == TypeId::of::<T>() {
                    // SAFETY: The live alternative's TypeId equals `T`'s.
                    Ok(unsafe { self.raw.into_live::<T>() })
                } else {
                    Err(self)
                }
            }
        }

        impl<$($T),+> Default for $Var<$($T),+>
        where
            $T0: Default,
        {
            /// Creates a variant with alternative 0 live, holding its
            /// default value.
            fn default() -> Self {
                Self::$new0(<$T0>::default())
            }
        }

        impl<$($T: Clone),+> Clone for $Var<$($T),+> {
            /// Deep-copies the live value; the clone's storage is
            /// independent of the original's.
            fn clone(&self) -> Self {
                Self {
                    raw: self.raw.clone(),
                }
            }
        }

        impl<$($T: fmt::Debug),+> fmt::Debug for $Var<$($T),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.raw.tag() {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tag names alternative $idx as
                            // live.
                            let value: &$T = unsafe { self.raw.$raw_get() };
                            f.debug_struct(stringify!($Var))
                                .field("index", &($idx as usize))
                                .field("value", value)
                                .finish()
                        }
                    )+
                }
            }
        }

        impl<$($T: PartialEq),+> PartialEq for $Var<$($T),+> {
            /// Two variants are equal iff the same alternative is live in
            /// both and the live values are equal.
            fn eq(&self, other: &Self) -> bool {
                if self.raw.tag() != other.raw.tag() {
                    return false;
                }
                match self.raw.tag() {
                    $(
                        $Tag::$AltV => {
                            // SAFETY: The tags are equal and name alternative
                            // $idx as live in `self`.
                            let lhs: &$T = unsafe { self.raw.$raw_get() };
                            // SAFETY: The tags are equal and name alternative
                            // $idx as live in `other`.
                            let rhs: &$T = unsafe { other.raw.$raw_get() };
                            lhs == rhs
                        }
                    )+
                }
            }
        }
    };
}

variants! {
    /// A tagged union over two alternative types.
    ///
    /// See the [module documentation](self) for the shared container
    /// surface; [`Variant3`] carries the worked examples.
    ///
    /// Default construction activates alternative 0 and requires its type to
    /// be [`Default`]; a variant whose first alternative is not
    /// default-constructible cannot be default-constructed:
    ///
    /// ```compile_fail
    /// use protean::Variant2;
    ///
    /// struct NoDefault(i32);
    /// let variant = Variant2::<NoDefault, i32>::default();
    /// ```
    Variant2, RawVariant2, Tag2, 2, T0, new_0;
    0: T0, Alt0, (new_0, set_0, alt_0, alt_0_mut, into_0),
        (new_alt0, alt0, alt0_mut, take_alt0, set_alt0);
    1: T1, Alt1, (new_1, set_1, alt_1, alt_1_mut, into_1),
        (new_alt1, alt1, alt1_mut, take_alt1, set_alt1);
}

variants! {
    /// A tagged union over three alternative types.
    ///
    /// Exactly one alternative is live at all times; the discriminant
    /// reported by [`index`](Variant3::index) records which. Assignment
    /// destroys the previous value and construction from a value selects
    /// the unique alternative with that exact type:
    ///
    /// ```
    /// use protean::Variant3;
    ///
    /// let mut variant = Variant3::<i32, f64, char>::try_new('z').unwrap();
    /// assert_eq!(variant.index(), 2);
    /// assert_eq!(variant.get::<char>(), Ok(&'z'));
    /// assert!(variant.get::<i32>().is_err());
    ///
    /// variant.set_0(7);
    /// assert_eq!(variant.index(), 0);
    /// assert_eq!(variant.alt_0(), Ok(&7));
    /// assert!(variant.alt_2().is_err());
    /// ```
    Variant3, RawVariant3, Tag3, 3, T0, new_0;
    0: T0, Alt0, (new_0, set_0, alt_0, alt_0_mut, into_0),
        (new_alt0, alt0, alt0_mut, take_alt0, set_alt0);
    1: T1, Alt1, (new_1, set_1, alt_1, alt_1_mut, into_1),
        (new_alt1, alt1, alt1_mut, take_alt1, set_alt1);
    2: T2, Alt2, (new_2, set_2, alt_2, alt_2_mut, into_2),
        (new_alt2, alt2, alt2_mut, take_alt2, set_alt2);
}

variants! {
    /// A tagged union over four alternative types.
    ///
    /// See the [module documentation](self) for the shared container
    /// surface; [`Variant3`] carries the worked examples.
    Variant4, RawVariant4, Tag4, 4, T0, new_0;
    0: T0, Alt0, (new_0, set_0, alt_0, alt_0_mut, into_0),
        (new_alt0, alt0, alt0_mut, take_alt0, set_alt0);
    1: T1, Alt1, (new_1, set_1, alt_1, alt_1_mut, into_1),
        (new_alt1, alt1, alt1_mut, take_alt1, set_alt1);
    2: T2, Alt2, (new_2, set_2, alt_2, alt_2_mut, into_2),
        (new_alt2, alt2, alt2_mut, take_alt2, set_alt2);
    3: T3, Alt3, (new_3, set_3, alt_3, alt_3_mut, into_3),
        (new_alt3, alt3, alt3_mut, take_alt3, set_alt3);
}

variants! {
    /// A tagged union over five alternative types.
    ///
    /// See the [module documentation](self) for the shared container
    /// surface; [`Variant3`] carries the worked examples.
    Variant5, RawVariant5, Tag5, 5, T0, new_0;
    0: T0, Alt0, (new_0, set_0, alt_0, alt_0_mut, into_0),
        (new_alt0, alt0, alt0_mut, take_alt0, set_alt0);
    1: T1, Alt1, (new_1, set_1, alt_1, alt_1_mut, into_1),
        (new_alt1, alt1, alt1_mut, take_alt1, set_alt1);
    2: T2, Alt2, (new_2, set_2, alt_2, alt_2_mut, into_2),
        (new_alt2, alt2, alt2_mut, take_alt2, set_alt2);
    3: T3, Alt3, (new_3, set_3, alt_3, alt_3_mut, into_3),
        (new_alt3, alt3, alt3_mut, take_alt3, set_alt3);
    4: T4, Alt4, (new_4, set_4, alt_4, alt_4_mut, into_4),
        (new_alt4, alt4, alt4_mut, take_alt4, set_alt4);
}
