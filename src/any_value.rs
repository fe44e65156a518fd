//! The open-ended type-erased container.

use core::{any::TypeId, fmt};

use protean_internals::RawValue;

use crate::error::TypeMismatch;

/// Sentinel type name reported by an empty container.
const EMPTY_TYPE_NAME: &str = "<empty>";

/// A container holding zero or one value of any `Clone` type.
///
/// The container erases the stored type: an `AnyValue` holding an `i32` and
/// one holding a `String` have the same type. What it remembers is the
/// value's dynamic type identity, which every accessor checks before handing
/// the value back — by exact [`TypeId`] equality, never by conversion.
///
/// # Ownership and copying
///
/// The container exclusively owns its value through a single heap-allocated
/// holder. Cloning is deep: the clone allocates its own holder and copies
/// the value with the value type's own [`Clone`] impl, captured when the
/// value was stored. The original and the clone share no storage:
///
/// ```
/// use protean::AnyValue;
///
/// let a = AnyValue::new(42i32);
/// let mut b = a.clone();
/// b.emplace(String::from("x"));
///
/// // Mutating `b` never affects `a`.
/// assert_eq!(a.downcast_ref::<i32>(), Some(&42));
/// ```
///
/// Storing a type that is not `Clone` is rejected at compile time:
///
/// ```compile_fail
/// use protean::AnyValue;
///
/// struct NotClone;
/// let value = AnyValue::new(NotClone);
/// ```
///
/// # Extraction
///
/// Two accessor families exist, selected by how the caller wants a mismatch
/// surfaced: [`downcast_ref`]/[`downcast_mut`] return an [`Option`], while
/// [`get`]/[`get_mut`] return a [`Result`] carrying a [`TypeMismatch`], and
/// [`downcast`] consumes the container and moves the value out. See the
/// [crate docs](crate#choosing-an-accessor).
///
/// # Thread safety
///
/// `AnyValue` is `!Send + !Sync`: the stored type is not required to be
/// `Send`, so crossing threads requires external synchronization that also
/// guarantees the stored types are sendable. This is a caller obligation;
/// the container does no locking of its own.
///
/// [`downcast_ref`]: AnyValue::downcast_ref
/// [`downcast_mut`]: AnyValue::downcast_mut
/// [`get`]: AnyValue::get
/// [`get_mut`]: AnyValue::get_mut
/// [`downcast`]: AnyValue::downcast
pub struct AnyValue {
    /// The owned holder, or `None` when the container is empty.
    raw: Option<RawValue>,
}

impl AnyValue {
    /// Creates a container holding `value`.
    ///
    /// The dynamic type of the container becomes `T`. The `Clone` bound is
    /// captured here so the container can be deep-copied later without any
    /// bound at the copy site.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::any::TypeId;
    ///
    /// use protean::AnyValue;
    ///
    /// let value = AnyValue::new(String::from("hello"));
    /// assert!(value.has_value());
    /// assert_eq!(value.type_id(), Some(TypeId::of::<String>()));
    /// ```
    #[must_use]
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        Self {
            raw: Some(RawValue::new(value)),
        }
    }

    /// Creates an empty container.
    ///
    /// # Examples
    ///
    /// ```
    /// use protean::AnyValue;
    ///
    /// let value = AnyValue::empty();
    /// assert!(!value.has_value());
    /// assert_eq!(value.type_id(), None);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self { raw: None }
    }

    /// Returns `true` if the container holds a value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.raw.is_some()
    }

    /// Returns the [`TypeId`] of the held value, or `None` if the container
    /// is empty.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.raw.as_ref().map(|raw| raw.as_ref().type_id())
    }

    /// Returns the [`core::any::type_name`] of the held value, or the
    /// sentinel `"<empty>"` if the container is empty.
    ///
    /// Intended for diagnostics; the name is not guaranteed to be unique or
    /// stable. Use [`type_id`](AnyValue::type_id) for identity checks.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.raw
            .as_ref()
            .map_or(EMPTY_TYPE_NAME, |raw| raw.as_ref().type_name())
    }

    /// Returns `true` if the held value is of type `T`.
    ///
    /// Always `false` for an empty container.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id() == Some(TypeId::of::<T>())
    }

    /// Discards the current contents, stores `value`, and returns a mutable
    /// reference to it.
    ///
    /// The previously held value, if any, is destroyed before the new holder
    /// is installed. Always succeeds; the dynamic type becomes `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use protean::AnyValue;
    ///
    /// let mut value = AnyValue::new(1i32);
    /// value.emplace(String::from("grow")).push_str("n");
    /// assert_eq!(value.get::<String>().unwrap(), "grown");
    /// ```
    pub fn emplace<T: Clone + 'static>(&mut self, value: T) -> &mut T {
        let raw = self.raw.insert(RawValue::new(value));
        // SAFETY: The holder on the previous line was created from a value
        // of type `T`.
        unsafe { raw.as_mut().downcast_mut_unchecked::<T>() }
    }

    /// Discards the held value, leaving the container empty.
    ///
    /// Idempotent: resetting an empty container is a no-op.
    pub fn reset(&mut self) {
        self.raw = None;
    }

    /// Moves the contents out into a new container, leaving `self` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use protean::AnyValue;
    ///
    /// let mut a = AnyValue::new(1i32);
    /// let b = a.take();
    /// assert!(!a.has_value());
    /// assert!(b.has_value());
    /// ```
    #[must_use]
    pub fn take(&mut self) -> AnyValue {
        Self {
            raw: self.raw.take(),
        }
    }

    /// Exchanges the contents of two containers.
    ///
    /// Runs in constant time by swapping the owned holders; the held values
    /// themselves are never copied or moved.
    pub fn swap(&mut self, other: &mut AnyValue) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Returns a reference to the held value if it is of type `T`, or `None`
    /// on a type mismatch or an empty container.
    ///
    /// This is the null-returning extraction surface; see
    /// [`get`](AnyValue::get) for the failure-signaling one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let raw = self.raw.as_ref()?.as_ref();
        if raw.type_id() == TypeId::of::<T>() {
            // SAFETY: We just checked that the held value's TypeId matches
            // `T`.
            Some(unsafe { raw.downcast_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the held value if it is of type `T`,
    /// or `None` on a type mismatch or an empty container.
    #[must_use]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let raw = self.raw.as_mut()?;
        if raw.as_ref().type_id() == TypeId::of::<T>() {
            // SAFETY: We just checked that the held value's TypeId matches
            // `T`.
            Some(unsafe { raw.as_mut().downcast_mut_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Returns a reference to the held value if it is of type `T`, or a
    /// [`TypeMismatch`] describing the requested and held types otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the held value is not of type `T`, or if the container is
    /// empty (the error then reports the `"<empty>"` sentinel as the held
    /// type).
    pub fn get<T: 'static>(&self) -> Result<&T, TypeMismatch> {
        self.downcast_ref::<T>()
            .ok_or_else(|| TypeMismatch::new(core::any::type_name::<T>(), self.type_name()))
    }

    /// Returns a mutable reference to the held value if it is of type `T`,
    /// or a [`TypeMismatch`] otherwise.
    ///
    /// # Errors
    ///
    /// Same conditions as [`get`](AnyValue::get).
    pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T, TypeMismatch> {
        // Capture the diagnostic before the mutable borrow below.
        let mismatch = TypeMismatch::new(core::any::type_name::<T>(), self.type_name());
        self.downcast_mut::<T>().ok_or(mismatch)
    }

    /// Consumes the container and moves the held value out if it is of type
    /// `T`.
    ///
    /// # Errors
    ///
    /// On a type mismatch or an empty container, the container is handed
    /// back unchanged, so the held value is never lost.
    ///
    /// # Examples
    ///
    /// ```
    /// use protean::AnyValue;
    ///
    /// let value = AnyValue::new(String::from("moved"));
    /// let inner: String = value.downcast().unwrap();
    /// assert_eq!(inner, "moved");
    ///
    /// let value = AnyValue::new(42i32);
    /// let value = value.downcast::<String>().unwrap_err();
    /// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    /// ```
    pub fn downcast<T: 'static>(mut self) -> Result<T, AnyValue> {
        match self.raw.take() {
            Some(raw) if raw.as_ref().type_id() == TypeId::of::<T>() => {
                // SAFETY: The guard above checked that the held value's
                // TypeId matches `T`.
                Ok(unsafe { raw.into_inner_unchecked::<T>() })
            }
            other => {
                self.raw = other;
                Err(self)
            }
        }
    }
}

impl Default for AnyValue {
    /// Creates an empty container, equivalent to [`AnyValue::empty`].
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for AnyValue {
    /// Deep-copies the container.
    ///
    /// The clone owns an independently allocated holder containing its own
    /// copy of the value; no storage is shared with the original.
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.as_ref().map(|raw| raw.as_ref().clone_value()),
        }
    }
}

impl fmt::Debug for AnyValue {
    /// Reports the dynamic type of the held value, not the value itself:
    /// stored types are not required to implement [`fmt::Debug`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::String};

    use super::*;

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(AnyValue: Send, Sync);
    }

    #[test]
    fn test_empty_queries() {
        let value = AnyValue::empty();
        assert!(!value.has_value());
        assert_eq!(value.type_id(), None);
        assert_eq!(value.type_name(), "<empty>");
        assert!(!value.is::<i32>());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(!AnyValue::default().has_value());
    }

    #[test]
    fn test_exact_type_matching_only() {
        let value = AnyValue::new(1i32);
        assert!(value.is::<i32>());
        assert!(!value.is::<u32>());
        assert!(!value.is::<i64>());
        assert_eq!(value.downcast_ref::<u32>(), None);
    }

    #[test]
    fn test_non_send_payload_is_accepted() {
        let value = AnyValue::new(Rc::new(5i32));
        assert!(value.is::<Rc<i32>>());
    }

    #[test]
    fn test_debug_reports_type() {
        let value = AnyValue::new(3i32);
        assert_eq!(format!("{value:?}"), "AnyValue { type: \"i32\", .. }");

        let empty = AnyValue::empty();
        assert_eq!(format!("{empty:?}"), "AnyValue { type: \"<empty>\", .. }");
    }

    #[test]
    fn test_get_reports_both_type_names() {
        let value = AnyValue::new(String::from("x"));
        let err = value.get::<i32>().unwrap_err();
        assert_eq!(err.requested(), "i32");
        assert_eq!(err.actual(), "alloc::string::String");

        let empty = AnyValue::empty();
        let err = empty.get::<i32>().unwrap_err();
        assert_eq!(err.actual(), "<empty>");
    }

    #[test]
    fn test_emplace_returns_reference_into_container() {
        let mut value = AnyValue::empty();
        *value.emplace(10i32) += 5;
        assert_eq!(value.get::<i32>(), Ok(&15));
    }

    #[test]
    fn test_swap_exchanges_holders() {
        let mut a = AnyValue::new(1i32);
        let mut b = AnyValue::new(String::from("two"));

        a.swap(&mut b);

        assert!(a.is::<String>());
        assert!(b.is::<i32>());
    }
}
