//! Black-box tests for [`AnyValue`]: construction, type queries, the two
//! extraction surfaces, copy/move semantics, and destructor discipline.

use std::{any::TypeId, cell::Cell, rc::Rc};

use protean::AnyValue;

/// Counts constructions and destructions so tests can prove every stored
/// value is destroyed exactly once.
#[derive(Clone)]
struct Instrumented {
    tag: i32,
    drops: Rc<Cell<usize>>,
}

impl Instrumented {
    fn new(tag: i32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            tag,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for Instrumented {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_construction_records_dynamic_type() {
    let value = AnyValue::new(42i32);
    assert!(value.has_value());
    assert_eq!(value.type_id(), Some(TypeId::of::<i32>()));
    assert_eq!(value.type_name(), "i32");

    let value = AnyValue::new(String::from("text"));
    assert_eq!(value.type_id(), Some(TypeId::of::<String>()));
}

#[test]
fn test_empty_container_reports_sentinel() {
    let value = AnyValue::empty();
    assert!(!value.has_value());
    assert_eq!(value.type_id(), None);
    assert_eq!(value.type_name(), "<empty>");
    assert_eq!(value.downcast_ref::<i32>(), None);
    assert!(value.get::<i32>().is_err());
}

#[test]
fn test_round_trip_by_reference() {
    let value = AnyValue::new(1234i64);
    assert_eq!(value.downcast_ref::<i64>(), Some(&1234));
    assert_eq!(value.get::<i64>(), Ok(&1234));

    // Every other type misses, on both surfaces.
    assert_eq!(value.downcast_ref::<i32>(), None);
    assert_eq!(value.downcast_ref::<u64>(), None);
    assert!(value.get::<u64>().is_err());
}

#[test]
fn test_round_trip_by_move() {
    let value = AnyValue::new(String::from("round trip"));
    let inner: String = value.downcast().unwrap();
    assert_eq!(inner, "round trip");
}

#[test]
fn test_failed_downcast_returns_container_intact() {
    let value = AnyValue::new(String::from("kept"));
    let value = value.downcast::<i32>().unwrap_err();
    assert_eq!(value.get::<String>().unwrap(), "kept");
}

#[test]
fn test_mutation_through_downcast_mut() {
    let mut value = AnyValue::new(vec![1, 2]);
    value.downcast_mut::<Vec<i32>>().unwrap().push(3);
    assert_eq!(value.get::<Vec<i32>>(), Ok(&vec![1, 2, 3]));

    // A mismatched request mutates nothing and returns None.
    assert_eq!(value.downcast_mut::<i32>(), None);
}

#[test]
fn test_clone_is_deep() {
    let a = AnyValue::new(vec![1, 2, 3]);
    let mut b = a.clone();

    b.downcast_mut::<Vec<i32>>().unwrap().push(4);
    assert_eq!(a.get::<Vec<i32>>(), Ok(&vec![1, 2, 3]));
    assert_eq!(b.get::<Vec<i32>>(), Ok(&vec![1, 2, 3, 4]));

    // Resetting the copy leaves the original untouched.
    b.reset();
    assert!(a.has_value());
}

#[test]
fn test_clone_then_emplace_isolates_containers() {
    let a = AnyValue::new(42i32);
    let mut b = a.clone();
    b.emplace(String::from("x"));

    assert_eq!(a.get::<i32>(), Ok(&42));
    assert_eq!(b.get::<String>().unwrap(), "x");
}

#[test]
fn test_take_transfers_contents() {
    let mut a = AnyValue::new(7u8);
    let b = a.take();

    assert!(!a.has_value());
    assert_eq!(a.type_id(), None);
    assert_eq!(b.get::<u8>(), Ok(&7));

    // Taking from the now-empty container yields another empty one.
    assert!(!a.take().has_value());
}

#[test]
fn test_swap_with_empty() {
    let mut full = AnyValue::new(1i32);
    let mut empty = AnyValue::empty();

    full.swap(&mut empty);

    assert!(!full.has_value());
    assert_eq!(empty.get::<i32>(), Ok(&1));
}

#[test]
fn test_reset_is_idempotent() {
    let mut value = AnyValue::new(5i32);
    value.reset();
    assert!(!value.has_value());
    value.reset();
    assert!(!value.has_value());
}

#[test]
fn test_value_dropped_exactly_once_on_reset() {
    let drops = Rc::new(Cell::new(0));

    let mut value = AnyValue::new(Instrumented::new(1, &drops));
    assert_eq!(drops.get(), 0);

    value.reset();
    assert_eq!(drops.get(), 1);

    value.reset();
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_value_dropped_exactly_once_on_emplace() {
    let drops = Rc::new(Cell::new(0));

    let mut value = AnyValue::new(Instrumented::new(1, &drops));
    value.emplace(Instrumented::new(2, &drops));
    assert_eq!(drops.get(), 1);

    drop(value);
    assert_eq!(drops.get(), 2);
}

#[test]
fn test_clone_drops_both_copies() {
    let drops = Rc::new(Cell::new(0));

    {
        let a = AnyValue::new(Instrumented::new(1, &drops));
        let b = a.clone();
        assert_eq!(drops.get(), 0);
        assert_eq!(b.get::<Instrumented>().unwrap().tag, 1);
    }

    // Original and deep copy each destroyed their own value.
    assert_eq!(drops.get(), 2);
}

#[test]
fn test_moved_out_value_not_double_dropped() {
    let drops = Rc::new(Cell::new(0));

    let value = AnyValue::new(Instrumented::new(1, &drops));
    let inner: Instrumented = value.downcast().unwrap();
    assert_eq!(drops.get(), 0);

    drop(inner);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_non_send_values_are_storable() {
    let value = AnyValue::new(Rc::new(9i32));
    assert_eq!(**value.get::<Rc<i32>>().unwrap(), 9);
}

#[test]
fn test_type_mismatch_error_propagates() {
    fn fetch(value: &AnyValue) -> Result<i32, protean::error::TypeMismatch> {
        Ok(*value.get::<i32>()?)
    }

    assert_eq!(fetch(&AnyValue::new(3i32)), Ok(3));
    let err = fetch(&AnyValue::new(3.0f64)).unwrap_err();
    assert_eq!(err.requested(), "i32");
    assert_eq!(err.actual(), "f64");
}
