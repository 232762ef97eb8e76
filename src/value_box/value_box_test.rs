use crate::{
    alloc::Counting,
    dynamic::{Dynamic, Stringify, TypeTag},
};

use super::ValueBox;

#[test]
fn round_trips_the_value() {
    let b = ValueBox::new(123);
    assert_eq!(b.get::<i32>(), Some(&123));
    assert_eq!(b.get::<i64>(), None);
    assert!(b.has_type::<i32>());
    assert_eq!(b.type_name(), "i32");
    assert_eq!(unsafe { *b.get_unchecked::<i32>() }, 123);
}

#[test]
fn empty_box_reports_null() {
    let b = ValueBox::default();
    assert!(b.is_empty());
    assert_eq!(b.type_tag(), TypeTag::null());
    assert_eq!(b.type_name(), "null");
    assert!(b.data().is_null());
    assert_eq!(b.to_string(), "null");
    assert_eq!(format!("{b:?}"), "ValueBox(null)");
    assert!(b.get::<i32>().is_none());
}

#[test]
fn clone_is_deep() {
    let a = ValueBox::new(String::from("Hello World!"));
    let mut b = a.clone();
    assert_ne!(a.data(), b.data());
    assert_eq!(a, b);
    assert_eq!(a.type_tag(), b.type_tag());

    b.get_mut::<String>().unwrap().push('!');
    assert_ne!(a, b);
    assert_eq!(a.get::<String>().unwrap(), "Hello World!");
}

#[test]
fn set_rebinds_type() {
    let mut b = ValueBox::new(1u8);
    b.set("text");
    assert!(b.has_type::<&str>());
    b.set(2.5f64);
    assert!(b.eq_value(&2.5f64));
    assert!(!b.eq_value(&2.5f32));
}

#[test]
fn take_and_swap_move_storage() {
    let mut a = ValueBox::new(7i32);
    let addr = a.data();
    let b = a.take();
    assert!(a.is_empty());
    assert_eq!(b.data(), addr);

    let mut c = ValueBox::new('x');
    let mut d = b;
    c.swap(&mut d);
    assert!(c.eq_value(&7));
    assert!(d.eq_value(&'x'));

    a.destroy();
    assert!(a.is_empty());
}

#[test]
fn equality_needs_matching_non_empty_boxes() {
    assert_eq!(ValueBox::new(5), ValueBox::new(5));
    assert_ne!(ValueBox::new(5), ValueBox::new(5u32));
    assert_ne!(ValueBox::new(5), ValueBox::default());
    assert_ne!(ValueBox::default(), ValueBox::default());
}

#[test]
fn strategies_do_not_split_dynamic_types() {
    let a = ValueBox::new(9i16);
    let b = ValueBox::new_in::<i16, Counting>(9);
    assert_eq!(a, b);
    assert_eq!(a.type_tag(), b.type_tag());
    assert!(b.table().unwrap().allocator().is::<Counting>());
}

#[derive(Clone)]
struct Ledger(u64);

impl Stringify for Ledger {
    fn stringify(&self) -> String {
        format!("ledger #{}", self.0)
    }
}
impl Dynamic for Ledger {}

#[test]
fn renders_through_stringify() {
    assert_eq!(ValueBox::new(123456789).to_string(), "123456789");
    assert_eq!(ValueBox::new(456789.0f64).to_string(), "456789.000000");
    assert_eq!(ValueBox::new('A').to_string(), "A");
    assert_eq!(ValueBox::new(Ledger(4)).to_string(), "ledger #4");
    insta::assert_snapshot!(format!("{:?}", ValueBox::new(579)), @"ValueBox(i32: 579)");
}

#[test]
fn destroy_releases_and_invalidate_forgets() {
    #[derive(Clone)]
    struct Slot(#[allow(dead_code)] u32);
    impl Stringify for Slot {}
    impl Dynamic for Slot {}

    let mut a = ValueBox::new_in::<Slot, Counting>(Slot(1));
    let counter = a
        .table()
        .unwrap()
        .allocator()
        .downcast_ref::<Counting>()
        .unwrap();
    let copy = a.clone();
    assert_eq!(counter.snapshot().live_blocks(), 2);

    a.destroy();
    a.destroy();
    assert_eq!(counter.snapshot().live_blocks(), 1);

    let mut leaked = copy;
    leaked.invalidate();
    assert!(leaked.is_empty());
    assert_eq!(counter.snapshot().live_blocks(), 1);
}

#[test]
fn boxes_nest() {
    let inner = ValueBox::new(3);
    let outer = ValueBox::new(inner.clone());
    assert_eq!(outer.get::<ValueBox>(), Some(&inner));
    assert_eq!(outer.to_string(), "3");
}
