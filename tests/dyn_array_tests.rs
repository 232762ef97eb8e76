use std::sync::atomic::{AtomicUsize, Ordering};

use typeless::{DynArray, Dynamic, Stringify, TypelessError, ValueBox, dyn_array};

#[test]
fn construction() {
    let words = DynArray::from_slice(&["foo", "bar"].map(String::from));
    let ints = dyn_array![1, 2, 3];
    assert!(!words.cbegin().is_null());
    assert!(words.table().is_some());
    assert_eq!(words.len(), 2);
    assert_eq!(ints.len(), 3);
    assert_eq!(words.at::<String>(0).unwrap(), "foo");
    assert_eq!(words.at::<String>(1).unwrap(), "bar");
    assert_eq!(ints.at::<i32>(0), Some(&1));
    assert_eq!(ints.at::<i32>(2), Some(&3));
}

#[test]
fn assignment_replaces_contents() {
    let mut arr = dyn_array![1, 2, 3];
    assert!(arr.has_type::<i32>());
    arr = DynArray::from_slice(&[String::from("Hello")]);
    assert!(arr.has_type::<String>());
    assert_eq!(arr.len(), 1);
}

#[test]
fn move_and_copy() {
    let mut source = dyn_array![1.5f64, 2.5];
    let copy = source.clone();
    let moved = source.take();
    assert!(source.is_empty());
    assert_eq!(moved.data::<f64>(), copy.data::<f64>());
    assert_ne!(moved.cbegin(), copy.cbegin());
}

#[test]
fn set_element() {
    let mut arr = dyn_array![String::from("a"), String::from("b")];
    arr.set(0, String::from("c")).unwrap();
    assert_eq!(arr.join::<String, String>().unwrap(), "cb");
    assert!(matches!(
        arr.set(5, String::new()),
        Err(TypelessError::IndexOutOfBounds { index: 5, len: 2 })
    ));
}

#[test]
fn for_each_sums() {
    let arr = dyn_array![1, 2, 3, 4];
    let mut sum = 0;
    arr.for_each(|i: &i32| sum += i).unwrap();
    assert_eq!(sum, 10);
}

#[test]
fn raw_iteration() {
    let arr = dyn_array![1, 2, 3, 4];
    let len = (arr.cend() as usize - arr.cbegin() as usize) / size_of::<i32>();
    let items = unsafe { std::slice::from_raw_parts(arr.cbegin().cast::<i32>(), len) };
    assert_eq!(items.iter().sum::<i32>(), 10);
}

#[test]
fn filter_then_join() {
    let arr = dyn_array![1, 2, 3, 4, 5, 6, 7, 8, 9];
    let kept = arr.filter(|i: &i32| i % 3 == 0).unwrap();
    assert_eq!(kept.len(), arr.len());
    assert_eq!(kept.join::<i32, i32>().unwrap(), 18);

    let evens = arr.filter(|i: &i32| i % 2 == 0).unwrap();
    assert_eq!(evens.join::<i32, i32>().unwrap(), 20);
}

#[test]
fn resize_grow() {
    let mut arr = dyn_array![1, 2, 3];
    arr.resize(5);
    assert_eq!(arr.len(), 5);
    assert_eq!(arr.at::<i32>(3), Some(&0));
    assert_eq!(arr.at::<i32>(4), Some(&0));
    assert_eq!(arr.join::<i32, i32>().unwrap(), 6);

    arr = dyn_array![String::from("Hello")];
    arr.resize(3);
    *arr.at_mut::<String>(1).unwrap() = String::from("World");
    *arr.at_mut::<String>(2).unwrap() = String::from("!");
    assert_eq!(arr.join::<String, String>().unwrap(), "HelloWorld!");
}

#[test]
fn resize_shrink() {
    let mut arr = DynArray::from_slice(&["Hello", " ", "World", "!"].map(String::from));
    arr.resize(2);
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.join::<String, String>().unwrap(), "Hello ");
}

#[test]
fn chars_join_into_text() {
    let arr = dyn_array!['H', 'e', 'l', 'l', 'o'];
    assert_eq!(arr.join::<char, String>().unwrap(), "Hello");
    let arr = dyn_array!['f', 'o', 'o', ' ', 'b', 'a', 'r'];
    assert_eq!(arr.join::<char, String>().unwrap(), "foo bar");
}

#[test]
fn prints_mixed_arguments() {
    let args = dyn_array![
        ValueBox::new(123),
        ValueBox::new('+'),
        ValueBox::new(456),
        ValueBox::new(String::from(" = ")),
        ValueBox::new(123 + 456),
    ];
    let mut out = String::new();
    args.for_each(|arg: &ValueBox| out.push_str(&arg.to_string()))
        .unwrap();
    assert_eq!(out, "123+456 = 579");
    assert_eq!(args.join::<ValueBox, String>().unwrap(), out);
}

static CREATED: AtomicUsize = AtomicUsize::new(0);
static DROPPED: AtomicUsize = AtomicUsize::new(0);

struct Tester;

impl Default for Tester {
    fn default() -> Self {
        CREATED.fetch_add(1, Ordering::SeqCst);
        Tester
    }
}

impl Clone for Tester {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl Drop for Tester {
    fn drop(&mut self) {
        DROPPED.fetch_add(1, Ordering::SeqCst);
    }
}

impl Stringify for Tester {}
impl Dynamic for Tester {}

#[test]
fn construction_and_destruction_balance() {
    let source: [Tester; 5] = Default::default();
    let arr = DynArray::from_slice(&source);
    assert_eq!(arr.len(), 5);
    assert_eq!(CREATED.load(Ordering::SeqCst), 10);
    drop(arr);
    drop(source);
    assert_eq!(DROPPED.load(Ordering::SeqCst), 10);

    let mut arr = DynArray::from_vec((0..4).map(|_| Tester::default()).collect());
    assert_eq!(CREATED.load(Ordering::SeqCst), 14);
    arr.resize(2);
    assert_eq!(DROPPED.load(Ordering::SeqCst), 12);
    let kept = arr.filter(|_: &Tester| false).unwrap();
    assert_eq!(kept.len(), 2);
    arr.destroy();
    drop(kept);
    assert_eq!(CREATED.load(Ordering::SeqCst), DROPPED.load(Ordering::SeqCst));
}
