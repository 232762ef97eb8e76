use super::{Accumulate, Dynamic, Stringify, TypeTag, stringizer};

#[derive(Clone)]
struct Plain;

impl Stringify for Plain {}
impl Dynamic for Plain {}

#[derive(Clone, PartialEq)]
struct Loud(&'static str);

impl Stringify for Loud {
    fn stringify(&self) -> String {
        self.0.to_uppercase()
    }
}

impl Dynamic for Loud {
    fn equality() -> Option<super::EqualFn<Self>> {
        Some(<Loud as PartialEq>::eq)
    }
}

#[test]
fn numbers_get_equality_and_arithmetic() {
    let eq = i32::equality().expect("i32 has equality");
    assert!(eq(&3, &3));
    assert!(!eq(&3, &4));

    let ops = i32::arithmetic().expect("i32 has arithmetic");
    assert!((ops.less)(&100, &200));
    assert_eq!((ops.add)(&100, &200), 300);
    assert_eq!((ops.sub)(&100, &200), -100);
    assert_eq!((ops.mul)(&100, &200), 20000);
    assert_eq!((ops.div)(&100, &200), 0);
    assert_eq!((ops.div)(&200, &100), 2);
}

#[test]
fn float_division_follows_the_type() {
    let ops = f64::arithmetic().unwrap();
    assert_eq!((ops.div)(&1.0, &4.0), 0.25);
    assert!((ops.div)(&1.0, &0.0).is_infinite());
}

#[test]
fn text_has_equality_without_arithmetic() {
    assert!(String::arithmetic().is_none());
    assert!(<&'static str>::arithmetic().is_none());
    assert!(char::arithmetic().is_none());
    assert!(bool::arithmetic().is_none());

    let eq = String::equality().unwrap();
    assert!(eq(&"a".to_string(), &"a".to_string()));
}

#[test]
fn plain_types_fall_back_on_every_rung() {
    assert!(Plain::equality().is_none());
    assert!(Plain::arithmetic().is_none());
    assert!(Loud::equality().is_some());
    assert!(Loud::arithmetic().is_none());
}

#[test]
fn builtin_renderings() {
    assert_eq!(stringizer::to_string(&123456789), "123456789");
    assert_eq!(stringizer::to_string(&456789.0f64), "456789.000000");
    assert_eq!(stringizer::to_string(&"Hello World!".to_string()), "Hello World!");
    assert_eq!(stringizer::to_string(&"C-Style string"), "C-Style string");
    assert_eq!(stringizer::to_string(&'A'), "A");
    assert_eq!(stringizer::to_string(&true), "true");
}

#[test]
fn fallback_rendering_is_the_type_name() {
    assert_eq!(
        stringizer::to_string(&Vec::<i32>::new()),
        std::any::type_name::<Vec<i32>>()
    );
    assert_eq!(
        stringizer::to_string(&Plain),
        std::any::type_name::<Plain>()
    );
    assert_eq!(stringizer::to_string(&Loud("hey")), "HEY");
}

#[test]
fn type_tags_compare_by_identity() {
    assert_eq!(TypeTag::of::<i32>(), TypeTag::of::<i32>());
    assert_ne!(TypeTag::of::<i32>(), TypeTag::of::<i64>());
    assert_ne!(TypeTag::of::<i32>(), TypeTag::null());
    assert!(TypeTag::null().is_null());
    assert_eq!(TypeTag::null().name(), "null");
    assert_eq!(TypeTag::of::<u8>().name(), "u8");
    insta::assert_snapshot!(format!("{:?}", TypeTag::of::<char>()), @"TypeTag(char)");
}

#[test]
fn accumulate_adds_into() {
    let mut total = 10i64;
    total.accumulate(&5);
    assert_eq!(total, 15);

    let mut text = String::new();
    text.accumulate(&'f');
    text.accumulate(&"oo");
    text.accumulate(&" bar".to_string());
    assert_eq!(text, "foo bar");
}
