/// Native "add into" used as the default combiner of
/// [`DynArray::join`](crate::dyn_array::DynArray::join).
pub trait Accumulate<T: ?Sized> {
    fn accumulate(&mut self, value: &T);
}

macro_rules! numeric_accumulate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Accumulate<$ty> for $ty {
                fn accumulate(&mut self, value: &$ty) {
                    *self += *value;
                }
            }
        )*
    };
}

numeric_accumulate!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl Accumulate<String> for String {
    fn accumulate(&mut self, value: &String) {
        self.push_str(value);
    }
}

impl Accumulate<&str> for String {
    fn accumulate(&mut self, value: &&str) {
        self.push_str(value);
    }
}

impl Accumulate<char> for String {
    fn accumulate(&mut self, value: &char) {
        self.push(*value);
    }
}
