#![allow(unused_macros)]
#![allow(unused_imports)]

/// `strands!{ 0 => 1, 3 => 2 }` builds a `BTreeMap<usize, usize>`.
#[macro_export]
macro_rules! strands {
    {$( $key: expr => $val: expr ),* $(,)?} => {{
        std::collections::BTreeMap::<usize, usize>::from_iter([$(($key, $val),)*])
    }}
}

pub use strands;
