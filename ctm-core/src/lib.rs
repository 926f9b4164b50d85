mod error;
mod sign;
mod lc;
mod union_find;

pub use error::*;
pub use sign::*;
pub use lc::*;
pub use union_find::*;

pub mod poly;
pub mod combi;
pub mod util;

pub use poly::{Z2Ring, Z2Mono, Z2Poly, Map};
