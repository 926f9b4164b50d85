mod ring;
mod mono;
mod poly;
mod map;

pub use ring::*;
pub use mono::*;
pub use poly::*;
pub use map::*;
