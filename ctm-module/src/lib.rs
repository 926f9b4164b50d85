mod key;
mod gen;
mod module;
mod tensor;
mod reduce;
mod complex;
mod export;
mod par;

pub mod config;

pub use key::*;
pub use gen::*;
pub use module::*;
pub use complex::*;
pub use export::*;
