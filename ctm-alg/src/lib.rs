mod strands;
mod gen;
mod alg;
mod tensor;

pub use strands::*;
pub use gen::*;
pub use alg::*;
pub use tensor::*;
