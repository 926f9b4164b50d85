mod etangle;
mod strands;
mod type_da;
mod tangle;

pub use etangle::*;
pub use strands::*;
pub use type_da::*;
pub use tangle::*;
