mod helper;
pub use helper::*;
pub use crate::app::err::AppResult;
