mod constant;
mod error;
mod param_gen;
mod random;

pub use constant::{ConstParamGen, DEFAULT_WEIGHT};
pub use error::{InitErr, Result};
pub use param_gen::ParamGen;
pub use random::RandParamGen;
