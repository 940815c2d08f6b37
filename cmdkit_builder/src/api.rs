mod argument;
mod error;
mod value;

pub use argument::*;
pub use error::*;
pub use value::*;
