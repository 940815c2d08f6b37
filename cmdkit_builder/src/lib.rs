//! Builder module for `cmdkit`.
//! See [documentation root](https://docs.rs/cmdkit/latest/cmdkit/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
pub mod prelude;
mod registry;

pub use api::*;
pub use model::*;
pub use parser::{Command, ConsoleInterface, DispatchError, ErrorContext, ParsedArguments, UserInterface};
pub use registry::*;

#[cfg(feature = "unit_test")]
pub use parser::InMemoryInterface;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
