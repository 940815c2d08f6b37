mod base;
mod interface;
mod middleware;
mod printer;

pub use base::{DispatchError, ParsedArguments};
pub use interface::{ConsoleInterface, UserInterface};
pub use middleware::Command;
pub use printer::ErrorContext;

pub(crate) use interface::{ColumnRenderer, LeftWidth, PaddingWidth, RightWidth, TotalWidth};

#[cfg(any(test, feature = "unit_test"))]
pub(crate) use interface::util;
#[cfg(feature = "unit_test")]
pub use interface::util::InMemoryInterface;
