//! Traits which, typically, may be imported without concern: `use cmdkit::prelude::*`.

/// Behaviour for rendering the usage fragment of a value slot in help text.
// Needs to be imported in order to call `usage()`.
pub trait Usage {
    /// The usage fragment (ex: `NAME`, `[NAME ...]`).
    fn usage(&self) -> String;
}
