//! `cmdkit` declares the positional arguments of a command line program, and coerces their raw tokens into typed values.
//!
//! Each argument is described by a small set of declarations:
//! * A *semantic type* (ex: `integer`, `path`, or one of your own), which selects how raw tokens are recognized and converted.
//! * Whether the argument is *required* or optional, and for optional arguments an optional *default* (a literal or lazily produced value).
//! * Whether the argument *repeats*, consuming every remaining token.
//! * A *description*, which is mandatory.
//!
//! The usage text of every argument follows from these declarations, as does the behaviour of parsing its tokens.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/summer.rs")]
//! ```
//!
//! Which generates the following Cli program:
//! ```console
//! $ summer 1 2 3
//! Sum: 6
//!
//! $ summer
//! Parse error: insufficient number of arguments (provided=0, expected=1).
//!
//! ^
//! usage: summer ITEM ...
//!
//! $ summer 1 blah
//! Parse error: invalid argument 'item': 'blah' is not a valid integer.
//! 1 blah
//!   ^
//! usage: summer ITEM ...
//! ```
//!
//! # Semantic types
//! Coercion is driven by a [`TypeRegistry`], which maps each [`SemanticType`] to a [`Coercion`]: an optional recognition pattern plus a converter.
//! [`TypeRegistry::default`] holds the built-in types:
//!
//! | type      | recognizes                          | produces          |
//! |-----------|-------------------------------------|-------------------|
//! | `text`    | any token                           | [`Value::Text`]    |
//! | `numeric` | an `integer` or `float`             | either of below   |
//! | `integer` | `42`, `-7`, `1_000`, `0x1F`, `0b101`, `0o17` | [`Value::Integer`] |
//! | `float`   | `1.5`, `-.5`, `1e3`                 | [`Value::Float`]   |
//! | `boolean` | `true/yes/+`, `false/no/-/nil`      | [`Value::Boolean`] |
//! | `path`    | any non-empty token                 | [`Value::Path`]    |
//!
//! Types form a hierarchy: declare a parent via [`TypeRegistry::declare`], and a type with no registration of its own borrows the coercion of its nearest registered ancestor.
//! A type without any coercion (direct or inherited) simply passes the raw token through as [`Value::Text`].
//!
//! ```no_run
#![doc = include_str!("../demos/copier.rs")]
//! ```
//!
//! # Usage text
//! Each argument renders its own usage fragment:
//!
//! | required | repeats | usage          |
//! |----------|---------|----------------|
//! | yes      | no      | `NAME`         |
//! | yes      | yes     | `NAME ...`     |
//! | no       | no      | `[NAME]`       |
//! | no       | yes     | `[NAME ...]`   |
//!
//! [`Command::print_help`] prints the usage line followed by each argument's description (and literal default), wrapped to the terminal width.
//!
//! # Dispatching tokens
//! A [`Command`] assigns its input tokens to the arguments in declaration order.
//! Required arguments are fed first; any leftover tokens feed the optional arguments in declaration order, and a repeating argument (always the last) consumes the remainder.
//! Failures are described by a [`DispatchError`], which [`Command::invoke`] reports via a [`UserInterface`].
//!
//! # Features
//! * `tracing_debug`: emit debug logs via [tracing](https://docs.rs/tracing/latest/tracing/) while building arguments, resolving coercions and dispatching tokens.

pub use cmdkit_builder::*;
