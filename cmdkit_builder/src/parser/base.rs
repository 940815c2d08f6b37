use std::collections::HashMap;
use thiserror::Error;

use crate::api::{Argument, ParseError};
use crate::model::Value;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A failure to dispatch raw tokens onto the arguments of a [`Command`](crate::Command).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Fewer tokens than required arguments.
    #[error("insufficient number of arguments (provided={provided}, expected={expected}).")]
    InsufficientArguments {
        /// The number of tokens.
        provided: usize,
        /// The number of required arguments.
        expected: usize,
    },

    /// More tokens than arguments, none of which repeats.
    #[error("too many arguments (provided={provided}, expected={expected}).")]
    TooManyArguments {
        /// The number of tokens.
        provided: usize,
        /// The number of arguments.
        expected: usize,
    },

    /// A token was rejected by its argument.
    #[error("invalid argument '{name}': {source}")]
    Argument {
        /// The argument name.
        name: String,
        /// The index of the offending token.
        index: usize,
        /// The failure from [`Argument::parse`].
        source: ParseError,
    },
}

impl DispatchError {
    /// The index of the token the error points at, for [`ErrorContext`](crate::ErrorContext).
    pub(crate) fn index(&self) -> usize {
        match self {
            DispatchError::InsufficientArguments { provided, .. } => *provided,
            DispatchError::TooManyArguments { expected, .. } => *expected,
            DispatchError::Argument { index, .. } => *index,
        }
    }
}

/// The typed values of a successfully dispatched command.
///
/// Contains every argument which received tokens, or which has a default.
/// A repeating argument is always a [`Value::List`]: a non-list default is wrapped, and without tokens nor default the list is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArguments {
    values: HashMap<String, Value>,
}

impl ParsedArguments {
    /// The value of an argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the argument has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The number of arguments with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no argument has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the values, keyed by argument name.
    pub fn into_map(self) -> HashMap<String, Value> {
        self.values
    }
}

/// Split `tokens` among `arguments` (in declaration order) and parse each token.
///
/// Required arguments are fed first; the tokens left over go to optional arguments in declaration order.
/// A repeating argument (which must be the last) consumes everything that remains.
pub(crate) fn dispatch(
    arguments: &[Argument],
    tokens: &[&str],
) -> Result<ParsedArguments, DispatchError> {
    let required = arguments.iter().filter(|a| a.required()).count();
    let repeats = arguments.iter().any(|a| a.repeats());

    if tokens.len() < required {
        return Err(DispatchError::InsufficientArguments {
            provided: tokens.len(),
            expected: required,
        });
    }

    if !repeats && tokens.len() > arguments.len() {
        return Err(DispatchError::TooManyArguments {
            provided: tokens.len(),
            expected: arguments.len(),
        });
    }

    let mut spare = tokens.len() - required;
    let mut offset = 0;
    let mut values = HashMap::default();

    for argument in arguments {
        let take = if argument.repeats() {
            tokens.len() - offset
        } else if argument.required() {
            1
        } else if spare > 0 {
            spare -= 1;
            1
        } else {
            0
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Allocating {take} token(s) from offset {offset} to '{}'.",
                argument.name()
            );
        }

        let parsed = if argument.repeats() {
            let mut items = Vec::with_capacity(take);

            for index in offset..offset + take {
                items.push(parse(argument, tokens, index)?);
            }

            if items.is_empty() {
                // A repeating argument always yields a list, even when defaulted.
                match argument.default().map(|d| d.resolve()) {
                    Some(Value::List(defaults)) => Some(Value::List(defaults)),
                    Some(default) => Some(Value::List(vec![default])),
                    None => Some(Value::List(items)),
                }
            } else {
                Some(Value::List(items))
            }
        } else if take == 1 {
            Some(parse(argument, tokens, offset)?)
        } else {
            argument.default().map(|d| d.resolve())
        };

        if let Some(value) = parsed {
            values.insert(argument.name().to_string(), value);
        }

        offset += take;
    }

    Ok(ParsedArguments { values })
}

fn parse(argument: &Argument, tokens: &[&str], index: usize) -> Result<Value, DispatchError> {
    argument
        .parse(tokens[index])
        .map_err(|source| DispatchError::Argument {
            name: argument.name().to_string(),
            index,
            source,
        })
}
