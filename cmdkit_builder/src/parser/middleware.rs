use std::env;

use crate::api::{Argument, SpecificationError};
use crate::parser::base::*;
use crate::parser::interface::{ConsoleInterface, UserInterface};
use crate::parser::printer::{ArgumentRow, ErrorContext, Printer};

/// A program's positional arguments, in declaration order.
#[derive(Debug, Clone)]
pub struct Command {
    program: String,
    arguments: Vec<Argument>,
}

impl Command {
    /// Create a command without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: Vec::default(),
        }
    }

    /// Add the next positional argument.
    ///
    /// Argument names must be unique, and a repeating argument must be the last one.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{Argument, Command, SemanticType, TypeRegistry, Value};
    ///
    /// let registry = TypeRegistry::default();
    /// let command = Command::new("summer")
    ///     .add(
    ///         Argument::builder("item")
    ///             .semantic_type(SemanticType::INTEGER)
    ///             .required()
    ///             .repeats()
    ///             .description("The items to sum.")
    ///             .build(&registry)
    ///             .unwrap(),
    ///     )
    ///     .unwrap();
    ///
    /// let parsed = command.parse_tokens(&["1", "2"]).unwrap();
    /// assert_eq!(
    ///     parsed.get("item"),
    ///     Some(&Value::List(vec![Value::Integer(1), Value::Integer(2)]))
    /// );
    /// ```
    pub fn add(mut self, argument: Argument) -> Result<Self, SpecificationError> {
        if self.arguments.iter().any(|a| a.name() == argument.name()) {
            return Err(SpecificationError::DuplicateName {
                name: argument.name().to_string(),
            });
        }

        if self.arguments.iter().any(|a| a.repeats()) {
            return Err(SpecificationError::RepeatsNotLast {
                name: argument.name().to_string(),
            });
        }

        self.arguments.push(argument);
        Ok(self)
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments, in declaration order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// The usage line (ex: `usage: program FILE [COUNT] [NAMES ...]`).
    pub fn usage(&self) -> String {
        self.printer(None).usage(&self.program)
    }

    /// Print the usage line followed by a description of each argument, wrapped to the terminal width.
    pub fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        let rows = self.arguments.iter().map(ArgumentRow::from).collect();
        Printer::terminal(rows).print_help(&self.program, user_interface);
    }

    /// Dispatch the input tokens onto the arguments, returning their typed values.
    ///
    /// Required arguments are fed first, the leftover tokens feed the optional arguments in declaration order, and a repeating argument consumes all that remains.
    /// Optional arguments without a token take their default (if any).
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParsedArguments, DispatchError> {
        dispatch(&self.arguments, tokens)
    }

    /// Dispatch the input tokens, reporting any failure to the `user_interface`.
    ///
    /// On failure the error and its context (the tokens, pointing at the offending one) are printed, and the result is `Err(1)`: the process exit code.
    pub fn invoke(
        &self,
        tokens: &[&str],
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<ParsedArguments, i32> {
        match self.parse_tokens(tokens) {
            Ok(parsed) => Ok(parsed),
            Err(error) => {
                let index = error.index();
                user_interface.print_error(error);
                user_interface.print_error_context(ErrorContext::new(index, tokens));
                user_interface.print(self.usage());
                Err(1)
            }
        }
    }

    /// Dispatch the Cli [`env::args`] onto the arguments.
    ///
    /// On failure the error is reported on the console, and the process exits with code `1` (via `std::process::exit`).
    pub fn run(&self) -> ParsedArguments {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.invoke(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
            &ConsoleInterface::default(),
        ) {
            Ok(parsed) => parsed,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }

    fn printer(&self, terminal_width: Option<usize>) -> Printer {
        let rows = self.arguments.iter().map(ArgumentRow::from).collect();
        Printer::new(rows, terminal_width)
    }
}
